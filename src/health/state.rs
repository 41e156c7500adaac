//! Provider health state machine.
//!
//! # States
//! - Healthy: provider sits in the healthy prefix and receives traffic
//! - Unhealthy: provider sits in the suffix and is never selected
//!
//! # State Transitions
//! ```text
//! Healthy → Unhealthy: any single failed probe
//! Unhealthy → Healthy: counter reaches HYSTERESIS_THRESHOLD
//! ```
//!
//! The counter moves up on success and down on failure, clamped to
//! `[0, HYSTERESIS_THRESHOLD]`. Reaching the threshold resets it to 0.

/// Consecutive successes required to reinstate a provider.
pub const HYSTERESIS_THRESHOLD: u8 = 2;

/// What a probe result asks the registry to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Demote,
    Promote,
    Hold,
}

/// Apply one probe outcome to a counter.
///
/// Returns the new counter value and the verdict. A promote verdict is
/// also produced for providers that are already healthy; the registry
/// treats it as a no-op there.
pub fn step(counter: u8, passed: bool) -> (u8, Verdict) {
    let next = if passed {
        counter.saturating_add(1).min(HYSTERESIS_THRESHOLD)
    } else {
        counter.saturating_sub(1)
    };

    if !passed {
        (next, Verdict::Demote)
    } else if next == HYSTERESIS_THRESHOLD {
        (0, Verdict::Promote)
    } else {
        (next, Verdict::Hold)
    }
}

/// Outcome of applying a probe result to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Provider moved from the unhealthy suffix into the healthy prefix.
    Promoted,
    /// Provider moved from the healthy prefix into the unhealthy suffix.
    Demoted,
    /// Partition unchanged.
    Unchanged,
}

impl Transition {
    pub fn as_label(&self) -> &'static str {
        match self {
            Transition::Promoted => "promoted",
            Transition::Demoted => "demoted",
            Transition::Unchanged => "unchanged",
        }
    }
}
