//! Error types for balancer construction and provider selection.

use thiserror::Error;

use crate::load_balancer::provider::ProviderId;

/// Errors that prevent a balancer from being built.
///
/// Construction is all-or-nothing: when one of these is returned no
/// registry exists and no monitor task was spawned.
#[derive(Debug, Error)]
pub enum BuildError {
    /// More providers were supplied than the configuration allows.
    #[error("exceeded maximum number of providers: got {count}, max {max}")]
    TooManyProviders { count: usize, max: usize },

    /// Two providers share the same identifier.
    #[error("duplicate provider id: {0}")]
    DuplicateProvider(ProviderId),

    /// A heartbeat was configured but no tokio runtime is running.
    #[error("health monitor requires a running tokio runtime")]
    NoRuntime,
}

/// Reasons a selection request could not be served.
///
/// These are ordinary outcomes, not faults: callers are expected to
/// retry or fail their own request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    /// The healthy partition is empty.
    #[error("no healthy providers available")]
    Unavailable,

    /// Admitting the request would exceed the healthy capacity.
    #[error("overloaded: {in_flight} in flight, capacity {capacity}")]
    Overloaded { in_flight: usize, capacity: usize },
}

impl SelectError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, SelectError::Unavailable)
    }

    pub fn is_overloaded(&self) -> bool {
        matches!(self, SelectError::Overloaded { .. })
    }

    /// Label used for request outcome metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SelectError::Unavailable => "unavailable",
            SelectError::Overloaded { .. } => "overloaded",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BuildError::TooManyProviders { count: 11, max: 10 };
        assert_eq!(
            err.to_string(),
            "exceeded maximum number of providers: got 11, max 10"
        );

        let err = SelectError::Overloaded {
            in_flight: 3,
            capacity: 2,
        };
        assert!(err.to_string().contains("capacity 2"));
        assert!(err.is_overloaded());
        assert!(!err.is_unavailable());
    }

    #[test]
    fn test_select_error_labels() {
        assert_eq!(SelectError::Unavailable.as_label(), "unavailable");
        assert_eq!(
            SelectError::Overloaded {
                in_flight: 1,
                capacity: 0
            }
            .as_label(),
            "overloaded"
        );
    }
}
