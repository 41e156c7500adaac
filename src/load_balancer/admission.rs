//! Admission control.
//!
//! # Responsibilities
//! - Count in-flight requests across all callers
//! - Reject requests beyond `per_provider * healthy` concurrent reservations
//! - Release the slot on every exit path via a RAII guard
//!
//! The bound is checked after the increment; a rejected attempt still
//! holds its slot until the guard drops, so concurrent racers can only
//! be rejected spuriously, never admitted past the bound.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::SelectError;

/// Shared in-flight request counter.
#[derive(Debug)]
pub struct Admission {
    in_flight: AtomicUsize,
    per_provider: usize,
}

impl Admission {
    pub fn new(per_provider: usize) -> Self {
        Self {
            in_flight: AtomicUsize::new(0),
            per_provider,
        }
    }

    /// Number of reservations currently held.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Admission bound for the given number of healthy providers.
    pub fn capacity(&self, healthy: usize) -> usize {
        self.per_provider.saturating_mul(healthy)
    }

    /// Try to reserve a slot against the current healthy count.
    pub fn try_reserve(self: &Arc<Self>, healthy: usize) -> Result<Reservation, SelectError> {
        let reservation = Reservation {
            admission: self.clone(),
        };
        let requests = self.in_flight.fetch_add(1, Ordering::AcqRel) + 1;

        if healthy == 0 {
            return Err(SelectError::Unavailable);
        }

        let capacity = self.capacity(healthy);
        if requests > capacity {
            return Err(SelectError::Overloaded {
                in_flight: requests,
                capacity,
            });
        }

        Ok(reservation)
    }
}

/// A RAII guard that holds one admission slot.
#[derive(Debug)]
pub struct Reservation {
    admission: Arc<Admission>,
}

impl Drop for Reservation {
    fn drop(&mut self) {
        self.admission.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}
