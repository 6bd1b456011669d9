//! Call-site guard against overlapping generation attempts.
//!
//! The pipeline itself does not serialize calls. A UI trigger holds one
//! `GenerationControl` and refuses to start while a ticket is outstanding,
//! the way a button is disabled while its action runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct GenerationControl {
    in_flight: Arc<AtomicBool>,
}

/// Marks one generation as running until dropped.
#[derive(Debug)]
pub struct GenerationTicket {
    in_flight: Arc<AtomicBool>,
}

impl GenerationControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// A ticket if nothing is running, `None` otherwise.
    pub fn try_begin(&self) -> Option<GenerationTicket> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| GenerationTicket {
                in_flight: Arc::clone(&self.in_flight),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

impl Drop for GenerationTicket {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_attempt_is_refused_while_first_runs() {
        let control = GenerationControl::new();
        let ticket = control.try_begin().unwrap();
        assert!(control.is_busy());
        assert!(control.try_begin().is_none());
        assert!(control.clone().try_begin().is_none());

        drop(ticket);
        assert!(!control.is_busy());
        assert!(control.try_begin().is_some());
    }
}
