//! # Submission Flag
//!
//! `is_submitting` for a form. While a [`SubmissionGuard`] is alive, a
//! second submission is refused; dropping the guard (success, failure or
//! early return) re-enables the button.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct SubmissionFlag {
    in_flight: Arc<AtomicBool>,
}

impl SubmissionFlag {
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Marks a submission as started, unless one already is.
    pub fn try_begin(&self) -> Option<SubmissionGuard> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmissionGuard {
                in_flight: Arc::clone(&self.in_flight),
            })
    }
}

/// Clears the flag on drop.
#[derive(Debug)]
pub struct SubmissionGuard {
    in_flight: Arc<AtomicBool>,
}

impl Drop for SubmissionGuard {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}
