//! An atomically-readable, settable deadline.
//!
//! `std::time::Instant` is not atomically storable, so the deadline is kept
//! as nanoseconds since [`crate::clock`]'s process-wide origin in an
//! `AtomicU64`. Zero means "no deadline" and is the initial state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::clock;

pub struct Deadline(AtomicU64);

impl Deadline {
    pub fn unset() -> Self {
        Deadline(AtomicU64::new(0))
    }

    /// `None` disables the deadline (equivalent to the zero instant).
    pub fn set(&self, at: Option<Duration>) {
        let nanos = at.map(|d| d.as_nanos().min(u64::MAX as u128) as u64).unwrap_or(0);
        self.0.store(nanos, Ordering::SeqCst);
    }

    /// True if a deadline is set and has already passed.
    pub fn is_expired(&self) -> bool {
        let nanos = self.0.load(Ordering::SeqCst);
        if nanos == 0 {
            return false;
        }
        clock::elapsed().as_nanos() as u64 > nanos
    }
}
