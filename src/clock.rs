//! A process-wide monotonic origin.
//!
//! `std::time::Instant` has no stable epoch, so it cannot be stored in an
//! `AtomicU64` the way a Unix timestamp can. Every piece of state in this
//! crate that needs an atomically-readable time value (the wrapper
//! deadlines) or a duration-since-origin for bucket alignment (the
//! [`crate::counter::Counter`]) measures elapsed time against this one
//! process-lifetime origin instead.

use std::sync::OnceLock;
use std::time::{Duration, Instant};

fn origin() -> Instant {
    static ORIGIN: OnceLock<Instant> = OnceLock::new();
    *ORIGIN.get_or_init(Instant::now)
}

/// Duration elapsed since the process-wide origin.
pub fn elapsed() -> Duration {
    Instant::now().saturating_duration_since(origin())
}

/// Converts an absolute `Instant` (e.g. a caller-supplied deadline) into the
/// same duration-since-origin units `elapsed()` returns, so the two are
/// directly comparable.
pub fn since_origin(instant: Instant) -> Duration {
    instant.saturating_duration_since(origin())
}

/// Truncates a duration down to the nearest multiple of `unit`.
///
/// `unit` of zero is treated as "no truncation" to avoid a division by
/// zero; callers are expected to have already rejected zero tick
/// durations at construction time.
pub fn truncate(value: Duration, unit: Duration) -> Duration {
    if unit.is_zero() {
        return value;
    }
    let unit_nanos = unit.as_nanos();
    let rem = value.as_nanos() % unit_nanos;
    value - Duration::from_nanos(rem as u64)
}
