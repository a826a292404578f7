//! The sliding-window count accumulator, the arithmetic heart of the crate.
//!
//! Built around wall-clock `Instant`s rather than caller-supplied ticks,
//! and a capped-admission API (`fill_up_to_cap`) rather than an
//! accept/reject one: every admission is bounded by a cap derived from a
//! counts-per-second rate, with the remainder of a request silently
//! clipped instead of rejected outright.

use std::sync::Mutex;
use std::time::Duration;

use crate::clock;
use crate::error::GuardError;
use crate::types::{max_exact_i64_as_f64, Count};

struct CounterState {
    buckets: Vec<Count>,
    head_index: usize,
    head_time: Duration,
}

/// A bounded-interval sliding window over `ticks` equal buckets.
///
/// Tracks how many counts have been admitted in the last `interval`,
/// with quantization error bounded by one `tick_duration`. All public
/// operations hold an exclusive lock for their full critical section;
/// see the crate-level docs for the concurrency model.
pub struct Counter {
    interval: Duration,
    ticks: u32,
    tick_duration: Duration,
    state: Mutex<CounterState>,
}

impl std::fmt::Debug for Counter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Counter")
            .field("interval", &self.interval)
            .field("ticks", &self.ticks)
            .field("tick_duration", &self.tick_duration)
            .finish()
    }
}

impl PartialEq for Counter {
    fn eq(&self, other: &Self) -> bool {
        self.interval == other.interval
            && self.ticks == other.ticks
            && self.tick_duration == other.tick_duration
    }
}

impl Counter {
    /// Creates a counter dividing `interval` into `ticks` equal buckets.
    ///
    /// Fails with [`GuardError::InvalidParams`] if `ticks` is zero or
    /// `interval` is zero; both are caller errors, not recoverable.
    pub fn new(interval: Duration, ticks: u32) -> Result<Self, GuardError> {
        if ticks == 0 || interval.is_zero() {
            return Err(GuardError::InvalidParams);
        }

        let tick_duration = interval / ticks;
        let now = clock::elapsed();
        let head_time = clock::truncate(now, tick_duration);
        let interval_aligned = clock::truncate(now, interval);
        let head_index =
            ((now - interval_aligned).as_nanos() / tick_duration.as_nanos()) as usize % ticks as usize;

        Ok(Counter {
            interval,
            ticks,
            tick_duration,
            state: Mutex::new(CounterState {
                buckets: vec![0; ticks as usize],
                head_index,
                head_time,
            }),
        })
    }

    /// The cap implied by `cps` over this counter's interval, clamped
    /// against f64-exactness loss. See [`crate::types::max_exact_i64_as_f64`].
    fn cap_for(&self, cps: Count) -> Count {
        let product = cps as f64 * self.interval.as_secs_f64();
        let clamped = product.min(max_exact_i64_as_f64() as f64);
        clamped as Count
    }

    /// Rotates buckets forward to `now`, zeroing everything the gap
    /// passed over, and returns the window total *before* this call's
    /// own admission is added. Must be called with the lock held.
    fn advance(state: &mut CounterState, tick_duration: Duration, ticks: u32, now: Duration) -> Count {
        let gap_ticks = if now > state.head_time {
            ((now - state.head_time).as_nanos() / tick_duration.as_nanos()) as u64
        } else {
            0
        };
        let gap = gap_ticks.min(ticks as u64) as usize;

        for i in 1..=gap {
            let idx = (state.head_index + i) % ticks as usize;
            state.buckets[idx] = 0;
        }

        state.head_index = (state.head_index + gap) % ticks as usize;
        state.head_time = clock::truncate(now, tick_duration);

        state.buckets.iter().sum()
    }

    /// Admits `n` unconditionally, returning the new window total.
    ///
    /// `n` may be negative — this is how refunds are expressed, and a
    /// negative fill is never rejected or capped.
    pub fn fill_up(&self, n: Count) -> Count {
        let now = clock::elapsed();
        let mut state = self.state.lock().expect("counter mutex poisoned");
        let total = Self::advance(&mut state, self.tick_duration, self.ticks, now);
        let head_index = state.head_index;
        state.buckets[head_index] += n;
        total + n
    }

    /// Admits up to `n`, never exceeding the cap implied by `cps` over
    /// this counter's window. Returns the amount actually admitted,
    /// which may be `0`.
    pub fn fill_up_to_cap(&self, n: Count, cps: Count) -> Count {
        let cap = self.cap_for(cps);
        let now = clock::elapsed();
        let mut state = self.state.lock().expect("counter mutex poisoned");
        let used = Self::advance(&mut state, self.tick_duration, self.ticks, now);
        let left = cap - used;

        if left <= 0 {
            return 0;
        }

        let admitted = left.min(n);
        let head_index = state.head_index;
        state.buckets[head_index] += admitted;
        admitted
    }

    /// Reseeds every bucket as though the new rate had been in effect
    /// for the whole window, so a limit change cannot grant an instant
    /// burst. The current bucket is left at zero so the very next
    /// admission is not starved.
    pub fn reset(&self, cps: Count) {
        let per_bucket = if cps == Count::MAX {
            Count::MAX / self.ticks as Count
        } else {
            self.cap_for(cps) / self.ticks as Count
        };

        let now = clock::elapsed();
        let mut state = self.state.lock().expect("counter mutex poisoned");
        for bucket in state.buckets.iter_mut() {
            *bucket = per_bucket;
        }
        state.head_time = clock::truncate(now, self.tick_duration);
        let interval_aligned = clock::truncate(now, self.interval);
        state.head_index = ((now - interval_aligned).as_nanos() / self.tick_duration.as_nanos()) as usize
            % self.ticks as usize;
        let head_index = state.head_index;
        state.buckets[head_index] = 0;
    }
}
