//! [`Controller`] owns the aggregate [`Counter`] shared by every [`Limiter`]
//! it creates, plus the runtime-mutable aggregate and per-child CPS limits.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::counter::Counter;
use crate::error::GuardError;
use crate::limiter::Limiter;
use crate::types::Count;

/// A non-positive configured limit means "unlimited" and is represented
/// internally as the largest representable count.
fn normalize(cps: Count) -> Count {
    if cps <= 0 {
        Count::MAX
    } else {
        cps
    }
}

/// Owns the aggregate counter shared by a family of [`Limiter`]s, and the
/// two runtime-mutable CPS limits (`common`, applied to the sum of all
/// Limiters; `per_child`, the default applied to each new Limiter).
pub struct Controller {
    interval: std::time::Duration,
    ticks: u32,
    aggregate: Counter,
    common_cps: AtomicI64,
    per_child_cps: AtomicI64,
}

impl Controller {
    /// Creates a controller. `common_cps`/`per_child_cps` <= 0 mean unlimited.
    ///
    /// Resets the aggregate counter to the new `common_cps` immediately, so a
    /// freshly created controller never permits a burst beyond its configured
    /// aggregate rate.
    pub fn new(
        interval: std::time::Duration,
        ticks: u32,
        common_cps: Count,
        per_child_cps: Count,
    ) -> Result<Arc<Self>, GuardError> {
        let common_cps = normalize(common_cps);
        let per_child_cps = normalize(per_child_cps);
        let aggregate = Counter::new(interval, ticks)?;
        aggregate.reset(common_cps);

        debug!(
            interval_ms = interval.as_millis() as u64,
            ticks, common_cps, per_child_cps, "controller created"
        );

        Ok(Arc::new(Controller {
            interval,
            ticks,
            aggregate,
            common_cps: AtomicI64::new(common_cps),
            per_child_cps: AtomicI64::new(per_child_cps),
        }))
    }

    pub(crate) fn interval(&self) -> std::time::Duration {
        self.interval
    }

    pub(crate) fn ticks(&self) -> u32 {
        self.ticks
    }

    pub(crate) fn aggregate(&self) -> &Counter {
        &self.aggregate
    }

    pub(crate) fn common_cps(&self) -> Count {
        self.common_cps.load(Ordering::Relaxed)
    }

    pub(crate) fn per_child_cps(&self) -> Count {
        self.per_child_cps.load(Ordering::Relaxed)
    }

    /// Creates a new [`Limiter`] whose per-flow cap starts at the current
    /// per-child default.
    ///
    /// Takes `Arc<Self>` by value — call it as `controller.clone().born_limiter()`
    /// when more than one Limiter will be born from the same controller.
    pub fn born_limiter(self: Arc<Self>) -> Result<Limiter, GuardError> {
        Limiter::new(self)
    }

    /// Sets the aggregate CPS limit shared by every Limiter of this
    /// controller, and reseeds the aggregate counter so the change takes
    /// effect without granting an instant burst.
    pub fn set_common_cps(&self, cps: Count) {
        let cps = normalize(cps);
        self.common_cps.store(cps, Ordering::SeqCst);
        self.aggregate.reset(cps);
        debug!(common_cps = cps, "controller common cps updated");
    }

    /// Sets the default per-flow CPS applied to future and existing
    /// Limiters. Existing Limiters pick this up lazily, the next time they
    /// observe the change inside `fill_up` (see [`Limiter::fill_up`]).
    pub fn set_per_child_cps(&self, cps: Count) {
        let cps = normalize(cps);
        self.per_child_cps.store(cps, Ordering::SeqCst);
        debug!(per_child_cps = cps, "controller per-child cps updated");
    }
}
