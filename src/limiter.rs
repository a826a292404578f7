//! [`Limiter`] composes a per-flow [`Counter`] with its parent
//! [`Controller`]'s aggregate counter, enforcing the min of three
//! independent CPS windows (own, per-child default, aggregate) purely
//! through composition.

use std::cell::Cell;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::controller::Controller;
use crate::counter::Counter;
use crate::error::GuardError;
use crate::types::Count;

fn normalize(cps: Count) -> Count {
    if cps <= 0 {
        Count::MAX
    } else {
        cps
    }
}

fn min(a: Count, b: Count) -> Count {
    if a < b {
        a
    } else {
        b
    }
}

/// A single flow's rate limit, bounded from above by its owning
/// [`Controller`]'s per-child default and aggregate cap.
///
/// Deliberately `!Sync`: the cached `per_child_cps` read in [`Limiter::fill_up`]
/// is documented (spec §5) as accessed only from the single caller that owns
/// this Limiter. Using a [`Cell`] for that cache, rather than an atomic,
/// makes that contract a compile-time property instead of a comment — a
/// `Limiter` cannot be shared behind `&Limiter` across threads at all.
pub struct Limiter {
    controller: Arc<Controller>,
    local: Counter,
    cps: AtomicI64,
    cached_per_child_cps: Cell<Count>,
}

impl Limiter {
    pub(crate) fn new(controller: Arc<Controller>) -> Result<Self, GuardError> {
        let cps = controller.per_child_cps();
        let local = Counter::new(controller.interval(), controller.ticks())?;
        local.reset(cps);

        Ok(Limiter {
            controller,
            local,
            cps: AtomicI64::new(cps),
            cached_per_child_cps: Cell::new(cps),
        })
    }

    /// The retry delay a non-fragile [`crate::io::Writer`] sleeps for while
    /// waiting for capacity: one tick of this Limiter's controller.
    pub(crate) fn tick_duration(&self) -> std::time::Duration {
        self.controller.interval() / self.controller.ticks()
    }

    /// Sets this flow's own CPS cap. `cps <= 0` means unlimited. Reseeds the
    /// local counter against `min(cps, per_child_cps)` so the change takes
    /// effect immediately without granting a burst.
    pub fn set_cps(&self, cps: Count) {
        let cps = normalize(cps);
        self.cps.store(cps, Ordering::SeqCst);
        self.local.reset(min(cps, self.controller.per_child_cps()));
        debug!(cps, "limiter cps updated");
    }

    /// Admits `n` counts, bounded by the minimum of this Limiter's own cap,
    /// the Controller's per-child default, and the Controller's aggregate
    /// cap. Negative `n` is an unconditional refund.
    pub fn fill_up(&self, n: Count) -> Count {
        if n == 0 {
            return 0;
        }

        if n < 0 {
            self.local.fill_up(n);
            self.controller.aggregate().fill_up(n);
            return n;
        }

        let per_child_cps = self.controller.per_child_cps();
        let eff = min(self.cps.load(Ordering::Relaxed), per_child_cps);

        if self.cached_per_child_cps.get() != per_child_cps {
            self.cached_per_child_cps.set(per_child_cps);
            self.local.reset(eff);
        }

        let admitted_local = self.local.fill_up_to_cap(n, eff);
        let admitted_agg = self
            .controller
            .aggregate()
            .fill_up_to_cap(admitted_local, self.controller.common_cps());

        if admitted_agg < admitted_local {
            self.local.fill_up(admitted_agg - admitted_local);
        }

        if admitted_agg < n {
            trace!(requested = n, admitted = admitted_agg, "partial admission");
        }

        admitted_agg
    }
}
