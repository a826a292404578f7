//! Shared numeric aliases and the f64-overflow defense used by [`crate::counter::Counter`].

use std::sync::OnceLock;

/// A count admitted by the limiter. Usually bytes, but the library is generic
/// over whatever unit the caller feeds it.
pub type Count = i64;

/// `cps * interval_seconds` is computed in `f64` to avoid integer overflow for
/// absurd `cps` values, then clamped to this constant before casting back to
/// `i64`. Without the clamp, `f64::MAX as i64` saturates to `i64::MAX`, which
/// is fine, but intermediate values near `i64::MAX` that are *not* exactly
/// representable in `f64` round unpredictably when cast back. This is the
/// largest `k` with `k == (k as f64) as i64`, found once via binary search
/// rather than a linear scan down from `i64::MAX`.
pub fn max_exact_i64_as_f64() -> i64 {
    static MAX: OnceLock<i64> = OnceLock::new();
    *MAX.get_or_init(|| {
        let exact = |k: i64| (k as f64) as i64 == k;
        debug_assert!(exact(0));
        let (mut lo, mut hi) = (0i64, i64::MAX);
        // Invariant: `exact(lo)` holds, `exact(hi)` may or may not.
        // i64::MAX itself is not exactly representable, so this always narrows.
        while lo < hi {
            // Avoid overflow in (lo + hi) / 2 when hi is i64::MAX.
            let mid = lo + (hi - lo) / 2 + 1;
            if exact(mid) {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        lo
    })
}
