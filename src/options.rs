//! The option list consumed by [`crate::io::StandaloneWriter::new`].
//!
//! A closed enum means "unrecognized option" is a compile error rather
//! than a runtime one, so [`crate::error::GuardError::UnknownOption`] is
//! reserved for invalid *values* within a recognized option.

use std::time::Duration;

use crate::types::Count;

/// One configuration knob for a [`crate::io::StandaloneWriter`].
///
/// Later entries in the slice passed to `StandaloneWriter::new` override
/// earlier ones — a single left-to-right fold over the whole list.
#[derive(Debug, Clone, Copy)]
pub enum WriterOption {
    /// Measurement window and bucket count. Default: 30s / 30 ticks.
    Interval(Duration, u32),
    /// Initial counts-per-second. `<= 0` means unlimited. Default: unlimited.
    Speed(Count),
    /// Drop overflow instead of blocking. Default: `false`.
    Discard(bool),
    /// In discard mode, suppress [`crate::error::FlowError::Exceeded`] and
    /// report the whole buffer as written instead. Default: `true`.
    NoError(bool),
}

/// The folded, validated configuration produced from a `&[WriterOption]`.
pub(crate) struct WriterConfig {
    pub interval: Duration,
    pub ticks: u32,
    pub speed: Count,
    pub discard: bool,
    pub no_error: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        WriterConfig {
            interval: Duration::from_secs(30),
            ticks: 30,
            speed: 0,
            discard: false,
            no_error: true,
        }
    }
}

impl WriterConfig {
    pub(crate) fn fold(opts: &[WriterOption]) -> Result<Self, crate::error::GuardError> {
        let mut cfg = WriterConfig::default();
        for opt in opts {
            match *opt {
                WriterOption::Interval(interval, ticks) => {
                    if ticks == 0 || interval.is_zero() {
                        return Err(crate::error::GuardError::UnknownOption(
                            "Interval: ticks and duration must both be positive".to_string(),
                        ));
                    }
                    cfg.interval = interval;
                    cfg.ticks = ticks;
                }
                WriterOption::Speed(cps) => cfg.speed = cps,
                WriterOption::Discard(v) => cfg.discard = v,
                WriterOption::NoError(v) => cfg.no_error = v,
            }
        }
        Ok(cfg)
    }
}
