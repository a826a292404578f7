//! Error taxonomy for the guard: programmer errors vs. recoverable flow control.
//!
//! Two enums, matching the two kinds of failure the design calls out:
//! [`GuardError`] for invalid construction and configuration (never
//! recoverable within the library), and [`FlowError`] for the deadline
//! and bandwidth-exceeded conditions a [`crate::io::Reader`] or
//! [`crate::io::Writer`] returns mid-transfer.

use std::io;

/// Programmer errors: invalid construction parameters or option values.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    /// `ticks` was zero, or `interval` was zero/negative.
    #[error("invalid parameters: ticks and interval must both be positive")]
    InvalidParams,
    /// A [`crate::options::WriterOption`] carried an invalid value (e.g. `Interval` with zero ticks).
    #[error("unknown or invalid writer option: {0}")]
    UnknownOption(String),
}

/// Flow-control conditions returned from the middle of a read or write.
///
/// These carry a partial byte count alongside them at the call site
/// (`(usize, Result<(), FlowError>)`-shaped returns) rather than in the
/// error itself, mirroring the upstream `(n int, err error)` convention.
#[derive(thiserror::Error, Debug)]
pub enum FlowError {
    /// The wrapper's deadline has passed.
    #[error("deadline exceeded")]
    Deadline,
    /// `fragile` is set and the limiter has no capacity to admit.
    #[error("bandwidth exceeded")]
    Exceeded,
    /// The underlying stream returned an I/O error.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl FlowError {
    /// True for conditions a caller should treat like a network timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, FlowError::Deadline)
    }

    /// True for conditions a caller should treat as transient and retryable.
    pub fn is_temporary(&self) -> bool {
        matches!(self, FlowError::Exceeded)
    }
}

impl From<FlowError> for io::Error {
    fn from(e: FlowError) -> io::Error {
        match e {
            FlowError::Deadline => io::Error::new(io::ErrorKind::TimedOut, e.to_string()),
            FlowError::Exceeded => io::Error::new(io::ErrorKind::WouldBlock, e.to_string()),
            FlowError::Io(inner) => inner,
        }
    }
}
