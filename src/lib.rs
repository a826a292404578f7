//! Hierarchical sliding-window bandwidth limiting for byte-oriented stream I/O.
//!
//! This crate shapes throughput per-connection, per-server, or across a
//! group of connections, both at configuration time and dynamically at
//! runtime. The hard part is the sliding-window [`Counter`] at the bottom —
//! a bounded-interval accumulator that admits counts up to a cap derived
//! from a counts-per-second (CPS) rate — and the composition of three such
//! counters (per-flow, per-group-default, per-group-aggregate) into a
//! [`Limiter`]/[`Controller`] pair whose limits can change at runtime
//! without a structural reconfiguration.
//!
//! # Quick start
//!
//! ```rust
//! use std::time::Duration;
//! use std::sync::Arc;
//! use stream_guard_io::Controller;
//! use stream_guard_io::io::Reader;
//!
//! // One shared aggregate cap of 1000 counts/sec, 200/sec default per flow.
//! let controller = Controller::new(Duration::from_secs(1), 30, 1000, 200).unwrap();
//! let limiter = Arc::new(controller.clone().born_limiter().unwrap());
//!
//! let data = std::io::Cursor::new(vec![0u8; 64]);
//! let mut reader = Reader::new(data, limiter, false);
//! let mut buf = [0u8; 64];
//! let (n, result) = reader.read_flow(&mut buf);
//! assert!(result.is_ok());
//! assert_eq!(n, 64);
//! ```
//!
//! # Module map
//!
//! - [`counter`] — the sliding-window accumulator ([`Counter`]), the
//!   arithmetic heart of the crate.
//! - [`controller`] and [`limiter`] — the hierarchical composition
//!   ([`Controller`], [`Limiter`]) that turns three independent windows
//!   into one "min of three" admission decision.
//! - [`io`] — [`io::Reader`], [`io::Writer`], and [`io::StandaloneWriter`],
//!   the stream adapters that turn an admitted count into forward I/O
//!   progress.
//! - [`options`] — the option list consumed by [`io::StandaloneWriter::new`].
//! - [`error`] — [`error::GuardError`] (programmer errors) and
//!   [`error::FlowError`] (recoverable deadline/exceeded conditions).
//!
//! # Accuracy
//!
//! No token-bucket burst smoothing beyond what the sliding window implies,
//! no fair scheduling between flows beyond "first to observe free capacity
//! wins", no persistent state, no cross-process coordination. Accuracy is
//! bounded by `interval / ticks` and is expected to stay within ≈5% of the
//! configured CPS over a measurement window at least `interval` long.

mod clock;
mod deadline;
pub mod error;
pub mod io;
pub mod options;
pub mod types;

mod counter;
mod controller;
mod limiter;

pub use controller::Controller;
pub use counter::Counter;
pub use error::{FlowError, GuardError};
pub use limiter::Limiter;
pub use types::Count;
