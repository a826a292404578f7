use std::io::{self, Write};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use tracing::warn;

use crate::clock;
use crate::deadline::Deadline;
use crate::error::FlowError;
use crate::limiter::Limiter;
use crate::types::Count;

/// Wraps an [`std::io::Write`] sink so every write is throttled by a
/// [`Limiter`], looping internally until the whole buffer has been
/// accepted, a deadline passes, or `fragile` rejects a stall.
///
/// This is the hierarchical surface — see [`crate::io::StandaloneWriter`]
/// for the Counter-direct, discard-capable sibling.
pub struct Writer<W> {
    inner: W,
    limiter: Arc<Limiter>,
    fragile: bool,
    deadline: Deadline,
}

impl<W> Writer<W> {
    pub fn new(inner: W, limiter: Arc<Limiter>, fragile: bool) -> Self {
        Writer {
            inner,
            limiter,
            fragile,
            deadline: Deadline::unset(),
        }
    }

    pub fn set_deadline(&self, at: Option<Instant>) {
        self.deadline.set(at.map(clock::since_origin));
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Writer<W> {
    /// Drains `buf` into the inner sink, never sending more than the
    /// limiter admits per iteration. Returns the number of bytes actually
    /// written, which is `buf.len()` on `Ok(())`.
    pub fn write_flow(&mut self, buf: &[u8]) -> (usize, Result<(), FlowError>) {
        if buf.is_empty() {
            return (0, Ok(()));
        }

        let mut written = 0usize;
        while written < buf.len() {
            if self.deadline.is_expired() {
                warn!("writer deadline exceeded");
                return (written, Err(FlowError::Deadline));
            }

            let remaining = (buf.len() - written) as Count;
            let allowed = self.limiter.fill_up(remaining);
            if allowed <= 0 {
                if self.fragile {
                    warn!("writer exceeded bandwidth limit (fragile)");
                    return (written, Err(FlowError::Exceeded));
                }
                thread::sleep(self.limiter.tick_duration());
                continue;
            }

            let allowed = allowed as usize;
            match self.inner.write(&buf[written..written + allowed]) {
                Ok(n) => {
                    if n < allowed {
                        self.limiter.fill_up(n as Count - allowed as Count);
                    }
                    written += n;
                }
                Err(e) => {
                    self.limiter.fill_up(-(allowed as Count));
                    return (written, Err(FlowError::Io(e)));
                }
            }
        }

        (written, Ok(()))
    }
}

impl<W: Write> Write for Writer<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let (n, result) = self.write_flow(buf);
        match result {
            Ok(()) => Ok(n),
            Err(_) if n > 0 => Ok(n),
            Err(e) => Err(e.into()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
