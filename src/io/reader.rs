use std::io::{self, Read};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use tracing::warn;

use crate::clock;
use crate::deadline::Deadline;
use crate::error::FlowError;
use crate::limiter::Limiter;
use crate::types::Count;

use super::READ_RETRY_DELAY;

/// Wraps an [`std::io::Read`] source so every read is throttled by a
/// [`Limiter`].
///
/// `fragile == true` returns [`FlowError::Exceeded`] the instant capacity is
/// unavailable; `fragile == false` retries after a short sleep until
/// capacity frees up or the deadline (if any) passes.
pub struct Reader<R> {
    inner: R,
    limiter: Arc<Limiter>,
    fragile: bool,
    deadline: Deadline,
}

impl<R> Reader<R> {
    pub fn new(inner: R, limiter: Arc<Limiter>, fragile: bool) -> Self {
        Reader {
            inner,
            limiter,
            fragile,
            deadline: Deadline::unset(),
        }
    }

    /// Sets the deadline for future reads. `None` disables it.
    pub fn set_deadline(&self, at: Option<Instant>) {
        self.deadline.set(at.map(clock::since_origin));
    }

    /// Returns the wrapped reader, discarding the throttling state.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Reader<R> {
    /// The native, flow-error-distinguishing read surface described by the
    /// design: `0 <= n <= buf.len()`, and a non-`Io` error never carries
    /// bytes beyond what was actually read before the condition fired.
    pub fn read_flow(&mut self, buf: &mut [u8]) -> (usize, Result<(), FlowError>) {
        if buf.is_empty() {
            return (0, Ok(()));
        }

        loop {
            if self.deadline.is_expired() {
                warn!("reader deadline exceeded");
                return (0, Err(FlowError::Deadline));
            }

            let allowed = self.limiter.fill_up(buf.len() as Count);
            if allowed <= 0 {
                if self.fragile {
                    warn!("reader exceeded bandwidth limit (fragile)");
                    return (0, Err(FlowError::Exceeded));
                }
                thread::sleep(READ_RETRY_DELAY);
                continue;
            }

            let allowed = allowed as usize;
            return match self.inner.read(&mut buf[..allowed]) {
                Ok(n) => {
                    if n < allowed {
                        self.limiter.fill_up(n as Count - allowed as Count);
                    }
                    (n, Ok(()))
                }
                Err(e) => {
                    self.limiter.fill_up(-(allowed as Count));
                    (0, Err(FlowError::Io(e)))
                }
            };
        }
    }
}

impl<R: Read> Read for Reader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let (n, result) = self.read_flow(buf);
        match result {
            Ok(()) => Ok(n),
            Err(_) if n > 0 => Ok(n),
            Err(e) => Err(e.into()),
        }
    }
}
