use std::io::{self, Write};
use std::sync::atomic::{AtomicI64, Ordering};
use std::thread;
use std::time::Duration;

use tracing::warn;

use crate::error::{FlowError, GuardError};
use crate::options::{WriterConfig, WriterOption};
use crate::types::Count;
use crate::Counter;

/// A Counter-direct Writer surface: no Controller, no Limiter, configured
/// by an option list instead of a hierarchy, and capable of *discarding*
/// overflow instead of blocking on it — useful for telemetry or log
/// streams where dropping beats stalling.
#[derive(Debug)]
pub struct StandaloneWriter<W> {
    inner: W,
    counter: Counter,
    cps: AtomicI64,
    discard: bool,
    no_error: bool,
    tick_duration: Duration,
}

impl<W> StandaloneWriter<W> {
    pub fn new(inner: W, opts: &[WriterOption]) -> Result<Self, GuardError> {
        let WriterConfig {
            interval,
            ticks,
            speed,
            discard,
            no_error,
        } = WriterConfig::fold(opts)?;

        let counter = Counter::new(interval, ticks)?;
        counter.reset(speed.max(0));

        Ok(StandaloneWriter {
            inner,
            counter,
            cps: AtomicI64::new(speed),
            discard,
            no_error,
            tick_duration: interval / ticks,
        })
    }

    /// Changes the throttling rate at runtime. `<= 0` means unlimited.
    pub fn set_speed(&self, cps: Count) {
        self.cps.store(cps, Ordering::SeqCst);
        self.counter.reset(cps.max(0));
    }

    /// Returns the currently configured counts-per-second.
    pub fn speed(&self) -> Count {
        self.cps.load(Ordering::Relaxed)
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> StandaloneWriter<W> {
    pub fn write_flow(&mut self, buf: &[u8]) -> (usize, Result<(), FlowError>) {
        if buf.is_empty() {
            return (0, Ok(()));
        }

        let cps = self.cps.load(Ordering::Relaxed);
        if cps <= 0 {
            return match self.inner.write(buf) {
                Ok(n) => {
                    self.counter.fill_up(n as Count);
                    (n, Ok(()))
                }
                Err(e) => (0, Err(FlowError::Io(e))),
            };
        }

        if self.discard {
            self.write_discard(buf, cps)
        } else {
            self.write_delay(buf, cps)
        }
    }

    fn write_discard(&mut self, buf: &[u8], cps: Count) -> (usize, Result<(), FlowError>) {
        let mut written = 0usize;
        while written < buf.len() {
            let remaining = (buf.len() - written) as Count;
            let allowed = self.counter.fill_up_to_cap(remaining, cps);
            if allowed <= 0 {
                if self.no_error {
                    return (buf.len(), Ok(()));
                }
                warn!("standalone writer exceeded bandwidth limit");
                return (written, Err(FlowError::Exceeded));
            }

            let allowed = allowed as usize;
            match self.inner.write(&buf[written..written + allowed]) {
                Ok(n) => {
                    if n < allowed {
                        self.counter.fill_up(n as Count - allowed as Count);
                    }
                    written += n;
                }
                Err(e) => {
                    self.counter.fill_up(-(allowed as Count));
                    return (written, Err(FlowError::Io(e)));
                }
            }
        }
        (written, Ok(()))
    }

    fn write_delay(&mut self, buf: &[u8], cps: Count) -> (usize, Result<(), FlowError>) {
        let mut written = 0usize;
        while written < buf.len() {
            let remaining = (buf.len() - written) as Count;
            let allowed = self.counter.fill_up_to_cap(remaining, cps);
            if allowed <= 0 {
                thread::sleep(self.tick_duration);
                continue;
            }

            let allowed = allowed as usize;
            match self.inner.write(&buf[written..written + allowed]) {
                Ok(n) => {
                    if n < allowed {
                        self.counter.fill_up(n as Count - allowed as Count);
                    }
                    written += n;
                }
                Err(e) => {
                    self.counter.fill_up(-(allowed as Count));
                    return (written, Err(FlowError::Io(e)));
                }
            }
        }
        (written, Ok(()))
    }
}

impl<W: Write> Write for StandaloneWriter<W> {
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
