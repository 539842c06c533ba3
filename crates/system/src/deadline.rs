use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};
use sysgraph_core::{MetricKind, MonitorError, Result};
use tracing::{debug, warn};

/// Bounds how long one metric's blocking read may take.
///
/// Each [`run`](Self::run) executes the read on a short-lived helper thread
/// and waits at most `limit` for it.  A read still going at the deadline is
/// abandoned: its result is dropped when it eventually arrives, and until it
/// does every further read of the same kind fails fast with
/// [`MonitorError::SensorTimeout`] instead of stacking up another thread.
#[derive(Debug)]
pub struct Deadline {
    kind:    MetricKind,
    limit:   Duration,
    pending: Arc<Mutex<Option<Instant>>>,
}

impl Deadline {
    pub fn new(kind: MetricKind, limit: Duration) -> Self {
        Self {
            kind,
            limit,
            pending: Arc::new(Mutex::new(None)),
        }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    /// `true` while an abandoned read of this kind is still running.
    pub fn is_stuck(&self) -> bool {
        self.lock_pending().is_some()
    }

    /// Run `read` and wait for it until the deadline.
    ///
    /// # Errors
    /// Whatever `read` returns; [`MonitorError::SensorTimeout`] when it is
    /// still running at the deadline (or an earlier read still is);
    /// [`MonitorError::SensorUnavailable`] when the read panics or no helper
    /// thread can be spawned.
    pub fn run<T, F>(&self, read: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let started = Instant::now();
        {
            let mut pending = self.lock_pending();
            if let Some(since) = *pending {
                return Err(self.timeout(since.elapsed()));
            }
            *pending = Some(started);
        }

        let (tx, rx) = mpsc::sync_channel(1);
        let pending = Arc::clone(&self.pending);
        let spawned = thread::Builder::new()
            .name(format!("sensor-{}", self.kind))
            .spawn(move || {
                let result = read();
                *pending.lock().unwrap_or_else(PoisonError::into_inner) = None;
                // The caller may have given up already.
                let _ = tx.send(result);
            });

        if let Err(e) = spawned {
            *self.lock_pending() = None;
            return Err(MonitorError::unavailable(
                self.kind,
                format!("cannot spawn sensor thread: {e}"),
            ));
        }

        match rx.recv_timeout(self.limit) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                warn!("{} read still running after {:?}; abandoning it", self.kind, self.limit);
                Err(self.timeout(started.elapsed()))
            }
            Err(RecvTimeoutError::Disconnected) => {
                *self.lock_pending() = None;
                debug!("{} sensor thread exited without a result", self.kind);
                Err(MonitorError::unavailable(self.kind, "sensor read panicked"))
            }
        }
    }

    fn timeout(&self, elapsed: Duration) -> MonitorError {
        MonitorError::SensorTimeout {
            kind: self.kind,
            elapsed,
            limit: self.limit,
        }
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, Option<Instant>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
