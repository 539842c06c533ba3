use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};
use std::time::Duration;
use sysgraph_config::MonitorConfig;
use sysgraph_core::{MetricKind, MonitorError, Reading, Result, SampleBuffer};
use sysgraph_system::{MetricSource, Scheduler, SysinfoSource, TickStats};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Pending "graphs are stale" notifications kept before new ones are dropped.
const STALE_QUEUE: usize = 4;

/// One lock-guarded history per tracked metric.
///
/// Each buffer has its own lock, so different metrics never contend.
#[derive(Debug)]
pub struct BufferSet {
    buffers:  HashMap<MetricKind, RwLock<SampleBuffer>>,
    capacity: usize,
}

impl BufferSet {
    pub fn new(kinds: &[MetricKind], capacity: usize) -> Self {
        Self {
            buffers: kinds
                .iter()
                .map(|&k| (k, RwLock::new(SampleBuffer::new(capacity))))
                .collect(),
            capacity: capacity.max(1),
        }
    }

    /// Append to `kind`'s history.  Returns `false` for an untracked kind.
    pub fn push(&self, kind: MetricKind, value: f32) -> bool {
        let Some(lock) = self.buffers.get(&kind) else {
            return false;
        };
        lock.write().unwrap_or_else(PoisonError::into_inner).push(value);
        true
    }

    /// Copy of `kind`'s history, oldest first.  Empty for an untracked kind.
    pub fn snapshot(&self, kind: MetricKind) -> Vec<Reading> {
        self.buffers
            .get(&kind)
            .map(|lock| lock.read().unwrap_or_else(PoisonError::into_inner).snapshot())
            .unwrap_or_default()
    }

    pub fn latest(&self, kind: MetricKind) -> Option<Reading> {
        self.buffers
            .get(&kind)
            .and_then(|lock| lock.read().unwrap_or_else(PoisonError::into_inner).latest())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Composition root of the sampling pipeline.
///
/// Owns one [`SampleBuffer`] per tracked metric and, once started, a
/// [`Scheduler`] whose ticks sample every metric off the async threads,
/// push the readings, and announce the affected kinds on the receiver
/// returned by [`start`](Self::start).  Drawing code reads the buffers only
/// through [`snapshot`](Self::snapshot).
///
/// Cloning is cheap; clones share the same buffers and scheduler.
#[derive(Clone)]
pub struct MonitorWidget {
    inner: Arc<Inner>,
}

struct Inner {
    kinds:     Vec<MetricKind>,
    interval:  Duration,
    buffers:   Arc<BufferSet>,
    source:    Arc<Mutex<Box<dyn MetricSource>>>,
    scheduler: Mutex<Option<Scheduler>>,
}

impl MonitorWidget {
    pub fn new(
        kinds: Vec<MetricKind>,
        capacity: usize,
        interval: Duration,
        source: impl MetricSource + 'static,
    ) -> Self {
        let buffers = Arc::new(BufferSet::new(&kinds, capacity));
        let source: Box<dyn MetricSource> = Box::new(source);
        Self {
            inner: Arc::new(Inner {
                kinds,
                interval,
                buffers,
                source: Arc::new(Mutex::new(source)),
                scheduler: Mutex::new(None),
            }),
        }
    }

    /// Build a widget sampling the host through `sysinfo`.
    pub fn from_config(config: &MonitorConfig) -> Self {
        let s = &config.sampler;
        let source = SysinfoSource::new(s.cpu_window(), s.timeout(), s.disk_mount.clone());
        Self::new(config.tracked_kinds(), s.capacity, s.interval(), source)
    }

    /// Start sampling on the current Tokio runtime.
    ///
    /// The receiver yields the kinds refreshed by each tick.  Calling `start`
    /// again restarts the schedule; the previous receiver then closes.
    pub fn start(&self) -> mpsc::Receiver<Vec<MetricKind>> {
        let (tx, rx) = mpsc::channel(STALE_QUEUE);

        let body = tick_body(
            self.inner.kinds.clone(),
            Arc::clone(&self.inner.source),
            Arc::downgrade(&self.inner.buffers),
            tx,
        );

        let mut slot = self.inner.scheduler.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.take() {
            warn!("Monitor already running; restarting");
            previous.stop();
        }
        *slot = Some(Scheduler::start(self.inner.interval, body));

        info!(
            "Monitoring {:?} every {} ms (history {})",
            self.inner.kinds,
            self.inner.interval.as_millis(),
            self.inner.buffers.capacity()
        );
        rx
    }

    /// Stop scheduling ticks.  An in-flight tick may still finish.
    pub fn stop(&self) {
        let slot = self.inner.scheduler.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(scheduler) = slot.as_ref() {
            scheduler.stop();
        }
    }

    /// Stop and wait for an in-flight tick to finish.
    pub async fn shutdown(&self) {
        let scheduler = self
            .inner
            .scheduler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(scheduler) = scheduler {
            scheduler.shutdown().await;
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner
            .scheduler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|s| !s.is_stopped())
    }

    /// Tick counters of the running schedule, if started.
    pub fn tick_stats(&self) -> Option<Arc<TickStats>> {
        self.inner
            .scheduler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(Scheduler::stats)
    }

    pub fn snapshot(&self, kind: MetricKind) -> Vec<Reading> {
        self.inner.buffers.snapshot(kind)
    }

    pub fn latest(&self, kind: MetricKind) -> Option<Reading> {
        self.inner.buffers.latest(kind)
    }

    pub fn capacity(&self) -> usize {
        self.inner.buffers.capacity()
    }

    pub fn kinds(&self) -> &[MetricKind] {
        &self.inner.kinds
    }
}

impl std::fmt::Debug for MonitorWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorWidget")
            .field("kinds", &self.inner.kinds)
            .field("interval", &self.inner.interval)
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}

/// One sampling cycle: sample each kind, push what succeeded, announce it.
///
/// Sensor failures only skip their own metric.  Any other error is reported
/// after the remaining kinds have been sampled.  Readings that arrive after
/// the widget has been dropped are discarded.
fn tick_body(
    kinds: Vec<MetricKind>,
    source: Arc<Mutex<Box<dyn MetricSource>>>,
    buffers: Weak<BufferSet>,
    stale_tx: mpsc::Sender<Vec<MetricKind>>,
) -> impl Fn() -> Result<()> + Send + Sync + 'static {
    move || {
        let mut source = source.lock().unwrap_or_else(PoisonError::into_inner);
        let mut updated = Vec::with_capacity(kinds.len());
        let mut unexpected = Vec::new();

        for &kind in &kinds {
            let reading = match source.sample(kind) {
                Ok(reading) => reading,
                Err(e) if e.is_sensor_error() => {
                    warn!("Skipping {kind} sample: {e}");
                    continue;
                }
                Err(e) => {
                    unexpected.push(format!("{kind}: {e}"));
                    continue;
                }
            };

            let Some(buffers) = buffers.upgrade() else {
                debug!("Monitor dropped; discarding late {kind} reading");
                return Ok(());
            };
            buffers.push(kind, reading.value());
            updated.push(kind);
        }

        // A full queue already holds a pending redraw.
        if !updated.is_empty() && stale_tx.try_send(updated).is_err() {
            debug!("Redraw notification dropped (queue full or closed)");
        }

        if unexpected.is_empty() {
            Ok(())
        } else {
            Err(MonitorError::SchedulerTick(unexpected.join("; ")))
        }
    }
}
