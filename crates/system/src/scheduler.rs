use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use sysgraph_core::{MonitorError, Result};
use tokio::sync::watch;
use tokio::task::{self, JoinHandle};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

/// Shortest period the scheduler accepts.
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Running totals of finished ticks.
#[derive(Debug, Default)]
pub struct TickStats {
    completed: AtomicU64,
    failed:    AtomicU64,
}

impl TickStats {
    /// Ticks whose body returned `Ok`.
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Ticks whose body returned an error or panicked.
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> u64 {
        self.completed() + self.failed()
    }
}

/// Fixed-cadence driver for the sampling cycle.
///
/// The first tick fires one full `interval` after [`start`](Self::start).
/// Each body runs on Tokio's blocking pool and is awaited before the next
/// tick is considered, so ticks never overlap.  Ticks missed while a body
/// overran are skipped, not replayed.  A failing or panicking body is logged
/// and counted; the schedule carries on.
///
/// Must be started from inside a Tokio runtime.
pub struct Scheduler {
    stop_tx: watch::Sender<bool>,
    task:    Option<JoinHandle<()>>,
    stats:   Arc<TickStats>,
}

impl Scheduler {
    pub fn start<F>(interval: Duration, on_tick: F) -> Self
    where
        F: Fn() -> Result<()> + Send + Sync + 'static,
    {
        let interval = interval.max(MIN_TICK_INTERVAL);
        let (stop_tx, stop_rx) = watch::channel(false);
        let stats = Arc::new(TickStats::default());

        let task = tokio::spawn(tick_loop(
            interval,
            Arc::new(on_tick),
            stop_rx,
            Arc::clone(&stats),
        ));

        info!("Scheduler started ({} ms interval)", interval.as_millis());

        Self {
            stop_tx,
            task: Some(task),
            stats,
        }
    }

    /// Cancel future ticks.  A tick body already running is left to finish;
    /// no new body starts once this returns.
    pub fn stop(&self) {
        if !self.stop_tx.send_replace(true) {
            info!("Scheduler stopped");
        }
    }

    pub fn is_stopped(&self) -> bool {
        *self.stop_tx.borrow()
    }

    pub fn stats(&self) -> Arc<TickStats> {
        Arc::clone(&self.stats)
    }

    /// [`stop`](Self::stop), then wait for an in-flight tick to finish.
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                error!("Scheduler task ended abnormally: {e}");
            }
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn tick_loop<F>(
    interval: Duration,
    on_tick: Arc<F>,
    mut stop_rx: watch::Receiver<bool>,
    stats: Arc<TickStats>,
) where
    F: Fn() -> Result<()> + Send + Sync + 'static,
{
    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    break;
                }
                continue;
            }
            _ = ticker.tick() => {}
        }

        if *stop_rx.borrow() {
            break;
        }

        let tick = stats.total() + 1;
        let body = Arc::clone(&on_tick);
        let gate = stop_rx.clone();

        // The blocking pool may start the closure after a `stop()` that raced
        // the check above, so it checks again before running the body.
        let outcome = task::spawn_blocking(move || run_unless_stopped(&gate, &*body)).await;

        match outcome {
            Ok(None) => break,
            Ok(Some(Ok(()))) => {
                stats.completed.fetch_add(1, Ordering::Relaxed);
                debug!(tick, "tick complete");
            }
            Ok(Some(Err(e))) => {
                stats.failed.fetch_add(1, Ordering::Relaxed);
                let err = match e {
                    MonitorError::SchedulerTick(_) => e,
                    other => MonitorError::SchedulerTick(other.to_string()),
                };
                error!(tick, "{err}");
            }
            Err(join) => {
                stats.failed.fetch_add(1, Ordering::Relaxed);
                let err = MonitorError::SchedulerTick(format!("tick body panicked: {join}"));
                error!(tick, "{err}");
            }
        }
    }

    debug!("tick loop exited");
}

/// `None` without calling `body` once the stop flag is set.
fn run_unless_stopped<F>(stop: &watch::Receiver<bool>, body: &F) -> Option<Result<()>>
where
    F: Fn() -> Result<()> + ?Sized,
{
    if *stop.borrow() {
        return None;
    }
    Some(body())
}
