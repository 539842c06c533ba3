use crate::deadline::Deadline;
use crate::{cpu, disk, memory, unsupported};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use sysgraph_core::{MetricKind, Reading, Result};
use sysinfo::System;
use tracing::debug;

/// Produces one utilisation reading per call.
///
/// `sample` is a **blocking** call.  For [`MetricKind::Cpu`] it blocks for
/// the whole averaging window (typically 0.1 – 1 s), memory and disk return
/// at syscall speed.  Callers must run it on a worker thread, never on the
/// thread that services the render surface.
pub trait MetricSource: Send {
    /// Sample `kind` now.
    ///
    /// # Errors
    /// [`sysgraph_core::MonitorError::SensorUnavailable`] when the OS cannot report `kind`,
    /// [`sysgraph_core::MonitorError::SensorTimeout`] when the measurement overran its
    /// bounded window.  Implementations bound their own reads (see
    /// [`Deadline`]); a read that never returns stalls every metric behind it.
    fn sample(&mut self, kind: MetricKind) -> Result<Reading>;
}

impl<S: MetricSource + ?Sized> MetricSource for Box<S> {
    fn sample(&mut self, kind: MetricKind) -> Result<Reading> {
        (**self).sample(kind)
    }
}

/// [`MetricSource`] backed by the `sysinfo` crate.
///
/// Every read runs under a per-kind [`Deadline`], so a sensor that hangs
/// (a stale network mount, say) times out on its own without stalling the
/// other metrics.
pub struct SysinfoSource {
    cpu_sys:    Arc<Mutex<System>>,
    mem_sys:    Arc<Mutex<System>>,
    cpu_window: Duration,
    disk_mount: Arc<Path>,
    deadlines:  HashMap<MetricKind, Deadline>,
}

impl SysinfoSource {
    /// `cpu_window` is the CPU averaging interval; any measurement still
    /// running after `timeout` (at least twice the window) is abandoned as a
    /// [`sysgraph_core::MonitorError::SensorTimeout`].
    pub fn new(cpu_window: Duration, timeout: Duration, disk_mount: impl Into<PathBuf>) -> Self {
        // Leave the CPU read room for its two refreshes around the window.
        let timeout = timeout.max(cpu::effective_window(cpu_window) * 2);
        Self {
            cpu_sys: Arc::new(Mutex::new(System::new())),
            mem_sys: Arc::new(Mutex::new(System::new())),
            cpu_window,
            disk_mount: Arc::from(disk_mount.into()),
            deadlines: MetricKind::ALL
                .iter()
                .map(|&kind| (kind, Deadline::new(kind, timeout)))
                .collect(),
        }
    }

    pub fn cpu_window(&self) -> Duration {
        cpu::effective_window(self.cpu_window)
    }

    pub fn timeout(&self) -> Duration {
        self.deadlines
            .get(&MetricKind::Cpu)
            .map_or(Duration::ZERO, Deadline::limit)
    }

    fn read(&self, kind: MetricKind, deadline: &Deadline) -> Result<f32> {
        match kind {
            MetricKind::Cpu => {
                let sys = Arc::clone(&self.cpu_sys);
                let window = self.cpu_window;
                deadline.run(move || {
                    let mut sys = sys.lock().unwrap_or_else(PoisonError::into_inner);
                    Ok(cpu::measure(&mut sys, window))
                })
            }
            MetricKind::Memory => {
                let sys = Arc::clone(&self.mem_sys);
                deadline.run(move || {
                    let mut sys = sys.lock().unwrap_or_else(PoisonError::into_inner);
                    memory::read(&mut sys)
                })
            }
            MetricKind::Disk => {
                let mount = Arc::clone(&self.disk_mount);
                deadline.run(move || disk::read(&mount))
            }
        }
    }
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new(Duration::from_millis(100), Duration::from_secs(2), "/")
    }
}

impl MetricSource for SysinfoSource {
    fn sample(&mut self, kind: MetricKind) -> Result<Reading> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(unsupported(kind));
        }
        let deadline = self.deadlines.get(&kind).ok_or_else(|| unsupported(kind))?;

        let started = Instant::now();
        let value = self.read(kind, deadline)?;
        debug!(%kind, value, elapsed = ?started.elapsed(), "sampled");
        Ok(Reading::new(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sysgraph_core::MonitorError;

    #[test]
    fn timeout_is_never_shorter_than_cpu_window() {
        let source = SysinfoSource::new(Duration::from_millis(500), Duration::from_millis(10), "/");
        assert!(source.timeout() >= Duration::from_millis(500));
    }

    #[test]
    fn memory_reading_is_a_percentage() {
        let mut source = SysinfoSource::default();
        match source.sample(MetricKind::Memory) {
            Ok(reading) => assert!((0.0..=100.0).contains(&reading.value())),
            Err(e) => assert!(e.is_sensor_error(), "unexpected error: {e}"),
        }
    }

    #[test]
    fn cpu_reading_blocks_for_its_window() {
        let mut source = SysinfoSource::new(Duration::from_millis(200), Duration::from_secs(5), "/");
        let started = Instant::now();
        let result = source.sample(MetricKind::Cpu);
        if result.is_ok() {
            assert!(started.elapsed() >= source.cpu_window());
        }
    }

    #[test]
    fn cpu_read_longer_than_timeout_is_abandoned() {
        let mut source = SysinfoSource::new(Duration::from_millis(300), Duration::ZERO, "/");
        assert!(source.timeout() >= Duration::from_millis(600));
        // Shrink the CPU deadline below the averaging window.
        source
            .deadlines
            .insert(MetricKind::Cpu, Deadline::new(MetricKind::Cpu, Duration::from_millis(50)));

        let started = Instant::now();
        let result = source.sample(MetricKind::Cpu);
        if sysinfo::IS_SUPPORTED_SYSTEM {
            assert!(matches!(result, Err(MonitorError::SensorTimeout { kind: MetricKind::Cpu, .. })));
            assert!(started.elapsed() < source.cpu_window());
            // Memory has its own deadline and is not held up.
            match source.sample(MetricKind::Memory) {
                Ok(reading) => assert!((0.0..=100.0).contains(&reading.value())),
                Err(e) => assert!(e.is_sensor_error(), "unexpected error: {e}"),
            }
        }
    }
}
