use crate::deadline::Deadline;
use crate::source::MetricSource;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::time::Duration;
use sysgraph_core::{MetricKind, MonitorError, Reading, Result};

/// One scripted outcome of [`FakeSource::sample`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FakeReading {
    Value(f32),
    Unavailable,
    Timeout,
    /// A failure that is not a sensor fault (surfaces as an I/O error).
    Broken,
}

impl FakeReading {
    fn into_result(self, kind: MetricKind, delay: Duration) -> Result<Reading> {
        match self {
            Self::Value(v)    => Ok(Reading::new(v)),
            Self::Unavailable => Err(MonitorError::unavailable(kind, "fake sensor offline")),
            Self::Timeout     => Err(MonitorError::SensorTimeout {
                kind,
                elapsed: delay,
                limit:   Duration::ZERO,
            }),
            Self::Broken      => Err(io::Error::other(format!("fake {kind} source broke")).into()),
        }
    }
}

/// Scripted [`MetricSource`] used in tests to inject values and faults.
///
/// Each kind replays its script in order; once a script runs dry the kind's
/// fallback (set by [`steady`](Self::steady) or [`failing`](Self::failing))
/// repeats forever.  A kind with neither is unavailable.
#[derive(Debug, Default)]
pub struct FakeSource {
    scripts:   HashMap<MetricKind, VecDeque<FakeReading>>,
    fallback:  HashMap<MetricKind, FakeReading>,
    delays:    HashMap<MetricKind, Duration>,
    deadlines: HashMap<MetricKind, Deadline>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(mut self, kind: MetricKind, readings: impl IntoIterator<Item = FakeReading>) -> Self {
        self.scripts.entry(kind).or_default().extend(readings);
        self
    }

    pub fn steady(mut self, kind: MetricKind, value: f32) -> Self {
        self.fallback.insert(kind, FakeReading::Value(value));
        self
    }

    pub fn failing(mut self, kind: MetricKind) -> Self {
        self.fallback.insert(kind, FakeReading::Unavailable);
        self
    }

    /// Block every `kind` sample for `delay`, like a CPU averaging read or a
    /// filesystem that stopped answering.
    pub fn with_delay(mut self, kind: MetricKind, delay: Duration) -> Self {
        self.delays.insert(kind, delay);
        self
    }

    /// Bound every read by `limit`, the way [`crate::SysinfoSource`] does.
    pub fn with_deadline(mut self, limit: Duration) -> Self {
        self.deadlines = MetricKind::ALL
            .iter()
            .map(|&kind| (kind, Deadline::new(kind, limit)))
            .collect();
        self
    }
}

impl MetricSource for FakeSource {
    fn sample(&mut self, kind: MetricKind) -> Result<Reading> {
        let next = self
            .scripts
            .get_mut(&kind)
            .and_then(VecDeque::pop_front)
            .or_else(|| self.fallback.get(&kind).copied())
            .unwrap_or(FakeReading::Unavailable);
        let delay = self.delays.get(&kind).copied().unwrap_or_default();

        let read = move || {
            if !delay.is_zero() {
                std::thread::sleep(delay);
            }
            next.into_result(kind, delay)
        };

        match self.deadlines.get(&kind) {
            Some(deadline) => deadline.run(read),
            None => read(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn replays_script_then_fallback() {
        let mut source = FakeSource::new()
            .script(MetricKind::Cpu, [FakeReading::Value(10.0), FakeReading::Timeout])
            .steady(MetricKind::Cpu, 55.0);

        assert_eq!(source.sample(MetricKind::Cpu).unwrap().value(), 10.0);
        assert!(matches!(
            source.sample(MetricKind::Cpu),
            Err(MonitorError::SensorTimeout { .. })
        ));
        assert_eq!(source.sample(MetricKind::Cpu).unwrap().value(), 55.0);
        assert_eq!(source.sample(MetricKind::Cpu).unwrap().value(), 55.0);
    }

    #[test]
    fn unscripted_kind_is_unavailable() {
        let mut source = FakeSource::new().steady(MetricKind::Cpu, 1.0);
        assert!(matches!(
            source.sample(MetricKind::Disk),
            Err(MonitorError::SensorUnavailable { kind: MetricKind::Disk, .. })
        ));
    }

    #[test]
    fn values_are_clamped() {
        let mut source = FakeSource::new().steady(MetricKind::Memory, 250.0);
        assert_eq!(source.sample(MetricKind::Memory).unwrap().value(), 100.0);
    }

    #[test]
    fn broken_is_not_a_sensor_error() {
        let mut source = FakeSource::new().script(MetricKind::Disk, [FakeReading::Broken]);
        let err = source.sample(MetricKind::Disk).unwrap_err();
        assert!(matches!(err, MonitorError::Io { .. }));
        assert!(!err.is_sensor_error());
    }

    #[test]
    fn slow_kind_times_out_under_a_deadline() {
        let mut source = FakeSource::new()
            .steady(MetricKind::Disk, 10.0)
            .steady(MetricKind::Cpu, 20.0)
            .with_delay(MetricKind::Disk, Duration::from_secs(2))
            .with_deadline(Duration::from_millis(40));

        let started = Instant::now();
        assert!(matches!(
            source.sample(MetricKind::Disk),
            Err(MonitorError::SensorTimeout { kind: MetricKind::Disk, .. })
        ));
        assert_eq!(source.sample(MetricKind::Cpu).unwrap().value(), 20.0);
        assert!(started.elapsed() < Duration::from_millis(500));
    }
}
