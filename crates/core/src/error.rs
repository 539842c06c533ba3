use crate::metric::MetricKind;
use std::time::Duration;
use thiserror::Error;

/// Top-level error type used across the entire application.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The OS cannot report this metric (unsupported platform, missing
    /// permission, no matching sensor or mount).
    #[error("{kind} sensor unavailable: {reason}")]
    SensorUnavailable { kind: MetricKind, reason: String },

    /// A measurement ran past its bounded window and was discarded.
    #[error("{kind} sensor timed out after {elapsed:?} (limit {limit:?})")]
    SensorTimeout {
        kind:    MetricKind,
        elapsed: Duration,
        limit:   Duration,
    },

    /// Unexpected failure inside a scheduler tick body.
    #[error("scheduler tick error: {0}")]
    SchedulerTick(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("export error: {0}")]
    Export(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl MonitorError {
    pub fn unavailable(kind: MetricKind, reason: impl Into<String>) -> Self {
        Self::SensorUnavailable { kind, reason: reason.into() }
    }

    /// `true` for the per-metric sensor failures a tick recovers from by
    /// skipping that metric's push.
    #[must_use]
    pub fn is_sensor_error(&self) -> bool {
        matches!(self, Self::SensorUnavailable { .. } | Self::SensorTimeout { .. })
    }
}

pub type Result<T, E = MonitorError> = std::result::Result<T, E>;
