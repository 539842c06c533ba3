use serde::{Deserialize, Serialize};
use std::fmt;

/// What a graph measures.  Each kind owns an independent history buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Cpu,
    Memory,
    Disk,
}

impl MetricKind {
    /// Every kind, in default display order.
    pub const ALL: [MetricKind; 3] = [MetricKind::Cpu, MetricKind::Memory, MetricKind::Disk];

    /// Lowercase identifier used in config files and JSON exports.
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Cpu    => "cpu",
            MetricKind::Memory => "memory",
            MetricKind::Disk   => "disk",
        }
    }

    /// Human-facing default label.
    pub fn display_name(self) -> &'static str {
        match self {
            MetricKind::Cpu    => "CPU",
            MetricKind::Memory => "Memory",
            MetricKind::Disk   => "Disk",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sampled utilisation value, always within `[0, 100]`.
///
/// Readings carry no timestamp: their position inside a
/// [`SampleBuffer`](crate::SampleBuffer) is the only temporal signal.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
#[serde(transparent)]
pub struct Reading(f32);

impl Reading {
    pub const MIN: f32 = 0.0;
    pub const MAX: f32 = 100.0;

    /// Build a reading, clamping `value` into `[0, 100]`.  NaN maps to `0`.
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self(Self::MIN);
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    #[inline]
    pub fn value(self) -> f32 {
        self.0
    }
}

impl From<f32> for Reading {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_clamps_out_of_range() {
        assert_eq!(Reading::new(150.0).value(), 100.0);
        assert_eq!(Reading::new(-5.0).value(), 0.0);
        assert_eq!(Reading::new(42.5).value(), 42.5);
    }

    #[test]
    fn reading_nan_is_zero() {
        assert_eq!(Reading::new(f32::NAN).value(), 0.0);
    }

    #[test]
    fn kind_parses_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            kind: MetricKind,
        }
        let w: Wrapper = serde_json::from_str(r#"{"kind":"memory"}"#).unwrap();
        assert_eq!(w.kind, MetricKind::Memory);
        assert_eq!(MetricKind::Cpu.to_string(), "cpu");
    }
}
