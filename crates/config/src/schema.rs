use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use sysgraph_core::{MetricKind, DEFAULT_CAPACITY};
use tracing::warn;

/// Shortest accepted sampling / export period.
pub const MIN_INTERVAL_MS: u64 = 100;
/// Bounds for the CPU averaging window.
pub const CPU_WINDOW_RANGE_MS: (u64, u64) = (100, 1_000);

/// Root configuration structure parsed from `sysgraph.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Overlay window geometry and placement.
    pub window: WindowConfig,
    /// Sampling cadence and history depth.
    pub sampler: SamplerConfig,
    /// Graph geometry options.
    pub render: RenderConfig,
    /// Tracked metrics, top to bottom.
    pub graphs: Vec<GraphConfig>,
    /// Theme / visual settings.
    pub theme: ThemeConfig,
    /// Standalone JSON export sink.
    pub export: ExportConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            window:  WindowConfig::default(),
            sampler: SamplerConfig::default(),
            render:  RenderConfig::default(),
            graphs: vec![
                GraphConfig::new(MetricKind::Cpu, "#0000ff"),
                GraphConfig::new(MetricKind::Memory, "#00ff00"),
                GraphConfig::new(MetricKind::Disk, "#ff0000"),
            ],
            theme:  ThemeConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl MonitorConfig {
    /// Clamp out-of-range values and drop duplicate graphs, warning about
    /// each correction.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        let s = &mut self.sampler;
        if s.interval_ms < MIN_INTERVAL_MS {
            warn!("sampler.interval_ms = {} too small; using {MIN_INTERVAL_MS}", s.interval_ms);
            s.interval_ms = MIN_INTERVAL_MS;
        }
        if s.capacity == 0 {
            warn!("sampler.capacity = 0; using 1");
            s.capacity = 1;
        }
        let (lo, hi) = CPU_WINDOW_RANGE_MS;
        if !(lo..=hi).contains(&s.cpu_window_ms) {
            let clamped = s.cpu_window_ms.clamp(lo, hi);
            warn!("sampler.cpu_window_ms = {} out of range; using {clamped}", s.cpu_window_ms);
            s.cpu_window_ms = clamped;
        }
        if s.timeout_ms < s.cpu_window_ms {
            warn!(
                "sampler.timeout_ms = {} shorter than the CPU window; using {}",
                s.timeout_ms, s.cpu_window_ms
            );
            s.timeout_ms = s.cpu_window_ms;
        }

        if self.export.interval_ms < MIN_INTERVAL_MS {
            warn!("export.interval_ms = {} too small; using {MIN_INTERVAL_MS}", self.export.interval_ms);
            self.export.interval_ms = MIN_INTERVAL_MS;
        }

        if !(self.render.line_width > 0.0) {
            warn!("render.line_width must be positive; using 2.0");
            self.render.line_width = 2.0;
        }

        self.window.opacity = self.window.opacity.clamp(0.0, 1.0);

        let mut seen = Vec::with_capacity(self.graphs.len());
        self.graphs.retain(|g| {
            if seen.contains(&g.kind) {
                warn!("duplicate graph for '{}' ignored", g.kind);
                false
            } else {
                seen.push(g.kind);
                true
            }
        });

        self
    }

    /// Metric kinds in graph order.
    pub fn tracked_kinds(&self) -> Vec<MetricKind> {
        self.graphs.iter().map(|g| g.kind).collect()
    }
}

/// Overlay window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Overlay width in logical pixels.
    pub width: u32,
    /// Overlay height in logical pixels.
    pub height: u32,
    /// Screen edge the overlay hugs (vertically centred).
    pub edge: Edge,
    /// Gap between the overlay and its screen edge.
    pub margin: i32,
    /// Overall background opacity (0.0 – 1.0).
    pub opacity: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width:   300,
            height:  400,
            edge:    Edge::Left,
            margin:  0,
            opacity: 0.95,
        }
    }
}

/// Screen edge for the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    #[default]
    Left,
    Right,
}

/// Sampling cadence and history depth.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Milliseconds between sampling ticks.
    pub interval_ms: u64,
    /// Readings kept per metric.
    pub capacity: usize,
    /// CPU averaging window in milliseconds.  Each CPU sample blocks this long.
    pub cpu_window_ms: u64,
    /// A measurement exceeding this many milliseconds is discarded.
    pub timeout_ms: u64,
    /// Mount point whose usage the `disk` metric reports.
    pub disk_mount: PathBuf,
}

impl SamplerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn cpu_window(&self) -> Duration {
        Duration::from_millis(self.cpu_window_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval_ms:   1_000,
            capacity:      DEFAULT_CAPACITY,
            cpu_window_ms: 100,
            timeout_ms:    2_000,
            disk_mount:    PathBuf::from("/"),
        }
    }
}

/// Graph geometry options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Horizontal scale divisor.
    pub x_scale: XScale,
    /// Polyline stroke width in logical pixels.
    pub line_width: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            x_scale:    XScale::Capacity,
            line_width: 2.0,
        }
    }
}

/// How readings are spread across the viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum XScale {
    /// Step is `width / capacity`: a partly filled buffer only covers the
    /// left portion of the graph.
    #[default]
    Capacity,
    /// Step is `width / len`: the graph always stretches across the viewport.
    Fill,
}

/// Config block for one tracked metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Metric measured by this graph.
    pub kind: MetricKind,
    /// Optional display label override.
    #[serde(default)]
    pub label: Option<String>,
    /// Line color (hex, e.g. `"#0000ff"`).
    pub color: String,
}

impl GraphConfig {
    pub fn new(kind: MetricKind, color: impl Into<String>) -> Self {
        Self {
            kind,
            label: None,
            color: color.into(),
        }
    }

    /// Label shown above the graph.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(self.kind.display_name())
    }
}

/// Theme / styling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Overlay and graph background color.
    pub background: String,
    /// Label text color.
    pub foreground: String,
    /// Graph border color.
    pub border_color: String,
    /// Graph border width (pixels).
    pub border_width: f32,
    /// Label font size in points.
    pub font_size: f32,
    /// Padding around the graph stack (pixels).
    pub padding: u16,
    /// Vertical gap between graphs (pixels).
    pub gap: u16,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background:   "#ffffff".to_string(),
            foreground:   "#000000".to_string(),
            border_color: "#000000".to_string(),
            border_width: 2.0,
            font_size:    13.0,
            padding:      10,
            gap:          10,
        }
    }
}

/// Standalone JSON export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// File overwritten on every export cycle.
    pub path: PathBuf,
    /// Milliseconds between exports.
    pub interval_ms: u64,
}

impl ExportConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            path:        PathBuf::from("/tmp/system_metrics.json"),
            interval_ms: 5_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_clamps_sampler_bounds() {
        let mut config = MonitorConfig::default();
        config.sampler.interval_ms = 0;
        config.sampler.capacity = 0;
        config.sampler.cpu_window_ms = 5_000;
        config.sampler.timeout_ms = 10;

        let config = config.sanitized();
        assert_eq!(config.sampler.interval_ms, MIN_INTERVAL_MS);
        assert_eq!(config.sampler.capacity, 1);
        assert_eq!(config.sampler.cpu_window_ms, 1_000);
        assert_eq!(config.sampler.timeout_ms, 1_000);
    }

    #[test]
    fn sanitize_drops_duplicate_graphs() {
        let mut config = MonitorConfig::default();
        config.graphs.push(GraphConfig::new(MetricKind::Cpu, "#123456"));

        let config = config.sanitized();
        assert_eq!(
            config.tracked_kinds(),
            vec![MetricKind::Cpu, MetricKind::Memory, MetricKind::Disk]
        );
        assert_eq!(config.graphs[0].color, "#0000ff");
    }

    #[test]
    fn custom_label_overrides_kind_name() {
        let mut graph = GraphConfig::new(MetricKind::Disk, "#ff0000");
        assert_eq!(graph.label(), "Disk");
        graph.label = Some("Root FS".into());
        assert_eq!(graph.label(), "Root FS");
    }
}
