//! Graph geometry for the overlay.
//!
//! Nothing in here touches a windowing system:
//! - [`map`] turns a buffer snapshot into polyline points for a viewport;
//! - [`draw_graph`] feeds those points to any [`Surface`] implementation;
//! - [`GraphLayout`] resolves the configured graph list into draw styles.
//!
//! The platform adapter that implements [`Surface`] lives in
//! `sysgraph-widgets`.

pub mod mapper;
pub mod surface;

pub use mapper::{map, RenderPoint, Viewport};
pub use surface::{draw_graph, Surface};

use sysgraph_config::{MonitorConfig, XScale};
use sysgraph_core::MetricKind;
use sysgraph_theme::{GraphStyle, Theme};

/// One resolved graph: what it measures, its label and how it is painted.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphSpec {
    pub kind:  MetricKind,
    pub label: String,
    pub style: GraphStyle,
}

/// Describes which graphs appear in the overlay, top to bottom.
#[derive(Debug, Clone, Default)]
pub struct GraphLayout {
    pub graphs:  Vec<GraphSpec>,
    pub x_scale: XScale,
}

impl GraphLayout {
    /// Build a [`GraphLayout`] from the loaded configuration.
    pub fn from_config(config: &MonitorConfig, theme: &Theme) -> Self {
        Self {
            graphs: config
                .graphs
                .iter()
                .map(|g| GraphSpec {
                    kind:  g.kind,
                    label: g.label().to_string(),
                    style: theme.graph_style(g),
                })
                .collect(),
            x_scale: config.render.x_scale,
        }
    }

    pub fn get(&self, kind: MetricKind) -> Option<&GraphSpec> {
        self.graphs.iter().find(|g| g.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sysgraph_theme::Color;

    #[test]
    fn layout_follows_config_order_and_colors() {
        let config = MonitorConfig::default();
        let layout = GraphLayout::from_config(&config, &Theme::from_config(&config));

        let kinds: Vec<_> = layout.graphs.iter().map(|g| g.kind).collect();
        assert_eq!(kinds, vec![MetricKind::Cpu, MetricKind::Memory, MetricKind::Disk]);
        assert_eq!(layout.get(MetricKind::Cpu).unwrap().style.stroke, Color::BLUE);
        assert_eq!(layout.get(MetricKind::Memory).unwrap().label, "Memory");
        assert_eq!(layout.x_scale, XScale::Capacity);
    }
}
