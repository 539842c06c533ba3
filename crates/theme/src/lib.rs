pub mod colors;
pub mod style;

pub use colors::Color;
pub use style::GraphStyle;

use sysgraph_config::{GraphConfig, MonitorConfig, ThemeConfig};

/// Compiled theme derived from [`ThemeConfig`].
///
/// All colors are pre-parsed from hex strings into normalised `[0, 1]` RGBA.
/// Calling [`Theme::from_config`] is infallible: invalid color strings fall
/// back to safe defaults.
#[derive(Debug, Clone)]
pub struct Theme {
    pub background:   Color,
    pub foreground:   Color,
    pub border_color: Color,
    pub border_width: f32,
    pub font_size:    f32,
    pub padding:      u16,
    pub gap:          u16,
    /// Polyline width shared by every graph.
    pub line_width:   f32,
}

impl Theme {
    /// Build a [`Theme`] from the `[theme]` and `[render]` sections.
    pub fn from_config(cfg: &MonitorConfig) -> Self {
        let theme: &ThemeConfig = &cfg.theme;
        Self {
            background:   parse_or(&theme.background, Color::WHITE),
            foreground:   parse_or(&theme.foreground, Color::BLACK),
            border_color: parse_or(&theme.border_color, Color::BLACK),
            border_width: theme.border_width.max(0.0),
            font_size:    theme.font_size,
            padding:      theme.padding,
            gap:          theme.gap,
            line_width:   cfg.render.line_width,
        }
    }

    /// Resolve the paint settings for one configured graph.
    pub fn graph_style(&self, graph: &GraphConfig) -> GraphStyle {
        GraphStyle {
            background:   self.background,
            border:       self.border_color,
            border_width: self.border_width,
            stroke:       parse_or(&graph.color, Color::BLUE),
            line_width:   self.line_width,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&MonitorConfig::default())
    }
}

fn parse_or(hex: &str, fallback: Color) -> Color {
    Color::from_hex(hex).unwrap_or_else(|| {
        tracing::warn!("invalid color '{hex}'; using fallback");
        fallback
    })
}
