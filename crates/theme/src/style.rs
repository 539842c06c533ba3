use crate::colors::Color;

/// Everything a surface needs to paint one metric graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphStyle {
    /// Fill behind the polyline.
    pub background:   Color,
    pub border:       Color,
    pub border_width: f32,
    /// Polyline color.
    pub stroke:       Color,
    pub line_width:   f32,
}
