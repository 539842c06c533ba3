use crate::mapper::{map, RenderPoint, Viewport};
use sysgraph_config::XScale;
use sysgraph_core::Reading;
use sysgraph_theme::{Color, GraphStyle};

/// A drawing target for graph geometry, implemented by platform adapters.
pub trait Surface {
    /// Stroke `points` as connected segments in order.
    fn draw_polyline(&mut self, points: &[RenderPoint], stroke: Color, line_width: f32);

    /// Stroke the outline of `viewport`.
    fn draw_rect_border(&mut self, viewport: Viewport, stroke: Color, line_width: f32);
}

/// Draw one graph: the border, then the readings' polyline.
///
/// Fewer than two readings produce no line, only the border.
pub fn draw_graph<S: Surface + ?Sized>(
    surface: &mut S,
    readings: &[Reading],
    capacity: usize,
    viewport: Viewport,
    style: &GraphStyle,
    scale: XScale,
) {
    if style.border_width > 0.0 {
        surface.draw_rect_border(viewport, style.border, style.border_width);
    }

    let points = map(readings, capacity, viewport, scale);
    if points.len() >= 2 {
        surface.draw_polyline(&points, style.stroke, style.line_width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Call {
        Polyline(Vec<RenderPoint>, Color, f32),
        Border(Viewport, Color, f32),
    }

    #[derive(Default)]
    struct Recorder(Vec<Call>);

    impl Surface for Recorder {
        fn draw_polyline(&mut self, points: &[RenderPoint], stroke: Color, line_width: f32) {
            self.0.push(Call::Polyline(points.to_vec(), stroke, line_width));
        }

        fn draw_rect_border(&mut self, viewport: Viewport, stroke: Color, line_width: f32) {
            self.0.push(Call::Border(viewport, stroke, line_width));
        }
    }

    fn style() -> GraphStyle {
        GraphStyle {
            background:   Color::WHITE,
            border:       Color::BLACK,
            border_width: 2.0,
            stroke:       Color::BLUE,
            line_width:   1.5,
        }
    }

    #[test]
    fn border_then_polyline() {
        let mut surface = Recorder::default();
        let viewport = Viewport::new(500.0, 100.0);
        let readings = [Reading::new(40.0), Reading::new(60.0)];

        draw_graph(&mut surface, &readings, 50, viewport, &style(), XScale::Capacity);

        assert_eq!(
            surface.0,
            vec![
                Call::Border(viewport, Color::BLACK, 2.0),
                Call::Polyline(
                    vec![RenderPoint { x: 0.0, y: 60.0 }, RenderPoint { x: 10.0, y: 40.0 }],
                    Color::BLUE,
                    1.5,
                ),
            ]
        );
    }

    #[test]
    fn empty_or_single_reading_draws_only_the_border() {
        for readings in [vec![], vec![Reading::new(10.0)]] {
            let mut surface = Recorder::default();
            draw_graph(&mut surface, &readings, 50, Viewport::new(10.0, 10.0), &style(), XScale::Fill);
            assert_eq!(surface.0.len(), 1);
            assert!(matches!(surface.0[0], Call::Border(..)));
        }
    }

    #[test]
    fn zero_border_width_skips_border() {
        let mut surface = Recorder::default();
        let style = GraphStyle { border_width: 0.0, ..style() };
        draw_graph(&mut surface, &[], 50, Viewport::new(10.0, 10.0), &style, XScale::Capacity);
        assert!(surface.0.is_empty());
    }
}
