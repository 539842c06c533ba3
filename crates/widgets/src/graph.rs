use crate::monitor::MonitorWidget;
use iced::{
    mouse,
    widget::{canvas, column, text, Canvas},
    Element, Length, Point, Rectangle, Size,
};
use sysgraph_config::XScale;
use sysgraph_core::{event::Message, MetricKind, Reading};
use sysgraph_renderer::{draw_graph, GraphSpec, RenderPoint, Surface, Viewport};
use sysgraph_theme::{Color, GraphStyle, Theme};

/// Labelled line graph for one metric.
///
/// Geometry is cached between frames and rebuilt after
/// [`invalidate`](Self::invalidate) or whenever the canvas is resized.
pub struct GraphWidget {
    spec:  GraphSpec,
    cache: canvas::Cache,
}

impl GraphWidget {
    pub fn new(spec: GraphSpec) -> Self {
        Self {
            spec,
            cache: canvas::Cache::new(),
        }
    }

    pub fn kind(&self) -> MetricKind {
        self.spec.kind
    }

    /// Swap label / colors after a config reload.
    pub fn set_spec(&mut self, spec: GraphSpec) {
        self.spec = spec;
        self.cache.clear();
    }

    /// Mark the cached geometry stale; the next frame re-reads the buffer.
    pub fn invalidate(&mut self) {
        self.cache.clear();
    }

    pub fn view<'a>(
        &'a self,
        monitor: &MonitorWidget,
        theme: &'a Theme,
        x_scale: XScale,
    ) -> Element<'a, Message> {
        let readings = monitor.snapshot(self.spec.kind);
        let label = format_label(&self.spec.label, readings.last().copied());

        let graph = Canvas::new(GraphCanvas {
            readings,
            capacity: monitor.capacity(),
            style: self.spec.style,
            x_scale,
            cache: &self.cache,
        })
        .width(Length::Fill)
        .height(Length::Fill);

        column![
            text(label)
                .size(theme.font_size)
                .color(theme.foreground.to_iced()),
            graph,
        ]
        .spacing(4)
        .into()
    }
}

impl std::fmt::Debug for GraphWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphWidget").field("spec", &self.spec).finish_non_exhaustive()
    }
}

/// `"CPU 23%"`, or `"CPU --"` before the first reading lands.
fn format_label(label: &str, latest: Option<Reading>) -> String {
    match latest {
        Some(r) => format!("{label} {:.0}%", r.value()),
        None    => format!("{label} --"),
    }
}

struct GraphCanvas<'a> {
    readings: Vec<Reading>,
    capacity: usize,
    style:    GraphStyle,
    x_scale:  XScale,
    cache:    &'a canvas::Cache,
}

impl canvas::Program<Message> for GraphCanvas<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let geometry = self.cache.draw(renderer, bounds.size(), |frame| {
            frame.fill_rectangle(Point::ORIGIN, frame.size(), self.style.background.to_iced());

            let viewport = Viewport::new(frame.width(), frame.height());
            draw_graph(
                &mut FrameSurface(frame),
                &self.readings,
                self.capacity,
                viewport,
                &self.style,
                self.x_scale,
            );
        });

        vec![geometry]
    }
}

/// [`Surface`] adapter over an Iced canvas frame.
struct FrameSurface<'f>(&'f mut canvas::Frame);

impl Surface for FrameSurface<'_> {
    fn draw_polyline(&mut self, points: &[RenderPoint], stroke: Color, line_width: f32) {
        let path = canvas::Path::new(|builder| {
            let mut points = points.iter();
            if let Some(first) = points.next() {
                builder.move_to(Point::new(first.x, first.y));
                for p in points {
                    builder.line_to(Point::new(p.x, p.y));
                }
            }
        });
        self.0.stroke(&path, stroke_of(stroke, line_width));
    }

    fn draw_rect_border(&mut self, viewport: Viewport, stroke: Color, line_width: f32) {
        let path = canvas::Path::rectangle(Point::ORIGIN, Size::new(viewport.width, viewport.height));
        self.0.stroke(&path, stroke_of(stroke, line_width));
    }
}

fn stroke_of(color: Color, width: f32) -> canvas::Stroke<'static> {
    canvas::Stroke::default()
        .with_color(color.to_iced())
        .with_width(width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_shows_latest_reading() {
        assert_eq!(format_label("CPU", Some(Reading::new(23.4))), "CPU 23%");
        assert_eq!(format_label("Memory", Some(Reading::new(99.6))), "Memory 100%");
    }

    #[test]
    fn label_before_first_reading() {
        assert_eq!(format_label("Disk", None), "Disk --");
    }
}
