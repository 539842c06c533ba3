use sysgraph_config::XScale;
use sysgraph_core::Reading;

/// Size of the area a graph is drawn into, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width:  f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A polyline vertex.  `y` grows downwards, so 100 % sits at `y = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderPoint {
    pub x: f32,
    pub y: f32,
}

/// Map a buffer snapshot (oldest first) to polyline points.
///
/// Point `i` lands at `x = i * width / divisor` and
/// `y = height - value / 100 * height`.  With [`XScale::Capacity`] the
/// divisor is the buffer's `capacity`, so a buffer that is still filling
/// only covers the left part of the viewport; with [`XScale::Fill`] it is
/// the number of readings and the line always spans the graph.
///
/// Pure: the same inputs always yield the same points.
pub fn map(readings: &[Reading], capacity: usize, viewport: Viewport, scale: XScale) -> Vec<RenderPoint> {
    if readings.is_empty() {
        return Vec::new();
    }

    let divisor = match scale {
        XScale::Capacity => capacity.max(1),
        XScale::Fill     => readings.len(),
    };
    let step = viewport.width.max(0.0) / divisor as f32;
    let height = viewport.height.max(0.0);

    readings
        .iter()
        .enumerate()
        .map(|(i, r)| RenderPoint {
            x: i as f32 * step,
            y: (height - r.value() * height / Reading::MAX).clamp(0.0, height),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn readings(values: &[f32]) -> Vec<Reading> {
        values.iter().copied().map(Reading::new).collect()
    }

    #[test]
    fn empty_snapshot_maps_to_nothing() {
        for scale in [XScale::Capacity, XScale::Fill] {
            assert!(map(&[], 50, Viewport::new(500.0, 100.0), scale).is_empty());
        }
    }

    #[test]
    fn two_readings_in_a_wide_viewport() {
        let points = map(&readings(&[40.0, 60.0]), 50, Viewport::new(500.0, 100.0), XScale::Capacity);
        assert_eq!(
            points,
            vec![RenderPoint { x: 0.0, y: 60.0 }, RenderPoint { x: 10.0, y: 40.0 }]
        );
    }

    #[test]
    fn fill_scale_spreads_by_reading_count() {
        let points = map(&readings(&[0.0, 50.0, 100.0, 25.0]), 50, Viewport::new(400.0, 200.0), XScale::Fill);
        let xs: Vec<f32> = points.iter().map(|p| p.x).collect();
        let ys: Vec<f32> = points.iter().map(|p| p.y).collect();
        assert_eq!(xs, vec![0.0, 100.0, 200.0, 300.0]);
        assert_eq!(ys, vec![200.0, 100.0, 0.0, 150.0]);
    }

    #[test]
    fn partial_buffer_hugs_the_left_edge() {
        let points = map(&readings(&[10.0; 5]), 50, Viewport::new(500.0, 100.0), XScale::Capacity);
        assert_eq!(points.last().unwrap().x, 40.0);
    }

    #[test]
    fn points_stay_inside_viewport_and_advance() {
        let values: Vec<f32> = (0..60).map(|i| ((i * 37) % 101) as f32).collect();
        let snapshot = readings(&values[..50]);

        for scale in [XScale::Capacity, XScale::Fill] {
            for &(w, h) in &[(300.0, 120.0), (1.0, 1.0), (999.0, 37.5)] {
                let points = map(&snapshot, 50, Viewport::new(w, h), scale);
                assert_eq!(points.len(), snapshot.len());
                assert!(points.iter().all(|p| (0.0..=h).contains(&p.y)));
                assert!(points.windows(2).all(|pair| pair[0].x < pair[1].x));
            }
        }
    }

    #[test]
    fn mapping_is_idempotent() {
        let snapshot = readings(&[3.0, 99.0, 42.0]);
        let viewport = Viewport::new(250.0, 80.0);
        assert_eq!(
            map(&snapshot, 50, viewport, XScale::Capacity),
            map(&snapshot, 50, viewport, XScale::Capacity)
        );
    }

    #[test]
    fn zero_capacity_does_not_divide_by_zero() {
        let points = map(&readings(&[50.0]), 0, Viewport::new(100.0, 100.0), XScale::Capacity);
        assert_eq!(points, vec![RenderPoint { x: 0.0, y: 50.0 }]);
    }
}
