// src/mapping.rs - Camera-space to screen-space projection
use nalgebra::Vector2;

use crate::config::ScreenGeometry;

/// The part of the camera frame that spans the whole screen, in normalized frame units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveRegion {
    x_range: (f64, f64),
    y_range: (f64, f64),
}

impl ActiveRegion {
    /// Region inset by `margin` pixels from each edge of a `width` x `height` frame.
    ///
    /// Returns `None` when the margin swallows the whole frame on either axis.
    pub fn for_frame(margin: f64, width: u32, height: u32) -> Option<Self> {
        let x_range = inset(margin, width)?;
        let y_range = inset(margin, height)?;
        Some(Self { x_range, y_range })
    }

    /// The whole frame, with no margin.
    pub fn full() -> Self {
        Self {
            x_range: (0.0, 1.0),
            y_range: (0.0, 1.0),
        }
    }

    pub fn x_range(&self) -> (f64, f64) {
        self.x_range
    }

    pub fn y_range(&self) -> (f64, f64) {
        self.y_range
    }

    /// Projects a normalized landmark position onto the screen.
    ///
    /// Points outside the region extrapolate past the screen edges; clamping happens later,
    /// when the smoothed cursor is emitted.
    pub fn map_to_screen(&self, point: Vector2<f64>, screen: &ScreenGeometry) -> Vector2<f64> {
        Vector2::new(
            interpolate(point.x, self.x_range, (0.0, screen.width)),
            interpolate(point.y, self.y_range, (0.0, screen.height)),
        )
    }
}

fn inset(margin: f64, dimension: u32) -> Option<(f64, f64)> {
    if dimension == 0 {
        return None;
    }
    let edge = margin / dimension as f64;
    let range = (edge, 1.0 - edge);
    (range.0 < range.1).then_some(range)
}

/// Straight-line map from `domain` to `range`, extended past both ends.
pub fn interpolate(value: f64, domain: (f64, f64), range: (f64, f64)) -> f64 {
    let t = (value - domain.0) / (domain.1 - domain.0);
    range.0 + t * (range.1 - range.0)
}
