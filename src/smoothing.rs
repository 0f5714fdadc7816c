// src/smoothing.rs
use nalgebra::Vector2;

use crate::config::ScreenGeometry;

/// Exponential moving average over the mapped cursor target.
///
/// The stored position is left unclamped; only what [`MotionSmoother::emitted`] hands out is
/// held inside the screen. A target that wanders off-screen therefore drags the internal value
/// with it, and the visible cursor comes back only as fast as smoothing allows.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionSmoother {
    alpha: f64,
    position: Vector2<f64>,
}

impl MotionSmoother {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            position: Vector2::zeros(),
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Raw smoothed position, possibly off-screen.
    pub fn position(&self) -> Vector2<f64> {
        self.position
    }

    /// Moves a fraction `alpha` of the way toward `target`.
    ///
    /// A step that would leave the position non-finite is dropped and the previous position
    /// kept.
    pub fn update(&mut self, target: Vector2<f64>) -> Vector2<f64> {
        let next = self.position + (target - self.position) * self.alpha;
        if next.iter().all(|v| v.is_finite()) {
            self.position = next;
        }
        self.position
    }

    /// The position clamped per axis to the screen.
    pub fn emitted(&self, screen: &ScreenGeometry) -> Vector2<f64> {
        // max/min rather than clamp: an unvalidated geometry must not panic.
        Vector2::new(
            self.position.x.max(0.0).min(screen.width),
            self.position.y.max(0.0).min(screen.height),
        )
    }

    pub fn reset(&mut self) {
        self.position = Vector2::zeros();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> ScreenGeometry {
        ScreenGeometry {
            width: 1920.0,
            height: 1080.0,
        }
    }

    #[test]
    fn starts_at_origin() {
        let smoother = MotionSmoother::new(0.2);
        assert_eq!(smoother.position(), Vector2::zeros());
    }

    #[test]
    fn single_step_moves_by_alpha() {
        let mut smoother = MotionSmoother::new(0.2);
        let pos = smoother.update(Vector2::new(1000.0, 500.0));
        assert!((pos.x - 200.0).abs() < 1e-9);
        assert!((pos.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn converges_without_overshoot() {
        let mut smoother = MotionSmoother::new(0.2);
        let target = Vector2::new(960.0, 540.0);
        let mut last = smoother.position();

        for _ in 0..200 {
            let pos = smoother.update(target);
            assert!(pos.x >= last.x && pos.y >= last.y, "not monotone");
            assert!(pos.x <= target.x && pos.y <= target.y, "overshot");
            last = pos;
        }
        assert!((last - target).norm() < 1e-6);
    }

    #[test]
    fn alpha_one_snaps_to_target() {
        let mut smoother = MotionSmoother::new(1.0);
        let target = Vector2::new(12.5, 700.0);
        assert_eq!(smoother.update(target), target);
    }

    #[test]
    fn emitted_position_is_clamped_per_axis() {
        let mut smoother = MotionSmoother::new(1.0);
        smoother.update(Vector2::new(-300.0, 5000.0));

        assert_eq!(smoother.emitted(&screen()), Vector2::new(0.0, 1080.0));
        assert_eq!(smoother.position(), Vector2::new(-300.0, 5000.0));
    }

    #[test]
    fn internal_drift_delays_return() {
        let mut smoother = MotionSmoother::new(0.5);
        for _ in 0..20 {
            smoother.update(Vector2::new(4000.0, 540.0));
        }
        assert_eq!(smoother.emitted(&screen()).x, 1920.0);

        // One step back toward the middle is not enough to leave the edge.
        smoother.update(Vector2::new(960.0, 540.0));
        assert_eq!(smoother.emitted(&screen()).x, 1920.0);
        assert!(smoother.position().x > 1920.0);
    }

    #[test]
    fn non_finite_step_keeps_previous_position() {
        let mut smoother = MotionSmoother::new(0.5);
        smoother.update(Vector2::new(-f64::MAX, 100.0));
        let before = smoother.position();

        // The difference overflows even though the target itself is finite.
        smoother.update(Vector2::new(f64::MAX, 100.0));
        assert_eq!(smoother.position(), before);

        smoother.update(Vector2::new(f64::INFINITY, f64::NAN));
        assert_eq!(smoother.position(), before);
    }

    #[test]
    fn reset_returns_to_origin() {
        let mut smoother = MotionSmoother::new(0.3);
        smoother.update(Vector2::new(10.0, 10.0));
        smoother.reset();
        assert_eq!(smoother.position(), Vector2::zeros());
    }
}
