//! Quintic Hermite spline segment.
//!
//! A polynomial pair (x(t), y(t)) for t in [0, 1], defined by position,
//! first, and second derivative at both ends. Adjacent segments share
//! their second-derivative handles at interior joints, which is what
//! the optimizer adjusts.

use super::{CurvePoint, Waypoint};
use crate::core::geometry::{Point2D, Pose2D, Rotation2D};

/// Samples per segment when integrating curvature roughness.
const ROUGHNESS_SAMPLES: usize = 100;

/// Scale applied to the chord length when deriving heading tangents
/// from waypoints.
const TANGENT_SCALE: f64 = 1.2;

/// A quintic Hermite spline segment.
#[derive(Debug, Clone)]
pub struct QuinticSpline {
    x0: f64,
    x1: f64,
    dx0: f64,
    dx1: f64,
    ddx0: f64,
    ddx1: f64,
    y0: f64,
    y1: f64,
    dy0: f64,
    dy1: f64,
    ddy0: f64,
    ddy1: f64,

    // x(t) = x_coeffs[0]·t⁵ + x_coeffs[1]·t⁴ + ... + x_coeffs[5]
    x_coeffs: [f64; 6],
    y_coeffs: [f64; 6],
}

impl QuinticSpline {
    /// Build a segment between two waypoints.
    ///
    /// First derivatives point along each waypoint's heading, scaled by
    /// 1.2× the chord length; second derivatives start at zero.
    pub fn from_waypoints(start: &Waypoint, end: &Waypoint) -> Self {
        let chord = ((end.x - start.x).powi(2) + (end.y - start.y).powi(2)).sqrt();
        let scale = TANGENT_SCALE * chord;
        Self::from_hermite(
            start.x,
            end.x,
            scale * start.heading.cos(),
            scale * end.heading.cos(),
            0.0,
            0.0,
            start.y,
            end.y,
            scale * start.heading.sin(),
            scale * end.heading.sin(),
            0.0,
            0.0,
        )
    }

    /// Build a segment from full boundary state on both ends.
    #[allow(clippy::too_many_arguments)]
    pub fn from_hermite(
        x0: f64,
        x1: f64,
        dx0: f64,
        dx1: f64,
        ddx0: f64,
        ddx1: f64,
        y0: f64,
        y1: f64,
        dy0: f64,
        dy1: f64,
        ddy0: f64,
        ddy1: f64,
    ) -> Self {
        let mut spline = Self {
            x0,
            x1,
            dx0,
            dx1,
            ddx0,
            ddx1,
            y0,
            y1,
            dy0,
            dy1,
            ddy0,
            ddy1,
            x_coeffs: [0.0; 6],
            y_coeffs: [0.0; 6],
        };
        spline.compute_coefficients();
        spline
    }

    /// Recompute the polynomial coefficients from the boundary state.
    fn compute_coefficients(&mut self) {
        self.x_coeffs = Self::axis_coefficients(
            self.x0, self.x1, self.dx0, self.dx1, self.ddx0, self.ddx1,
        );
        self.y_coeffs = Self::axis_coefficients(
            self.y0, self.y1, self.dy0, self.dy1, self.ddy0, self.ddy1,
        );
    }

    fn axis_coefficients(p0: f64, p1: f64, d0: f64, d1: f64, dd0: f64, dd1: f64) -> [f64; 6] {
        [
            -6.0 * p0 - 3.0 * d0 - 0.5 * dd0 + 0.5 * dd1 - 3.0 * d1 + 6.0 * p1,
            15.0 * p0 + 8.0 * d0 + 1.5 * dd0 - dd1 + 7.0 * d1 - 15.0 * p1,
            -10.0 * p0 - 6.0 * d0 - 1.5 * dd0 + 0.5 * dd1 - 4.0 * d1 + 10.0 * p1,
            0.5 * dd0,
            d0,
            p0,
        ]
    }

    /// Second-derivative handle at the segment start.
    #[inline]
    pub fn start_second_derivative(&self) -> (f64, f64) {
        (self.ddx0, self.ddy0)
    }

    /// Second-derivative handle at the segment end.
    #[inline]
    pub fn end_second_derivative(&self) -> (f64, f64) {
        (self.ddx1, self.ddy1)
    }

    /// Replace the start handle and recompute coefficients.
    pub fn set_start_second_derivative(&mut self, ddx: f64, ddy: f64) {
        self.ddx0 = ddx;
        self.ddy0 = ddy;
        self.compute_coefficients();
    }

    /// Replace the end handle and recompute coefficients.
    pub fn set_end_second_derivative(&mut self, ddx: f64, ddy: f64) {
        self.ddx1 = ddx;
        self.ddy1 = ddy;
        self.compute_coefficients();
    }

    /// Pose at the segment start (waypoint position and heading).
    pub fn start_pose(&self) -> Pose2D {
        Pose2D::new(
            Point2D::new(self.x0, self.y0),
            Rotation2D::new(self.dx0, self.dy0),
        )
    }

    /// Pose at the segment end.
    pub fn end_pose(&self) -> Pose2D {
        Pose2D::new(
            Point2D::new(self.x1, self.y1),
            Rotation2D::new(self.dx1, self.dy1),
        )
    }

    fn eval(coeffs: &[f64; 6], t: f64) -> f64 {
        ((((coeffs[0] * t + coeffs[1]) * t + coeffs[2]) * t + coeffs[3]) * t + coeffs[4]) * t
            + coeffs[5]
    }

    fn eval_d(coeffs: &[f64; 6], t: f64) -> f64 {
        (((5.0 * coeffs[0] * t + 4.0 * coeffs[1]) * t + 3.0 * coeffs[2]) * t + 2.0 * coeffs[3]) * t
            + coeffs[4]
    }

    fn eval_dd(coeffs: &[f64; 6], t: f64) -> f64 {
        ((20.0 * coeffs[0] * t + 12.0 * coeffs[1]) * t + 6.0 * coeffs[2]) * t + 2.0 * coeffs[3]
    }

    fn eval_ddd(coeffs: &[f64; 6], t: f64) -> f64 {
        (60.0 * coeffs[0] * t + 24.0 * coeffs[1]) * t + 6.0 * coeffs[2]
    }

    /// Position at parameter `t`.
    #[inline]
    pub fn point_at(&self, t: f64) -> Point2D {
        Point2D::new(Self::eval(&self.x_coeffs, t), Self::eval(&self.y_coeffs, t))
    }

    /// First derivative (dx/dt, dy/dt) at `t`.
    #[inline]
    pub fn velocity_at(&self, t: f64) -> Point2D {
        Point2D::new(Self::eval_d(&self.x_coeffs, t), Self::eval_d(&self.y_coeffs, t))
    }

    /// Second derivative at `t`.
    #[inline]
    pub fn acceleration_at(&self, t: f64) -> Point2D {
        Point2D::new(Self::eval_dd(&self.x_coeffs, t), Self::eval_dd(&self.y_coeffs, t))
    }

    /// Third derivative at `t`.
    #[inline]
    pub fn jerk_at(&self, t: f64) -> Point2D {
        Point2D::new(Self::eval_ddd(&self.x_coeffs, t), Self::eval_ddd(&self.y_coeffs, t))
    }

    /// Unnormalized tangent direction at `t`.
    #[inline]
    pub fn tangent_at(&self, t: f64) -> Rotation2D {
        let velocity = self.velocity_at(t);
        Rotation2D::from_raw(velocity.x, velocity.y)
    }

    /// Heading at `t` (normalized tangent).
    #[inline]
    pub fn heading_at(&self, t: f64) -> Rotation2D {
        self.tangent_at(t).normalized()
    }

    /// Pose at `t`.
    #[inline]
    pub fn pose_at(&self, t: f64) -> Pose2D {
        Pose2D::new(self.point_at(t), self.heading_at(t))
    }

    /// Signed curvature at `t`.
    pub fn curvature_at(&self, t: f64) -> f64 {
        let d = self.velocity_at(t);
        let dd = self.acceleration_at(t);
        d.cross(&dd) / (d.norm_squared() * d.norm())
    }

    /// Curvature derivative with respect to `t`.
    pub fn dcurvature_at(&self, t: f64) -> f64 {
        let d = self.velocity_at(t);
        let dd = self.acceleration_at(t);
        let ddd = self.jerk_at(t);
        let speed_squared = d.norm_squared();
        let numerator =
            d.cross(&ddd) * speed_squared - 3.0 * d.cross(&dd) * (d.x * dd.x + d.y * dd.y);
        numerator / (speed_squared * speed_squared * speed_squared.sqrt())
    }

    /// Squared curvature derivative at `t`.
    fn dcurvature2_at(&self, t: f64) -> f64 {
        let dc = self.dcurvature_at(t);
        dc * dc
    }

    /// Curve sample at `t`, with curvature rate converted to a
    /// per-arc-length derivative.
    pub fn curve_point_at(&self, t: f64) -> CurvePoint {
        let speed = self.velocity_at(t).norm();
        CurvePoint::new(
            self.pose_at(t),
            self.curvature_at(t),
            self.dcurvature_at(t) / speed,
        )
    }

    /// Curvature roughness of this segment, integrated numerically with
    /// a fixed sample count.
    pub fn sum_dcurvature2(&self) -> f64 {
        let dt = 1.0 / ROUGHNESS_SAMPLES as f64;
        let mut sum = 0.0;
        for k in 0..ROUGHNESS_SAMPLES {
            sum += dt * self.dcurvature2_at(k as f64 * dt);
        }
        sum
    }
}

/// Total curvature roughness of a spline chain.
pub(super) fn chain_dcurvature2(splines: &[QuinticSpline]) -> f64 {
    splines.iter().map(|s| s.sum_dcurvature2()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_endpoints_match_waypoints() {
        let w0 = Waypoint::new(0.0, 0.0, 0.0);
        let w1 = Waypoint::new(10.0, 5.0, FRAC_PI_2);
        let spline = QuinticSpline::from_waypoints(&w0, &w1);

        let start = spline.point_at(0.0);
        assert_relative_eq!(start.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(start.y, 0.0, epsilon = 1e-9);
        let end = spline.point_at(1.0);
        assert_relative_eq!(end.x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(end.y, 5.0, epsilon = 1e-9);

        assert_relative_eq!(spline.heading_at(0.0).angle(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(spline.heading_at(1.0).angle(), FRAC_PI_2, epsilon = 1e-9);
    }

    #[test]
    fn test_straight_line_has_zero_curvature() {
        let w0 = Waypoint::new(0.0, 0.0, 0.0);
        let w1 = Waypoint::new(10.0, 0.0, 0.0);
        let spline = QuinticSpline::from_waypoints(&w0, &w1);

        for k in 0..=10 {
            let t = k as f64 / 10.0;
            assert_relative_eq!(spline.curvature_at(t), 0.0, epsilon = 1e-9);
        }
        assert_relative_eq!(spline.sum_dcurvature2(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bend_has_positive_roughness() {
        let w0 = Waypoint::new(0.0, 0.0, 0.0);
        let w1 = Waypoint::new(10.0, 10.0, FRAC_PI_2);
        let spline = QuinticSpline::from_waypoints(&w0, &w1);
        assert!(spline.sum_dcurvature2() > 0.0);
    }

    #[test]
    fn test_second_derivative_boundary() {
        // p''(0) and p''(1) reproduce the handle values
        let spline = QuinticSpline::from_hermite(
            0.0, 10.0, 5.0, 5.0, 1.5, -2.0, 0.0, 2.0, 0.0, 3.0, 0.5, 1.0,
        );
        let a0 = spline.acceleration_at(0.0);
        assert_relative_eq!(a0.x, 1.5, epsilon = 1e-9);
        assert_relative_eq!(a0.y, 0.5, epsilon = 1e-9);
        let a1 = spline.acceleration_at(1.0);
        assert_relative_eq!(a1.x, -2.0, epsilon = 1e-9);
        assert_relative_eq!(a1.y, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_handle_setters_recompute() {
        let w0 = Waypoint::new(0.0, 0.0, 0.0);
        let w1 = Waypoint::new(10.0, 5.0, 0.0);
        let mut spline = QuinticSpline::from_waypoints(&w0, &w1);
        spline.set_end_second_derivative(3.0, -1.0);
        let a1 = spline.acceleration_at(1.0);
        assert_relative_eq!(a1.x, 3.0, epsilon = 1e-9);
        assert_relative_eq!(a1.y, -1.0, epsilon = 1e-9);
        // Endpoints are unaffected by handle changes
        assert_relative_eq!(spline.point_at(1.0).x, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_velocity_matches_numeric_derivative() {
        let w0 = Waypoint::new(0.0, 0.0, 0.0);
        let w1 = Waypoint::new(8.0, 4.0, FRAC_PI_2);
        let spline = QuinticSpline::from_waypoints(&w0, &w1);
        let h = 1e-7;
        for k in 1..10 {
            let t = k as f64 / 10.0;
            let numeric = (spline.point_at(t + h) - spline.point_at(t - h)) * (1.0 / (2.0 * h));
            let analytic = spline.velocity_at(t);
            assert_relative_eq!(numeric.x, analytic.x, epsilon = 1e-5);
            assert_relative_eq!(numeric.y, analytic.y, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_curvature_sign() {
        // Left turn has positive curvature, right turn negative
        let left = QuinticSpline::from_waypoints(
            &Waypoint::new(0.0, 0.0, 0.0),
            &Waypoint::new(10.0, 10.0, FRAC_PI_2),
        );
        assert!(left.curvature_at(0.5) > 0.0);
        let right = QuinticSpline::from_waypoints(
            &Waypoint::new(0.0, 0.0, 0.0),
            &Waypoint::new(10.0, -10.0, -FRAC_PI_2),
        );
        assert!(right.curvature_at(0.5) < 0.0);
    }
}
