//! Rigid 2D pose and its tangent-space twist.
//!
//! The exponential map turns a twist (a constant-velocity arc) into the
//! pose it reaches; the logarithm map inverts it. Both handle the
//! dtheta → 0 singularity with a Taylor-series fallback.

use super::point::Point2D;
use super::rotation::Rotation2D;
use crate::core::math::{COLLINEAR_EPS, ROTATION_EPS};
use serde::{Deserialize, Serialize};

/// A tangent-space pose delta.
///
/// `dx` is motion along the heading, `dy` lateral motion, `dtheta` the
/// heading change in radians, all over one unit of the twist parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Twist2D {
    /// Longitudinal delta in path units
    pub dx: f64,
    /// Lateral delta in path units
    pub dy: f64,
    /// Heading delta in radians
    pub dtheta: f64,
}

impl Twist2D {
    /// Create a new twist.
    #[inline]
    pub fn new(dx: f64, dy: f64, dtheta: f64) -> Self {
        Self { dx, dy, dtheta }
    }

    /// Scale all components.
    #[inline]
    pub fn scaled(&self, factor: f64) -> Twist2D {
        Twist2D::new(self.dx * factor, self.dy * factor, self.dtheta * factor)
    }

    /// Translational norm of the twist.
    #[inline]
    pub fn norm(&self) -> f64 {
        if self.dy == 0.0 {
            return self.dx.abs();
        }
        (self.dx * self.dx + self.dy * self.dy).sqrt()
    }
}

/// A rigid 2D transform: translation plus heading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose2D {
    /// Position in path units
    pub translation: Point2D,
    /// Heading
    pub rotation: Rotation2D,
}

impl Pose2D {
    /// Create a pose from translation and rotation.
    #[inline]
    pub fn new(translation: Point2D, rotation: Rotation2D) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// Create a pose from coordinates and a heading angle in radians.
    #[inline]
    pub fn from_xy_heading(x: f64, y: f64, heading: f64) -> Self {
        Self {
            translation: Point2D::new(x, y),
            rotation: Rotation2D::from_angle(heading),
        }
    }

    /// Identity pose at the origin with zero heading.
    #[inline]
    pub fn identity() -> Self {
        Self {
            translation: Point2D::zero(),
            rotation: Rotation2D::identity(),
        }
    }

    /// Compose: apply `other` in this pose's frame.
    #[inline]
    pub fn transform_by(&self, other: &Pose2D) -> Pose2D {
        Pose2D::new(
            self.translation + self.rotation.rotate_point(&other.translation),
            self.rotation.rotate_by(&other.rotation),
        )
    }

    /// Inverse transform.
    pub fn inverse(&self) -> Pose2D {
        let inv_rotation = self.rotation.inverse();
        Pose2D::new(inv_rotation.rotate_point(&(-self.translation)), inv_rotation)
    }

    /// This pose expressed in `base`'s frame.
    #[inline]
    pub fn relative_to(&self, base: &Pose2D) -> Pose2D {
        base.inverse().transform_by(self)
    }

    /// Exponential map: the pose reached by following `twist` for one
    /// unit along a constant-curvature arc.
    pub fn exp(twist: &Twist2D) -> Pose2D {
        let theta = twist.dtheta;
        let (sin_t, cos_t) = theta.sin_cos();

        // sin(θ)/θ and (1-cos(θ))/θ with Taylor fallback near zero
        let (s, c) = if theta.abs() < ROTATION_EPS {
            (1.0 - theta * theta / 6.0, theta / 2.0)
        } else {
            (sin_t / theta, (1.0 - cos_t) / theta)
        };

        Pose2D::new(
            Point2D::new(twist.dx * s - twist.dy * c, twist.dx * c + twist.dy * s),
            Rotation2D::from_angle(theta),
        )
    }

    /// Logarithm map: the twist that reaches `pose` from the identity.
    ///
    /// Inverse of [`Pose2D::exp`].
    pub fn log(pose: &Pose2D) -> Twist2D {
        let theta = pose.rotation.angle();
        let half_theta = theta / 2.0;

        // (θ/2)·cot(θ/2) with Taylor fallback near zero
        let half_theta_by_tan = if theta.abs() < ROTATION_EPS {
            1.0 - theta * theta / 12.0
        } else {
            half_theta * pose.rotation.sin / (1.0 - pose.rotation.cos)
        };

        let x = pose.translation.x;
        let y = pose.translation.y;
        Twist2D::new(
            half_theta_by_tan * x + half_theta * y,
            -half_theta * x + half_theta_by_tan * y,
            theta,
        )
    }

    /// Interpolate toward `end` by mapping the relative transform to a
    /// twist, scaling it, and mapping back. Respects the rotational
    /// geometry rather than blending coordinates linearly.
    ///
    /// `t` clamps to [0, 1].
    pub fn interpolate(&self, end: &Pose2D, t: f64) -> Pose2D {
        if t <= 0.0 {
            return *self;
        }
        if t >= 1.0 {
            return *end;
        }
        let twist = Pose2D::log(&end.relative_to(self));
        self.transform_by(&Pose2D::exp(&twist.scaled(t)))
    }

    /// Twist-norm distance to another pose.
    ///
    /// The effort metric used by the spline optimizer's degeneracy
    /// checks.
    #[inline]
    pub fn distance(&self, other: &Pose2D) -> f64 {
        Pose2D::log(&other.relative_to(self)).norm()
    }

    /// Whether `other` lies on the ray this pose defines.
    ///
    /// True when the relative twist has no lateral or angular component.
    pub fn is_collinear(&self, other: &Pose2D) -> bool {
        let twist = Pose2D::log(&other.relative_to(self));
        twist.dy.abs() < COLLINEAR_EPS && twist.dtheta.abs() < COLLINEAR_EPS
    }

    /// Named scalar field lookup for the export layer.
    ///
    /// # Panics
    /// Panics on any name other than `x`, `y`, or `heading`; asking for
    /// an unknown field is a programming error.
    pub fn scalar(&self, field: &str) -> f64 {
        match field {
            "x" => self.translation.x,
            "y" => self.translation.y,
            "heading" => self.rotation.angle(),
            _ => panic!("unknown pose field: {}", field),
        }
    }
}

impl Default for Pose2D {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_compose_identity() {
        let p = Pose2D::from_xy_heading(1.0, 2.0, 0.5);
        let result = p.transform_by(&Pose2D::identity());
        assert_relative_eq!(result.translation.x, 1.0);
        assert_relative_eq!(result.translation.y, 2.0);
        assert_relative_eq!(result.rotation.angle(), 0.5);
    }

    #[test]
    fn test_inverse_roundtrip() {
        let p = Pose2D::from_xy_heading(1.0, 2.0, 0.5);
        let result = p.transform_by(&p.inverse());
        assert_relative_eq!(result.translation.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(result.translation.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(result.rotation.angle(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_relative_to() {
        let a = Pose2D::from_xy_heading(1.0, 0.0, FRAC_PI_2);
        let b = Pose2D::from_xy_heading(1.0, 1.0, FRAC_PI_2);
        let rel = b.relative_to(&a);
        assert_relative_eq!(rel.translation.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(rel.translation.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(rel.rotation.angle(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_exp_quarter_arc() {
        // A twist of (π/2, 0, π/2) sweeps a quarter circle of radius 1
        let pose = Pose2D::exp(&Twist2D::new(FRAC_PI_2, 0.0, FRAC_PI_2));
        assert_relative_eq!(pose.translation.x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(pose.translation.y, 1.0, epsilon = 1e-9);
        assert_relative_eq!(pose.rotation.angle(), FRAC_PI_2, epsilon = 1e-9);
    }

    #[test]
    fn test_log_exp_roundtrip_random() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..100 {
            let pose = Pose2D::from_xy_heading(
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-PI + 0.01..PI - 0.01),
            );
            let roundtrip = Pose2D::exp(&Pose2D::log(&pose));
            assert_relative_eq!(roundtrip.translation.x, pose.translation.x, epsilon = 1e-9);
            assert_relative_eq!(roundtrip.translation.y, pose.translation.y, epsilon = 1e-9);
            assert_relative_eq!(
                roundtrip.rotation.angle(),
                pose.rotation.angle(),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_log_exp_near_zero_rotation() {
        let pose = Pose2D::from_xy_heading(3.0, -2.0, 1e-7);
        let twist = Pose2D::log(&pose);
        let roundtrip = Pose2D::exp(&twist);
        assert_relative_eq!(roundtrip.translation.x, 3.0, epsilon = 1e-9);
        assert_relative_eq!(roundtrip.translation.y, -2.0, epsilon = 1e-9);
        assert_relative_eq!(roundtrip.rotation.angle(), 1e-7, epsilon = 1e-12);
    }

    #[test]
    fn test_interpolate_endpoints() {
        let a = Pose2D::from_xy_heading(0.0, 0.0, 0.0);
        let b = Pose2D::from_xy_heading(4.0, 2.0, 1.0);
        let start = a.interpolate(&b, 0.0);
        assert_relative_eq!(start.translation.x, 0.0);
        let end = a.interpolate(&b, 1.0);
        assert_relative_eq!(end.translation.x, 4.0);
        assert_relative_eq!(end.rotation.angle(), 1.0);
    }

    #[test]
    fn test_interpolate_arc_midpoint() {
        // Halfway along a quarter arc the heading is half the sweep
        let a = Pose2D::identity();
        let b = Pose2D::exp(&Twist2D::new(FRAC_PI_2, 0.0, FRAC_PI_2));
        let mid = a.interpolate(&b, 0.5);
        assert_relative_eq!(mid.rotation.angle(), FRAC_PI_2 / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_distance_straight() {
        let a = Pose2D::identity();
        let b = Pose2D::from_xy_heading(3.0, 0.0, 0.0);
        assert_relative_eq!(a.distance(&b), 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_collinear() {
        let a = Pose2D::from_xy_heading(0.0, 0.0, 0.0);
        let b = Pose2D::from_xy_heading(5.0, 0.0, 0.0);
        assert!(a.is_collinear(&b));

        let c = Pose2D::from_xy_heading(5.0, 1.0, 0.0);
        assert!(!a.is_collinear(&c));

        let d = Pose2D::from_xy_heading(5.0, 0.0, 0.3);
        assert!(!a.is_collinear(&d));
    }

    #[test]
    fn test_scalar_fields() {
        let p = Pose2D::from_xy_heading(1.5, -2.5, 0.25);
        assert_relative_eq!(p.scalar("x"), 1.5);
        assert_relative_eq!(p.scalar("y"), -2.5);
        assert_relative_eq!(p.scalar("heading"), 0.25, epsilon = 1e-12);
    }

    #[test]
    #[should_panic(expected = "unknown pose field")]
    fn test_scalar_unknown_field_panics() {
        Pose2D::identity().scalar("curvature");
    }
}
