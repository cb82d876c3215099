//! Unit-circle rotation.
//!
//! Headings are stored as a (cos, sin) pair, never as an angle, so
//! composition does not accumulate wraparound error.

use super::point::Point2D;
use crate::core::math::ROTATION_EPS;
use serde::{Deserialize, Serialize};

/// A 2D rotation stored as cosine/sine.
///
/// Invariant: the (cos, sin) pair is unit-norm, except for values built
/// with [`Rotation2D::from_raw`], which spline derivatives use as an
/// unnormalized direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation2D {
    /// Cosine of the heading angle
    pub cos: f64,
    /// Sine of the heading angle
    pub sin: f64,
}

impl Rotation2D {
    /// Create a rotation from a (cos, sin) pair, normalizing to the
    /// unit circle. A near-zero pair degrades to the identity.
    pub fn new(cos: f64, sin: f64) -> Self {
        let magnitude = (cos * cos + sin * sin).sqrt();
        if magnitude > ROTATION_EPS {
            Self {
                cos: cos / magnitude,
                sin: sin / magnitude,
            }
        } else {
            Self { cos: 1.0, sin: 0.0 }
        }
    }

    /// Create a rotation from a (cos, sin) pair without normalizing.
    #[inline]
    pub fn from_raw(cos: f64, sin: f64) -> Self {
        Self { cos, sin }
    }

    /// Create a rotation from an angle in radians.
    #[inline]
    pub fn from_angle(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self { cos, sin }
    }

    /// Identity rotation (zero heading).
    #[inline]
    pub fn identity() -> Self {
        Self { cos: 1.0, sin: 0.0 }
    }

    /// Heading angle in radians in [-π, π].
    #[inline]
    pub fn angle(&self) -> f64 {
        self.sin.atan2(self.cos)
    }

    /// Compose with another rotation: self then `other`.
    #[inline]
    pub fn rotate_by(&self, other: &Rotation2D) -> Rotation2D {
        Rotation2D::new(
            self.cos * other.cos - self.sin * other.sin,
            self.cos * other.sin + self.sin * other.cos,
        )
    }

    /// Inverse rotation.
    #[inline]
    pub fn inverse(&self) -> Rotation2D {
        Rotation2D {
            cos: self.cos,
            sin: -self.sin,
        }
    }

    /// Rotate a point about the origin.
    #[inline]
    pub fn rotate_point(&self, point: &Point2D) -> Point2D {
        Point2D::new(
            point.x * self.cos - point.y * self.sin,
            point.x * self.sin + point.y * self.cos,
        )
    }

    /// Renormalize onto the unit circle.
    #[inline]
    pub fn normalized(&self) -> Rotation2D {
        Rotation2D::new(self.cos, self.sin)
    }
}

impl Default for Rotation2D {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    #[test]
    fn test_from_angle_roundtrip() {
        for angle in [-PI + 0.01, -FRAC_PI_2, 0.0, FRAC_PI_4, 1.0, PI - 0.01] {
            let r = Rotation2D::from_angle(angle);
            assert_relative_eq!(r.angle(), angle, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_new_normalizes() {
        let r = Rotation2D::new(3.0, 4.0);
        assert_relative_eq!(r.cos * r.cos + r.sin * r.sin, 1.0, epsilon = 1e-12);
        assert_relative_eq!(r.cos, 0.6, epsilon = 1e-12);
        assert_relative_eq!(r.sin, 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_pair_is_identity() {
        let r = Rotation2D::new(0.0, 0.0);
        assert_relative_eq!(r.cos, 1.0);
        assert_relative_eq!(r.sin, 0.0);
    }

    #[test]
    fn test_compose_no_wraparound() {
        // Composing past ±π stays on the unit circle
        let mut r = Rotation2D::from_angle(3.0);
        r = r.rotate_by(&Rotation2D::from_angle(3.0));
        assert_relative_eq!(r.cos * r.cos + r.sin * r.sin, 1.0, epsilon = 1e-12);
        assert_relative_eq!(r.angle(), 6.0 - 2.0 * PI, epsilon = 1e-12);
    }

    #[test]
    fn test_inverse() {
        let r = Rotation2D::from_angle(0.7);
        let composed = r.rotate_by(&r.inverse());
        assert_relative_eq!(composed.angle(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotate_point() {
        let r = Rotation2D::from_angle(FRAC_PI_2);
        let p = r.rotate_point(&Point2D::new(1.0, 0.0));
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_from_raw_keeps_magnitude() {
        let r = Rotation2D::from_raw(3.0, 4.0);
        assert_relative_eq!(r.cos, 3.0);
        assert_relative_eq!(r.sin, 4.0);
        let n = r.normalized();
        assert_relative_eq!(n.cos, 0.6, epsilon = 1e-12);
    }
}
