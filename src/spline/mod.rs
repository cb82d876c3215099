//! Quintic spline path geometry.

mod optimizer;
mod quintic;

pub use optimizer::optimize_spline_chain;
pub use quintic::QuinticSpline;

use crate::core::geometry::Pose2D;
use serde::{Deserialize, Serialize};

/// A sparse path waypoint: position plus heading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// X coordinate in path units
    pub x: f64,
    /// Y coordinate in path units
    pub y: f64,
    /// Heading in radians
    pub heading: f64,
}

impl Waypoint {
    /// Create a new waypoint.
    #[inline]
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Self { x, y, heading }
    }

    /// The waypoint as a pose.
    #[inline]
    pub fn pose(&self) -> Pose2D {
        Pose2D::from_xy_heading(self.x, self.y, self.heading)
    }
}

/// A dense sample of the spline chain.
///
/// Immutable once produced by flattening. Curvature is signed by turn
/// direction; `dcurvature_ds` is its derivative with respect to arc
/// length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Sampled pose
    pub pose: Pose2D,
    /// Signed curvature (1/radius)
    pub curvature: f64,
    /// Curvature derivative with respect to arc length
    pub dcurvature_ds: f64,
}

impl CurvePoint {
    /// Create a new curve sample.
    #[inline]
    pub fn new(pose: Pose2D, curvature: f64, dcurvature_ds: f64) -> Self {
        Self {
            pose,
            curvature,
            dcurvature_ds,
        }
    }
}
