//! Constrained time parameterization: trajectory types, constraints,
//! and the forward/backward velocity-propagation passes.

mod constraint;
mod timer;

pub use constraint::TrajectoryConstraint;
pub use timer::{resample_by_time, time_parameterize, TimingConfig};

use crate::core::geometry::Pose2D;
use serde::{Deserialize, Serialize};

/// One record of a timed trajectory.
///
/// Created once by the timing pass and immutable afterward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    /// Time from trajectory start, in seconds
    pub time: f64,
    /// Sampled pose
    pub pose: Pose2D,
    /// Signed curvature (1/radius)
    pub curvature: f64,
    /// Cumulative distance from the path start, in path units
    pub distance: f64,
    /// Velocity in path-units/s
    pub velocity: f64,
    /// Acceleration in path-units/s²
    pub acceleration: f64,
    /// Jerk in path-units/s³
    pub jerk: f64,
}

/// A time-ordered trajectory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trajectory {
    points: Vec<TrajectoryPoint>,
}

impl Trajectory {
    /// Wrap a point sequence.
    pub fn new(points: Vec<TrajectoryPoint>) -> Self {
        Self { points }
    }

    /// The underlying points.
    #[inline]
    pub fn points(&self) -> &[TrajectoryPoint] {
        &self.points
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the trajectory holds no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point by index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&TrajectoryPoint> {
        self.points.get(index)
    }

    /// First point.
    #[inline]
    pub fn first(&self) -> Option<&TrajectoryPoint> {
        self.points.first()
    }

    /// Last point.
    #[inline]
    pub fn last(&self) -> Option<&TrajectoryPoint> {
        self.points.last()
    }

    /// Iterate over points.
    pub fn iter(&self) -> std::slice::Iter<'_, TrajectoryPoint> {
        self.points.iter()
    }

    /// Total duration in seconds.
    #[inline]
    pub fn total_time(&self) -> f64 {
        self.points.last().map(|p| p.time).unwrap_or(0.0)
    }

    /// Total distance in path units.
    #[inline]
    pub fn total_distance(&self) -> f64 {
        self.points.last().map(|p| p.distance).unwrap_or(0.0)
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a TrajectoryPoint;
    type IntoIter = std::slice::Iter<'a, TrajectoryPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
