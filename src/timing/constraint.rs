//! Pointwise trajectory constraints.
//!
//! A constraint is a pure capability: given a distance-indexed sample
//! and a candidate velocity it yields a velocity ceiling and a feasible
//! acceleration interval. Multiple constraints compose by intersection;
//! the tightest bound wins. Serialization switches on the explicit tag,
//! so the set of kinds is closed.

use crate::path::DistancedPoint;
use serde::{Deserialize, Serialize};

/// Curvature below which a centripetal bound imposes no ceiling.
const FLAT_CURVATURE_EPS: f64 = 1e-9;

/// A pointwise velocity/acceleration constraint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrajectoryConstraint {
    /// Velocity ceiling between two path distances.
    DistanceVelocity {
        /// Window start distance, in path units
        after: f64,
        /// Window end distance, in path units
        before: f64,
        /// Velocity ceiling inside the window
        velocity: f64,
    },
    /// Velocity ceiling derived from curvature and a lateral
    /// acceleration limit.
    Centripetal {
        /// Maximum centripetal acceleration, in units/s²
        max_accel: f64,
    },
}

impl TrajectoryConstraint {
    /// Velocity ceiling at a sample. Unbounded samples return infinity.
    pub fn max_velocity(&self, point: &DistancedPoint) -> f64 {
        match self {
            TrajectoryConstraint::DistanceVelocity {
                after,
                before,
                velocity,
            } => {
                if point.distance >= *after && point.distance <= *before {
                    *velocity
                } else {
                    f64::INFINITY
                }
            }
            TrajectoryConstraint::Centripetal { max_accel } => {
                let curvature = point.point.curvature.abs();
                if curvature < FLAT_CURVATURE_EPS {
                    f64::INFINITY
                } else {
                    (max_accel / curvature).sqrt()
                }
            }
        }
    }

    /// Feasible [min, max] acceleration interval at a sample and
    /// candidate velocity.
    ///
    /// Neither kind narrows the interval; the timing pass intersects
    /// these with the global bounds.
    pub fn accel_bounds(&self, _point: &DistancedPoint, _velocity: f64) -> (f64, f64) {
        (f64::NEG_INFINITY, f64::INFINITY)
    }
}
