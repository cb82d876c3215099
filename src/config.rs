//! JSON document models for the generator CLI.
//!
//! Two documents come in from disk: the robot's kinematic limits and
//! the path (waypoints, constraints, boundary velocities). Parse
//! failures and invalid values surface as [`MargaError::Parse`] with a
//! descriptive message; no partial trajectory is ever produced from a
//! bad document.

use crate::error::{MargaError, Result};
use crate::spline::Waypoint;
use crate::timing::TrajectoryConstraint;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Robot kinematic limits document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotLimits {
    /// Global velocity ceiling, in units/s
    pub max_velocity: f64,
    /// Global acceleration magnitude bound, in units/s²
    pub max_acceleration: f64,
    /// Optional jerk bound for the jerk-budget report, in units/s³
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_jerk: Option<f64>,
}

impl RobotLimits {
    /// Read and validate a robot-limits document.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let limits: RobotLimits = serde_json::from_str(&text)?;
        limits.validate()?;
        Ok(limits)
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("max_velocity", self.max_velocity),
            ("max_acceleration", self.max_acceleration),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(MargaError::Parse(format!(
                    "robot limit {} must be finite and positive, got {}",
                    name, value
                )));
            }
        }
        if let Some(jerk) = self.max_jerk {
            if !(jerk.is_finite() && jerk > 0.0) {
                return Err(MargaError::Parse(format!(
                    "robot limit max_jerk must be finite and positive, got {}",
                    jerk
                )));
            }
        }
        Ok(())
    }
}

/// Path document: waypoints, constraints, and boundary velocities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathDocument {
    /// Ordered waypoint list
    pub waypoints: Vec<Waypoint>,
    /// Pointwise constraints, composed by intersection
    #[serde(default)]
    pub constraints: Vec<TrajectoryConstraint>,
    /// Velocity at the path start, in units/s
    #[serde(default)]
    pub start_velocity: f64,
    /// Velocity at the path end, in units/s
    #[serde(default)]
    pub end_velocity: f64,
}

impl PathDocument {
    /// Read and validate a path document.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let document: PathDocument = serde_json::from_str(&text)?;
        document.validate()?;
        Ok(document)
    }

    fn validate(&self) -> Result<()> {
        if self.waypoints.len() < 2 {
            return Err(MargaError::Parse(format!(
                "path needs at least two waypoints, got {}",
                self.waypoints.len()
            )));
        }
        for (i, waypoint) in self.waypoints.iter().enumerate() {
            if !(waypoint.x.is_finite() && waypoint.y.is_finite() && waypoint.heading.is_finite())
            {
                return Err(MargaError::Parse(format!(
                    "waypoint {} has non-finite coordinates",
                    i
                )));
            }
        }
        for (name, value) in [
            ("start_velocity", self.start_velocity),
            ("end_velocity", self.end_velocity),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(MargaError::Parse(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
