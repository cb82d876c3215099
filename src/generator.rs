//! End-to-end trajectory generation pipeline.
//!
//! Chains the stages in order: waypoints → quintic splines →
//! curvature-smoothing optimization → adaptive flattening → fixed-step
//! distance resampling → constrained time parameterization →
//! fixed-timestep output. Purely functional over its inputs; safe to
//! run concurrently with one generator per call.

use crate::error::{MargaError, Result};
use crate::path::{flatten, resample_by_distance, FlattenConfig};
use crate::spline::{optimize_spline_chain, QuinticSpline, Waypoint};
use crate::timing::{
    resample_by_time, time_parameterize, TimingConfig, Trajectory, TrajectoryConstraint,
};

/// Full pipeline configuration: kinematic limits, tessellation
/// tolerances, and output timing.
#[derive(Debug, Clone, Copy)]
pub struct GeneratorConfig {
    /// Global velocity ceiling, in units/s
    pub max_velocity: f64,
    /// Global acceleration magnitude bound, in units/s²
    pub max_acceleration: f64,
    /// Velocity at the path start, in units/s
    pub start_velocity: f64,
    /// Velocity at the path end, in units/s
    pub end_velocity: f64,
    /// Flattening tolerances
    pub flatten: FlattenConfig,
    /// Arc-length resampling step, in path units
    pub step: f64,
    /// Output timestep, in seconds
    pub timestep: f64,
}

impl GeneratorConfig {
    /// Limits with default tolerances and zero boundary velocities.
    pub fn new(max_velocity: f64, max_acceleration: f64) -> Self {
        Self {
            max_velocity,
            max_acceleration,
            start_velocity: 0.0,
            end_velocity: 0.0,
            flatten: FlattenConfig::default(),
            step: 0.5,
            timestep: 0.01,
        }
    }

    fn validate(&self) -> Result<()> {
        let scalars = [
            ("max_velocity", self.max_velocity),
            ("max_acceleration", self.max_acceleration),
            ("step", self.step),
            ("timestep", self.timestep),
        ];
        for (name, value) in scalars {
            if !(value.is_finite() && value > 0.0) {
                return Err(MargaError::Config(format!(
                    "{} must be finite and positive, got {}",
                    name, value
                )));
            }
        }
        for (name, value) in [
            ("start_velocity", self.start_velocity),
            ("end_velocity", self.end_velocity),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(MargaError::Config(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// The trajectory generation pipeline.
pub struct TrajectoryGenerator {
    config: GeneratorConfig,
}

impl TrajectoryGenerator {
    /// Create a generator for a configuration.
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate a fixed-timestep trajectory through the waypoints.
    pub fn generate(
        &self,
        waypoints: &[Waypoint],
        constraints: &[TrajectoryConstraint],
    ) -> Result<Trajectory> {
        self.config.validate()?;
        if waypoints.len() < 2 {
            return Err(MargaError::Config(format!(
                "at least two waypoints are required, got {}",
                waypoints.len()
            )));
        }
        for (i, waypoint) in waypoints.iter().enumerate() {
            if !(waypoint.x.is_finite() && waypoint.y.is_finite() && waypoint.heading.is_finite())
            {
                return Err(MargaError::Config(format!(
                    "waypoint {} has non-finite coordinates",
                    i
                )));
            }
        }
        for (i, pair) in waypoints.windows(2).enumerate() {
            let chord = (pair[1].x - pair[0].x).hypot(pair[1].y - pair[0].y);
            if chord < crate::core::math::DISTANCE_EPS {
                return Err(MargaError::Config(format!(
                    "waypoints {} and {} coincide",
                    i,
                    i + 1
                )));
            }
        }

        let mut splines: Vec<QuinticSpline> = waypoints
            .windows(2)
            .map(|pair| QuinticSpline::from_waypoints(&pair[0], &pair[1]))
            .collect();
        let roughness = optimize_spline_chain(&mut splines);
        log::info!(
            "fitted {} spline segments, curvature roughness {:.6}",
            splines.len(),
            roughness
        );

        let samples = flatten(&splines, &self.config.flatten)?;
        log::info!("flattened path into {} samples", samples.len());

        let spaced = resample_by_distance(&samples, self.config.step);
        log::debug!(
            "resampled to {} points over {:.3} path units",
            spaced.len(),
            spaced.last().map(|p| p.distance).unwrap_or(0.0)
        );

        let timing = TimingConfig {
            max_velocity: self.config.max_velocity,
            max_acceleration: self.config.max_acceleration,
            start_velocity: self.config.start_velocity,
            end_velocity: self.config.end_velocity,
        };
        let timed = time_parameterize(&spaced, constraints, &timing)?;
        log::info!(
            "timed trajectory spans {:.3} s over {:.3} path units",
            timed.total_time(),
            timed.total_distance()
        );

        Ok(resample_by_time(&timed, self.config.timestep))
    }
}
