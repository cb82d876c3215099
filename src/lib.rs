//! MargaGen - Offline trajectory generator for wheeled robots
//!
//! Turns a sparse list of 2D waypoints (position + heading) into a
//! densely time-stamped trajectory (position, heading, curvature,
//! velocity, acceleration, jerk) that respects declared kinematic
//! limits and pointwise velocity/acceleration constraints.
//!
//! # Architecture
//!
//! The crate is organized into logical layers; data flows strictly
//! downward from waypoints to timed output:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                      io/                            │  ← Table export
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                   generator                         │  ← Pipeline facade
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                    timing/                          │  ← Time parameterization
//! │           (constraints, forward/backward)           │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     path/                           │  ← Sampled-path views
//! │             (flattening, distance index)            │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │               spline/    profile/                   │  ← Path geometry,
//! │        (quintic, optimizer, 1-D profiles)           │    motion profiles
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Foundation
//! │                (geometry, math)                     │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! The pipeline is single-threaded and purely functional over its
//! inputs; independent invocations are safe to run on separate threads,
//! and identical inputs produce bit-for-bit identical output.
//!
//! # Usage
//!
//! ```
//! use marga_gen::{GeneratorConfig, TrajectoryGenerator, Waypoint};
//!
//! let generator = TrajectoryGenerator::new(GeneratorConfig::new(100.0, 50.0));
//! let waypoints = [Waypoint::new(0.0, 0.0, 0.0), Waypoint::new(100.0, 0.0, 0.0)];
//! let trajectory = generator.generate(&waypoints, &[]).unwrap();
//! assert!(trajectory.total_time() > 0.0);
//! ```

// Layer 1: Core foundation (no internal deps)
pub mod core;

// Layer 2: Motion profiles and path geometry (depend on core)
pub mod profile;
pub mod spline;

// Layer 3: Sampled-path views (depends on core, spline)
pub mod path;

// Layer 4: Time parameterization (depends on all below)
pub mod timing;

// Layer 5: Pipeline facade
pub mod generator;

// Layer 6: CLI documents and table export
pub mod config;
pub mod io;

pub mod error;

// Convenience re-exports (flat namespace for common use)
pub use crate::core::geometry::{Point2D, Pose2D, Rotation2D, Twist2D};
pub use config::{PathDocument, RobotLimits};
pub use error::{MargaError, Result};
pub use generator::{GeneratorConfig, TrajectoryGenerator};
pub use path::{flatten, resample_by_distance, DistanceView, DistancedPoint, FlattenConfig};
pub use profile::{SCurveProfile, TrapezoidalProfile};
pub use spline::{optimize_spline_chain, CurvePoint, QuinticSpline, Waypoint};
pub use timing::{
    resample_by_time, time_parameterize, TimingConfig, Trajectory, TrajectoryConstraint,
    TrajectoryPoint,
};
