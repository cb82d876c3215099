//! Adaptive flattening of a spline chain into curve samples.
//!
//! Each segment is recursively bisected until the relative pose change
//! across a parameter interval fits within the configured twist
//! tolerances. Sample density follows curvature: dense through sharp
//! turns, sparse on straight runs.

use crate::core::geometry::Pose2D;
use crate::error::{MargaError, Result};
use crate::spline::{CurvePoint, QuinticSpline};

/// Bisection depth bound. Exceeding it means the tolerances cannot be
/// met and the configuration is rejected.
pub const MAX_SUBDIVIDE_DEPTH: usize = 20;

/// Per-step geometric tolerances for flattening.
#[derive(Debug, Clone, Copy)]
pub struct FlattenConfig {
    /// Maximum longitudinal twist per step, in path units
    pub max_dx: f64,
    /// Maximum lateral twist per step, in path units
    pub max_dy: f64,
    /// Maximum heading twist per step, in radians
    pub max_dtheta: f64,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            max_dx: 0.05,
            max_dy: 0.005,
            max_dtheta: 0.1,
        }
    }
}

/// Flatten a spline chain into a pose+curvature sample sequence.
///
/// The first sample of the chain is emitted explicitly; recursion then
/// emits one sample per accepted interval end.
pub fn flatten(splines: &[QuinticSpline], config: &FlattenConfig) -> Result<Vec<CurvePoint>> {
    let mut samples = Vec::new();
    if splines.is_empty() {
        return Ok(samples);
    }

    samples.push(splines[0].curve_point_at(0.0));
    for spline in splines {
        subdivide(spline, 0.0, 1.0, config, &mut samples, 0)?;
    }
    Ok(samples)
}

fn subdivide(
    spline: &QuinticSpline,
    t0: f64,
    t1: f64,
    config: &FlattenConfig,
    samples: &mut Vec<CurvePoint>,
    depth: usize,
) -> Result<()> {
    if depth >= MAX_SUBDIVIDE_DEPTH {
        return Err(MargaError::Config(format!(
            "tessellation tolerances too tight: subdivision exceeded depth {}",
            MAX_SUBDIVIDE_DEPTH
        )));
    }

    let start = spline.pose_at(t0);
    let end = spline.pose_at(t1);
    let twist = Pose2D::log(&end.relative_to(&start));

    if twist.dx.abs() > config.max_dx
        || twist.dy.abs() > config.max_dy
        || twist.dtheta.abs() > config.max_dtheta
    {
        let mid = (t0 + t1) / 2.0;
        subdivide(spline, t0, mid, config, samples, depth + 1)?;
        subdivide(spline, mid, t1, config, samples, depth + 1)?;
    } else {
        samples.push(spline.curve_point_at(t1));
    }
    Ok(())
}
