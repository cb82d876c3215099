//! Curvature-smoothing optimizer for spline chains.
//!
//! Iterated steepest descent over the second-derivative handles shared
//! at interior joints: forward-difference partials build a per-joint
//! gradient, the full gradient is normalized to a fixed step length,
//! and a parabola fitted through three samples along the descent
//! direction picks the step scale. A local optimizer only; it smooths
//! joint curvature, it does not find a global minimum.

use super::quintic::{chain_dcurvature2, QuinticSpline};

/// Perturbation used for forward-difference partials.
const GRADIENT_EPS: f64 = 1e-5;

/// Fixed step length the normalized gradient is scaled to.
const STEP_SIZE: f64 = 2.0;

/// Stop once an iteration improves the objective by less than this.
const MIN_DELTA: f64 = 0.001;

/// Iteration cap.
const MAX_ITERATIONS: usize = 100;

/// Smooth a spline chain in place and return the final curvature
/// roughness.
pub fn optimize_spline_chain(splines: &mut [QuinticSpline]) -> f64 {
    let mut previous = chain_dcurvature2(splines);
    if splines.len() <= 1 {
        return previous;
    }

    for iteration in 0..MAX_ITERATIONS {
        run_iteration(splines);
        let current = chain_dcurvature2(splines);
        if previous - current < MIN_DELTA {
            log::debug!(
                "spline optimizer converged after {} iterations (roughness {:.6})",
                iteration + 1,
                current
            );
            return current;
        }
        previous = current;
    }
    log::debug!(
        "spline optimizer hit the iteration cap (roughness {:.6})",
        previous
    );
    previous
}

fn run_iteration(splines: &mut [QuinticSpline]) {
    let joint_count = splines.len() - 1;
    let original = chain_dcurvature2(splines);

    // Forward-difference gradient per interior joint; degenerate
    // (collinear) joints contribute nothing and are left untouched.
    let mut gradient: Vec<Option<(f64, f64)>> = vec![None; joint_count];
    for i in 0..joint_count {
        if splines[i].start_pose().is_collinear(&splines[i + 1].start_pose())
            || splines[i].end_pose().is_collinear(&splines[i + 1].end_pose())
        {
            continue;
        }

        let (ddx, ddy) = splines[i].end_second_derivative();
        set_joint_handle(splines, i, ddx + GRADIENT_EPS, ddy);
        let perturbed_x = chain_dcurvature2(splines);
        set_joint_handle(splines, i, ddx, ddy + GRADIENT_EPS);
        let perturbed_y = chain_dcurvature2(splines);
        set_joint_handle(splines, i, ddx, ddy);

        gradient[i] = Some((
            (perturbed_x - original) / GRADIENT_EPS,
            (perturbed_y - original) / GRADIENT_EPS,
        ));
    }

    let magnitude: f64 = gradient
        .iter()
        .flatten()
        .map(|g| g.0 * g.0 + g.1 * g.1)
        .sum::<f64>()
        .sqrt();
    if magnitude < 1e-12 {
        return;
    }
    let mult = STEP_SIZE / magnitude;

    let originals: Vec<(f64, f64)> = (0..joint_count)
        .map(|i| splines[i].end_second_derivative())
        .collect();

    // Objective at steps -1, 0, +1 along the negative gradient
    // (+1 is one full step downhill).
    apply_step(splines, &originals, &gradient, mult, -1.0);
    let uphill = chain_dcurvature2(splines);
    apply_step(splines, &originals, &gradient, mult, 1.0);
    let downhill = chain_dcurvature2(splines);

    // Parabola through (-1, uphill), (0, original), (+1, downhill)
    let a = 0.5 * (uphill + downhill) - original;
    let b = 0.5 * (downhill - uphill);
    let step = if a > 1e-12 { -b / (2.0 * a) } else { 1.0 };

    apply_step(splines, &originals, &gradient, mult, step);
}

/// Set every joint handle to `original - step · mult · gradient`.
fn apply_step(
    splines: &mut [QuinticSpline],
    originals: &[(f64, f64)],
    gradient: &[Option<(f64, f64)>],
    mult: f64,
    step: f64,
) {
    for (i, grad) in gradient.iter().enumerate() {
        if let Some((gx, gy)) = grad {
            let ddx = originals[i].0 - step * mult * gx;
            let ddy = originals[i].1 - step * mult * gy;
            set_joint_handle(splines, i, ddx, ddy);
        }
    }
}

/// Write the shared handle at joint `i` into both adjacent segments.
fn set_joint_handle(splines: &mut [QuinticSpline], i: usize, ddx: f64, ddy: f64) {
    splines[i].set_end_second_derivative(ddx, ddy);
    splines[i + 1].set_start_second_derivative(ddx, ddy);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spline::Waypoint;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn chain(waypoints: &[Waypoint]) -> Vec<QuinticSpline> {
        waypoints
            .windows(2)
            .map(|w| QuinticSpline::from_waypoints(&w[0], &w[1]))
            .collect()
    }

    #[test]
    fn test_optimization_reduces_roughness() {
        let mut splines = chain(&[
            Waypoint::new(0.0, 0.0, 0.0),
            Waypoint::new(10.0, 10.0, FRAC_PI_2),
            Waypoint::new(20.0, 0.0, 0.0),
        ]);
        let initial = chain_dcurvature2(&splines);
        let optimized = optimize_spline_chain(&mut splines);
        assert!(optimized <= initial);
        assert!(optimized.is_finite());
    }

    #[test]
    fn test_joint_continuity_preserved() {
        let mut splines = chain(&[
            Waypoint::new(0.0, 0.0, 0.0),
            Waypoint::new(10.0, 5.0, 0.5),
            Waypoint::new(20.0, -3.0, -0.5),
        ]);
        optimize_spline_chain(&mut splines);

        // Position, tangent, and second derivative agree at the joint
        let end = splines[0].point_at(1.0);
        let start = splines[1].point_at(0.0);
        assert_relative_eq!(end.x, start.x, epsilon = 1e-9);
        assert_relative_eq!(end.y, start.y, epsilon = 1e-9);
        let a_end = splines[0].acceleration_at(1.0);
        let a_start = splines[1].acceleration_at(0.0);
        assert_relative_eq!(a_end.x, a_start.x, epsilon = 1e-9);
        assert_relative_eq!(a_end.y, a_start.y, epsilon = 1e-9);
    }

    #[test]
    fn test_collinear_joints_left_untouched() {
        let mut splines = chain(&[
            Waypoint::new(0.0, 0.0, 0.0),
            Waypoint::new(10.0, 0.0, 0.0),
            Waypoint::new(20.0, 0.0, 0.0),
        ]);
        let roughness = optimize_spline_chain(&mut splines);
        assert_relative_eq!(roughness, 0.0, epsilon = 1e-9);
        let (ddx, ddy) = splines[0].end_second_derivative();
        assert_relative_eq!(ddx, 0.0);
        assert_relative_eq!(ddy, 0.0);
    }

    #[test]
    fn test_single_segment_is_noop() {
        let mut splines = chain(&[Waypoint::new(0.0, 0.0, 0.0), Waypoint::new(5.0, 5.0, 0.0)]);
        let before = chain_dcurvature2(&splines);
        let after = optimize_spline_chain(&mut splines);
        assert_relative_eq!(before, after);
    }
}
