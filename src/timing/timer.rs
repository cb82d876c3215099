//! Forward/backward constrained time parameterization.
//!
//! Two relaxation passes over a distance-indexed sample sequence: the
//! forward pass limits each sample's velocity to what is reachable from
//! its predecessor under the acceleration ceiling, the backward pass
//! limits it to what can still decelerate into its successor. Both
//! passes tighten the adjacent sample's acceleration bound and re-run
//! the current index when a bound turns out too optimistic. A final
//! integration pass converts the velocity profile into timed points.

use super::constraint::TrajectoryConstraint;
use super::{Trajectory, TrajectoryPoint};
use crate::core::math::{ACCEL_EPS, DISTANCE_EPS, TIME_EPS};
use crate::error::{MargaError, Result};
use crate::path::DistancedPoint;

/// Global limits and boundary velocities for the timing pass.
#[derive(Debug, Clone, Copy)]
pub struct TimingConfig {
    /// Global velocity ceiling, in units/s
    pub max_velocity: f64,
    /// Global acceleration magnitude bound, in units/s²
    pub max_acceleration: f64,
    /// Velocity at the first sample, in units/s
    pub start_velocity: f64,
    /// Velocity at the last sample, in units/s
    pub end_velocity: f64,
}

impl TimingConfig {
    /// Limits with zero boundary velocities.
    pub fn new(max_velocity: f64, max_acceleration: f64) -> Self {
        Self {
            max_velocity,
            max_acceleration,
            start_velocity: 0.0,
            end_velocity: 0.0,
        }
    }
}

/// Per-sample state carried through the passes.
#[derive(Debug, Clone, Copy)]
struct ConstrainedState {
    distance: f64,
    max_velocity: f64,
    min_accel: f64,
    max_accel: f64,
}

/// Assign velocities, accelerations, and times to a distance-indexed
/// sample sequence.
///
/// The samples must be ordered by strictly increasing distance.
/// Constraints compose by intersection; an empty intersected
/// acceleration interval or a NaN velocity is an invariant violation
/// and panics.
pub fn time_parameterize(
    points: &[DistancedPoint],
    constraints: &[TrajectoryConstraint],
    config: &TimingConfig,
) -> Result<Trajectory> {
    if points.len() < 2 {
        return Err(MargaError::Config(
            "time parameterization needs at least two samples".into(),
        ));
    }
    for pair in points.windows(2) {
        assert!(
            pair[1].distance >= pair[0].distance,
            "sample distances must be non-decreasing"
        );
    }

    let mut states = vec![
        ConstrainedState {
            distance: 0.0,
            max_velocity: 0.0,
            min_accel: -config.max_acceleration,
            max_accel: config.max_acceleration,
        };
        points.len()
    ];
    forward_pass(points, constraints, config, &mut states);
    backward_pass(points, constraints, config, &mut states);
    Ok(Trajectory::new(integrate(points, &states)))
}

/// Forward reachability: cap each sample's velocity by what its
/// predecessor can accelerate to over the separating distance.
fn forward_pass(
    points: &[DistancedPoint],
    constraints: &[TrajectoryConstraint],
    config: &TimingConfig,
    states: &mut [ConstrainedState],
) {
    // Synthetic seed standing in for the sample before the first one.
    let mut predecessor = ConstrainedState {
        distance: points[0].distance,
        max_velocity: config.start_velocity,
        min_accel: -config.max_acceleration,
        max_accel: config.max_acceleration,
    };

    for (i, point) in points.iter().enumerate() {
        let ds = point.distance - predecessor.distance;
        let mut state = states[i];
        state.distance = point.distance;

        loop {
            // vf² = vi² + 2·a·ds under the predecessor's ceiling,
            // capped by the global limit.
            state.max_velocity = config.max_velocity.min(
                (predecessor.max_velocity * predecessor.max_velocity
                    + 2.0 * predecessor.max_accel * ds)
                    .sqrt(),
            );
            assert!(
                !state.max_velocity.is_nan(),
                "forward pass produced NaN velocity at sample {}",
                i
            );

            state.min_accel = -config.max_acceleration;
            state.max_accel = config.max_acceleration;
            for constraint in constraints {
                state.max_velocity = state.max_velocity.min(constraint.max_velocity(point));
            }
            assert!(
                state.max_velocity >= 0.0 && !state.max_velocity.is_nan(),
                "constraint returned an invalid velocity ceiling at sample {}",
                i
            );
            for constraint in constraints {
                let (lo, hi) = constraint.accel_bounds(point, state.max_velocity);
                state.min_accel = state.min_accel.max(lo);
                state.max_accel = state.max_accel.min(hi);
            }
            assert!(
                state.min_accel <= state.max_accel,
                "empty acceleration interval at sample {}",
                i
            );

            if ds < DISTANCE_EPS {
                break;
            }

            // Acceleration actually required to reach this velocity
            // from the predecessor.
            let actual_accel = (state.max_velocity * state.max_velocity
                - predecessor.max_velocity * predecessor.max_velocity)
                / (2.0 * ds);
            if state.max_accel < actual_accel - ACCEL_EPS {
                // The predecessor assumed more acceleration than this
                // sample allows; cap it and re-propagate.
                predecessor.max_accel = state.max_accel;
                continue;
            }
            if actual_accel > predecessor.min_accel + ACCEL_EPS {
                predecessor.max_accel = actual_accel;
            }
            // An actual acceleration below the predecessor's floor is
            // repaired by the backward pass.
            break;
        }

        if i > 0 {
            states[i - 1] = predecessor;
        }
        states[i] = state;
        predecessor = state;
    }
}

/// Reverse reachability: cap each sample's velocity by what can still
/// decelerate into its successor.
fn backward_pass(
    points: &[DistancedPoint],
    constraints: &[TrajectoryConstraint],
    config: &TimingConfig,
    states: &mut [ConstrainedState],
) {
    let last = points.len() - 1;
    let mut successor = ConstrainedState {
        distance: points[last].distance,
        max_velocity: config.end_velocity,
        min_accel: -config.max_acceleration,
        max_accel: config.max_acceleration,
    };

    for (i, point) in points.iter().enumerate().rev() {
        let ds = successor.distance - point.distance;
        let mut state = states[i];

        loop {
            // The highest velocity from which the successor's velocity
            // is still reachable under its deceleration floor.
            let reachable = (successor.max_velocity * successor.max_velocity
                - 2.0 * successor.min_accel * ds)
                .sqrt();
            if reachable >= state.max_velocity {
                break;
            }
            assert!(
                !reachable.is_nan(),
                "backward pass produced NaN velocity at sample {}",
                i
            );
            state.max_velocity = reachable;

            for constraint in constraints {
                let (lo, hi) = constraint.accel_bounds(point, state.max_velocity);
                state.min_accel = state.min_accel.max(lo);
                state.max_accel = state.max_accel.min(hi);
            }
            assert!(
                state.min_accel <= state.max_accel,
                "empty acceleration interval at sample {}",
                i
            );

            if ds < DISTANCE_EPS {
                break;
            }

            let actual_accel = (successor.max_velocity * successor.max_velocity
                - state.max_velocity * state.max_velocity)
                / (2.0 * ds);
            if state.min_accel > actual_accel + ACCEL_EPS {
                // The deceleration required here is stronger than this
                // sample's floor; raise the successor's floor and
                // re-propagate.
                successor.min_accel = state.min_accel;
                continue;
            }
            successor.min_accel = actual_accel;
            break;
        }

        if i < last {
            states[i + 1] = successor;
        }
        states[i] = state;
        successor = state;
    }
}

/// Convert the relaxed velocity profile into timed trajectory points.
fn integrate(points: &[DistancedPoint], states: &[ConstrainedState]) -> Vec<TrajectoryPoint> {
    let mut timed = Vec::with_capacity(points.len());
    let mut time = 0.0;
    let mut velocity = states[0].max_velocity;
    let mut previous_accel = 0.0;

    for (i, (point, state)) in points.iter().zip(states.iter()).enumerate() {
        let (accel, dt) = if i == 0 {
            (0.0, 0.0)
        } else {
            let ds = state.distance - states[i - 1].distance;
            let v = state.max_velocity;
            let accel = if ds > DISTANCE_EPS {
                (v * v - velocity * velocity) / (2.0 * ds)
            } else {
                0.0
            };
            let dt = if accel.abs() > ACCEL_EPS {
                (v - velocity) / accel
            } else if velocity.abs() > DISTANCE_EPS {
                ds / velocity
            } else {
                assert!(
                    ds < DISTANCE_EPS,
                    "cannot cover distance {} with zero velocity and acceleration at sample {}",
                    ds,
                    i
                );
                0.0
            };
            (accel, dt)
        };
        assert!(dt.is_finite(), "non-finite time step at sample {}", i);

        time += dt;
        let jerk = if dt > TIME_EPS {
            (accel - previous_accel) / dt
        } else {
            0.0
        };

        timed.push(TrajectoryPoint {
            time,
            pose: point.point.pose,
            curvature: point.point.curvature,
            distance: state.distance,
            velocity: state.max_velocity,
            acceleration: accel,
            jerk,
        });
        velocity = state.max_velocity;
        previous_accel = accel;
    }
    timed
}

/// Resample a timed trajectory at a constant timestep.
///
/// Walks absolute time from zero to the final time; each output point
/// linearly interpolates the bracketing pair of input points, found by
/// a cursor scan that exploits the monotonic walk. Times outside the
/// input range clamp to the boundary points. The input trajectory is
/// not mutated.
pub fn resample_by_time(trajectory: &Trajectory, timestep: f64) -> Trajectory {
    debug_assert!(timestep > 0.0);
    let points = trajectory.points();
    if points.is_empty() {
        return Trajectory::default();
    }

    let count = (trajectory.total_time() / timestep).floor() as usize;
    let mut cursor = 0;
    let resampled = (0..=count)
        .map(|k| sample_at(points, k as f64 * timestep, &mut cursor))
        .collect();
    Trajectory::new(resampled)
}

fn sample_at(points: &[TrajectoryPoint], time: f64, cursor: &mut usize) -> TrajectoryPoint {
    let last = points.len() - 1;
    if time <= points[0].time {
        return points[0];
    }
    if time >= points[last].time {
        return points[last];
    }

    while *cursor + 1 < last && points[*cursor + 1].time < time {
        *cursor += 1;
    }
    let a = &points[*cursor];
    let b = &points[*cursor + 1];
    let span = b.time - a.time;
    let t = if span > TIME_EPS {
        (time - a.time) / span
    } else {
        0.0
    };

    TrajectoryPoint {
        time,
        pose: a.pose.interpolate(&b.pose, t),
        curvature: a.curvature + t * (b.curvature - a.curvature),
        distance: a.distance + t * (b.distance - a.distance),
        velocity: a.velocity + t * (b.velocity - a.velocity),
        acceleration: a.acceleration + t * (b.acceleration - a.acceleration),
        jerk: a.jerk + t * (b.jerk - a.jerk),
    }
}
