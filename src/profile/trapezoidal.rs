//! Closed-form trapezoidal velocity profile.
//!
//! A profile over a 1-D distance axis: accelerate from the start
//! velocity, optionally cruise at a peak velocity, decelerate to the end
//! velocity. [`TrapezoidalProfile::update`] classifies the feasible
//! shape for a requested distance; queries are closed-form in time.

use crate::core::math::{self, DISTANCE_EPS};
use crate::error::{MargaError, Result};

/// A trapezoidal (accel/cruise/decel) motion profile.
///
/// Shapes, by case analysis on feasibility:
/// - *Trapezoid*: enough distance to reach the maximum velocity and
///   cruise before decelerating.
/// - *Pyramid*: no room to cruise; the achievable peak velocity balances
///   the acceleration and deceleration distances.
/// - *Decel-only*: even the pyramid peak falls below the start velocity;
///   the profile is a pure deceleration, and a mismatch against the
///   requested distance is an infeasible request.
#[derive(Debug, Clone)]
pub struct TrapezoidalProfile {
    accel: f64,
    decel: f64,
    max_velocity: f64,

    start_velocity: f64,
    end_velocity: f64,
    distance: f64,
    cruise_velocity: f64,
    accel_time: f64,
    cruise_time: f64,
    decel_time: f64,
    accel_distance: f64,
    cruise_distance: f64,
}

impl TrapezoidalProfile {
    /// Create a profile from kinematic limits.
    ///
    /// `accel` is positive, `decel` negative, both in units/s².
    pub fn new(accel: f64, decel: f64, max_velocity: f64) -> Self {
        debug_assert!(accel > 0.0 && decel < 0.0 && max_velocity > 0.0);
        Self {
            accel,
            decel,
            max_velocity,
            start_velocity: 0.0,
            end_velocity: 0.0,
            distance: 0.0,
            cruise_velocity: 0.0,
            accel_time: 0.0,
            cruise_time: 0.0,
            decel_time: 0.0,
            accel_distance: 0.0,
            cruise_distance: 0.0,
        }
    }

    /// Solve the profile for a requested distance and boundary
    /// velocities.
    ///
    /// Returns [`MargaError::Infeasible`] when no shape covers the
    /// request: a pure deceleration that cannot match the distance, or
    /// an end velocity unreachable within it.
    pub fn update(&mut self, distance: f64, start_velocity: f64, end_velocity: f64) -> Result<()> {
        let start_velocity = start_velocity.min(self.max_velocity);
        let end_velocity = end_velocity.min(self.max_velocity);
        self.start_velocity = start_velocity;
        self.end_velocity = end_velocity;
        self.distance = distance;

        let full_accel_distance =
            (self.max_velocity * self.max_velocity - start_velocity * start_velocity)
                / (2.0 * self.accel);
        let full_decel_distance =
            (end_velocity * end_velocity - self.max_velocity * self.max_velocity)
                / (2.0 * self.decel);

        if full_accel_distance + full_decel_distance <= distance {
            // Trapezoid: reach max velocity, cruise, decelerate.
            self.cruise_velocity = self.max_velocity;
            self.accel_distance = full_accel_distance;
            self.cruise_distance = distance - full_accel_distance - full_decel_distance;
            self.accel_time = (self.cruise_velocity - start_velocity) / self.accel;
            self.cruise_time = self.cruise_distance / self.cruise_velocity;
            self.decel_time = (end_velocity - self.cruise_velocity) / self.decel;
            return Ok(());
        }

        // Pyramid: balance the accel/decel distance areas for the
        // achievable peak, with zero cruise time.
        let denom = 1.0 / (2.0 * self.accel) - 1.0 / (2.0 * self.decel);
        let peak_squared = (distance + start_velocity * start_velocity / (2.0 * self.accel)
            - end_velocity * end_velocity / (2.0 * self.decel))
            / denom;
        let peak = peak_squared.max(0.0).sqrt();

        if peak < start_velocity {
            return self.update_decel_only(distance, start_velocity, end_velocity);
        }
        if peak < end_velocity {
            return Err(MargaError::Infeasible(format!(
                "end velocity {:.3} unreachable within distance {:.3}",
                end_velocity, distance
            )));
        }

        self.cruise_velocity = peak;
        self.accel_distance =
            (peak * peak - start_velocity * start_velocity) / (2.0 * self.accel);
        self.cruise_distance = 0.0;
        self.accel_time = (peak - start_velocity) / self.accel;
        self.cruise_time = 0.0;
        self.decel_time = (end_velocity - peak) / self.decel;
        Ok(())
    }

    /// Pure deceleration from the start velocity.
    fn update_decel_only(
        &mut self,
        distance: f64,
        start_velocity: f64,
        end_velocity: f64,
    ) -> Result<()> {
        let pure_distance = (end_velocity * end_velocity - start_velocity * start_velocity)
            / (2.0 * self.decel);

        if pure_distance > distance + DISTANCE_EPS {
            return Err(MargaError::Infeasible(format!(
                "cannot shed velocity {:.3} -> {:.3} within distance {:.3} \
                 (needs {:.3})",
                start_velocity, end_velocity, distance, pure_distance
            )));
        }
        if pure_distance < distance - DISTANCE_EPS {
            return Err(MargaError::Infeasible(format!(
                "pure deceleration covers {:.3}, undershooting requested distance {:.3}",
                pure_distance, distance
            )));
        }

        self.cruise_velocity = start_velocity;
        self.accel_distance = 0.0;
        self.cruise_distance = 0.0;
        self.accel_time = 0.0;
        self.cruise_time = 0.0;
        self.decel_time = (end_velocity - start_velocity) / self.decel;
        Ok(())
    }

    /// Total profile duration in seconds.
    #[inline]
    pub fn total_time(&self) -> f64 {
        self.accel_time + self.cruise_time + self.decel_time
    }

    /// Requested profile distance.
    #[inline]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Duration of the acceleration phase.
    #[inline]
    pub fn accel_time(&self) -> f64 {
        self.accel_time
    }

    /// Duration of the cruise phase.
    #[inline]
    pub fn cruise_time(&self) -> f64 {
        self.cruise_time
    }

    /// Duration of the deceleration phase.
    #[inline]
    pub fn decel_time(&self) -> f64 {
        self.decel_time
    }

    /// Achieved peak (cruise) velocity.
    #[inline]
    pub fn cruise_velocity(&self) -> f64 {
        self.cruise_velocity
    }

    /// Start velocity after limit clamping.
    #[inline]
    pub fn start_velocity(&self) -> f64 {
        self.start_velocity
    }

    /// Acceleration at time `t`; out-of-range times clamp to the
    /// profile boundaries.
    pub fn accel_at(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, self.total_time());
        if t < self.accel_time {
            self.accel
        } else if t < self.accel_time + self.cruise_time {
            0.0
        } else if self.decel_time > 0.0 {
            self.decel
        } else {
            0.0
        }
    }

    /// Velocity at time `t`; out-of-range times clamp to the boundary
    /// velocities.
    pub fn velocity_at(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, self.total_time());
        if t <= self.accel_time {
            self.start_velocity + self.accel * t
        } else if t <= self.accel_time + self.cruise_time {
            self.cruise_velocity
        } else {
            self.cruise_velocity + self.decel * (t - self.accel_time - self.cruise_time)
        }
    }

    /// Distance traveled by time `t`; out-of-range times clamp to 0 or
    /// the total distance.
    pub fn distance_at(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, self.total_time());
        if t <= self.accel_time {
            self.start_velocity * t + 0.5 * self.accel * t * t
        } else if t <= self.accel_time + self.cruise_time {
            self.accel_distance + self.cruise_velocity * (t - self.accel_time)
        } else {
            let tau = t - self.accel_time - self.cruise_time;
            self.accel_distance
                + self.cruise_distance
                + self.cruise_velocity * tau
                + 0.5 * self.decel * tau * tau
        }
    }

    /// Inverse query: the time at which the profile has covered
    /// distance `d`.
    ///
    /// Direct formula on the accel phase, linear on cruise, quadratic
    /// solve on the decel phase.
    pub fn time_at_distance(&self, d: f64) -> f64 {
        let d = d.clamp(0.0, self.distance_at(self.total_time()));
        if d < self.accel_distance {
            let v0 = self.start_velocity;
            return (-v0 + (v0 * v0 + 2.0 * self.accel * d).sqrt()) / self.accel;
        }
        if d < self.accel_distance + self.cruise_distance {
            return self.accel_time + (d - self.accel_distance) / self.cruise_velocity;
        }
        let remainder = d - self.accel_distance - self.cruise_distance;
        let roots = math::solve_quadratic(0.5 * self.decel, self.cruise_velocity, -remainder);
        let tau = math::smallest_non_negative_root(&roots).unwrap_or(0.0);
        self.accel_time + self.cruise_time + tau
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn trapezoid() -> TrapezoidalProfile {
        let mut profile = TrapezoidalProfile::new(10.0, -10.0, 5.0);
        profile.update(10.0, 0.0, 0.0).unwrap();
        profile
    }

    #[test]
    fn test_trapezoid_shape() {
        let profile = trapezoid();
        assert_relative_eq!(profile.cruise_velocity(), 5.0);
        assert_relative_eq!(profile.accel_time(), 0.5);
        assert_relative_eq!(profile.cruise_time(), 1.5);
        assert_relative_eq!(profile.decel_time(), 0.5);
        assert_relative_eq!(profile.total_time(), 2.5);
    }

    #[test]
    fn test_boundary_identities() {
        let profile = trapezoid();
        assert_relative_eq!(profile.velocity_at(0.0), 0.0);
        assert_relative_eq!(profile.velocity_at(profile.total_time()), 0.0);
        assert_relative_eq!(profile.distance_at(profile.total_time()), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_boundary_identities_nonzero_velocities() {
        let mut profile = TrapezoidalProfile::new(10.0, -10.0, 5.0);
        profile.update(10.0, 1.0, 2.0).unwrap();
        assert_relative_eq!(profile.velocity_at(0.0), 1.0);
        assert_relative_eq!(profile.velocity_at(profile.total_time()), 2.0, epsilon = 1e-9);
        assert_relative_eq!(profile.distance_at(profile.total_time()), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pyramid_shape() {
        let mut profile = TrapezoidalProfile::new(10.0, -10.0, 5.0);
        profile.update(2.0, 0.0, 0.0).unwrap();
        assert!(profile.cruise_velocity() < 5.0);
        assert_relative_eq!(profile.cruise_time(), 0.0);
        assert_relative_eq!(profile.cruise_velocity(), 20.0f64.sqrt(), epsilon = 1e-9);
        assert_relative_eq!(profile.distance_at(profile.total_time()), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_decel_only_overshoot_is_infeasible() {
        let mut profile = TrapezoidalProfile::new(100.0, -100.0, 100.0);
        let result = profile.update(1.0, 100.0, 0.0);
        assert!(matches!(result, Err(MargaError::Infeasible(_))));
    }

    #[test]
    fn test_decel_only_exact_distance() {
        // Braking 10 -> 0 at -10 takes exactly 5 units
        let mut profile = TrapezoidalProfile::new(10.0, -10.0, 10.0);
        profile.update(5.0, 10.0, 0.0).unwrap();
        assert_relative_eq!(profile.accel_time(), 0.0);
        assert_relative_eq!(profile.total_time(), 1.0);
        assert_relative_eq!(profile.velocity_at(0.0), 10.0);
        assert_relative_eq!(profile.velocity_at(1.0), 0.0);
    }

    #[test]
    fn test_unreachable_end_velocity() {
        let mut profile = TrapezoidalProfile::new(10.0, -10.0, 5.0);
        let result = profile.update(0.1, 0.0, 5.0);
        assert!(matches!(result, Err(MargaError::Infeasible(_))));
    }

    #[test]
    fn test_query_clamping() {
        let profile = trapezoid();
        assert_relative_eq!(profile.velocity_at(-1.0), 0.0);
        assert_relative_eq!(profile.distance_at(-1.0), 0.0);
        assert_relative_eq!(profile.distance_at(100.0), 10.0, epsilon = 1e-9);
        assert_relative_eq!(profile.velocity_at(100.0), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_time_at_distance_phases() {
        let profile = trapezoid();
        // Accel phase: d = 0.3125 at t = 0.25
        assert_relative_eq!(profile.time_at_distance(0.3125), 0.25, epsilon = 1e-9);
        // Cruise phase: d = 5 at t = 0.5 + 3.75/5
        assert_relative_eq!(profile.time_at_distance(5.0), 1.25, epsilon = 1e-9);
        // Decel phase roundtrips through the quadratic solver
        for d in [8.8, 9.375, 9.9, 10.0] {
            let t = profile.time_at_distance(d);
            assert_relative_eq!(profile.distance_at(t), d, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_accel_continuity_bounds() {
        let profile = trapezoid();
        assert_relative_eq!(profile.accel_at(0.25), 10.0);
        assert_relative_eq!(profile.accel_at(1.0), 0.0);
        assert_relative_eq!(profile.accel_at(2.25), -10.0);
    }
}
