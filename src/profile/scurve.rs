//! Jerk-limited S-curve profile.
//!
//! A 7-phase profile (jerk-up, constant accel, jerk-down, cruise, then
//! the mirrored deceleration half) derived from two
//! [`TrapezoidalProfile`]s operating in the (acceleration, time)
//! domain: the inner profile's "distance" axis is this profile's
//! velocity, its "velocity" is this profile's acceleration, and its
//! "acceleration" is jerk.

use super::trapezoidal::TrapezoidalProfile;
use crate::error::{MargaError, Result};

/// A symmetric jerk-limited motion profile from rest to an optional
/// end velocity.
#[derive(Debug, Clone)]
pub struct SCurveProfile {
    jerk_max: f64,
    jerk_min: f64,
    accel_max: f64,
    accel_min: f64,
    vel_max: f64,
    vel_min: f64,

    ramp_up: TrapezoidalProfile,
    ramp_down: TrapezoidalProfile,
    peak_velocity: f64,
    cruise_time: f64,
    cruise_distance: f64,
    ramp_up_distance: f64,
    ramp_down_distance: f64,
    distance: f64,
}

impl SCurveProfile {
    /// Create a profile from jerk, acceleration, and velocity limits.
    ///
    /// `jerk_max`/`accel_max` are positive, `jerk_min`/`accel_min`
    /// negative. The profile starts from rest and, by default, ends at
    /// rest.
    pub fn new(jerk_max: f64, jerk_min: f64, accel_max: f64, accel_min: f64, vel_max: f64) -> Self {
        debug_assert!(jerk_max > 0.0 && jerk_min < 0.0);
        debug_assert!(accel_max > 0.0 && accel_min < 0.0);
        debug_assert!(vel_max > 0.0);
        Self {
            jerk_max,
            jerk_min,
            accel_max,
            accel_min,
            vel_max,
            vel_min: 0.0,
            ramp_up: TrapezoidalProfile::new(jerk_max, jerk_min, accel_max),
            ramp_down: TrapezoidalProfile::new(-jerk_min, -jerk_max, -accel_min),
            peak_velocity: 0.0,
            cruise_time: 0.0,
            cruise_distance: 0.0,
            ramp_up_distance: 0.0,
            ramp_down_distance: 0.0,
            distance: 0.0,
        }
    }

    /// Set a non-zero end velocity for the deceleration half.
    pub fn with_end_velocity(mut self, vel_min: f64) -> Self {
        debug_assert!(vel_min >= 0.0);
        self.vel_min = vel_min;
        self
    }

    /// Solve the profile for a requested distance.
    ///
    /// Candidate peak velocities start at the velocity limit and are
    /// reduced by one unit whenever the cruise distance goes negative;
    /// exhausting all candidates down to zero is a hard failure.
    pub fn update(&mut self, distance: f64) -> Result<()> {
        self.distance = distance;

        let mut candidate = self.vel_max;
        while candidate > 0.0 {
            if candidate >= self.vel_min {
                self.ramp_up.update(candidate, 0.0, 0.0)?;
                self.ramp_down.update(candidate - self.vel_min, 0.0, 0.0)?;

                let up_dist = distance_integral(&self.ramp_up, self.ramp_up.total_time());
                let down_time = self.ramp_down.total_time();
                let down_dist =
                    candidate * down_time - distance_integral(&self.ramp_down, down_time);
                let cruise_dist = distance - up_dist - down_dist;

                if cruise_dist >= 0.0 {
                    self.peak_velocity = candidate;
                    self.cruise_distance = cruise_dist;
                    self.cruise_time = cruise_dist / candidate;
                    self.ramp_up_distance = up_dist;
                    self.ramp_down_distance = down_dist;
                    return Ok(());
                }
            }
            candidate -= 1.0;
        }

        Err(MargaError::Infeasible(format!(
            "no feasible S-curve for distance {:.3} under the given limits",
            distance
        )))
    }

    /// Total profile duration in seconds.
    #[inline]
    pub fn total_time(&self) -> f64 {
        self.ramp_up.total_time() + self.cruise_time + self.ramp_down.total_time()
    }

    /// Achieved peak velocity.
    #[inline]
    pub fn peak_velocity(&self) -> f64 {
        self.peak_velocity
    }

    /// Acceleration at time `t`.
    pub fn accel_at(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, self.total_time());
        let ramp_up_end = self.ramp_up.total_time();
        let cruise_end = ramp_up_end + self.cruise_time;
        if t <= ramp_up_end {
            self.ramp_up.velocity_at(t)
        } else if t <= cruise_end {
            0.0
        } else {
            -self.ramp_down.velocity_at(t - cruise_end)
        }
    }

    /// Velocity at time `t`.
    pub fn velocity_at(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, self.total_time());
        let ramp_up_end = self.ramp_up.total_time();
        let cruise_end = ramp_up_end + self.cruise_time;
        if t <= ramp_up_end {
            self.ramp_up.distance_at(t)
        } else if t <= cruise_end {
            self.peak_velocity
        } else {
            self.peak_velocity - self.ramp_down.distance_at(t - cruise_end)
        }
    }

    /// Distance traveled by time `t`.
    pub fn distance_at(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, self.total_time());
        let ramp_up_end = self.ramp_up.total_time();
        let cruise_end = ramp_up_end + self.cruise_time;
        if t <= ramp_up_end {
            distance_integral(&self.ramp_up, t)
        } else if t <= cruise_end {
            self.ramp_up_distance + self.peak_velocity * (t - ramp_up_end)
        } else {
            let tau = t - cruise_end;
            self.ramp_up_distance + self.cruise_distance + self.peak_velocity * tau
                - distance_integral(&self.ramp_down, tau)
        }
    }
}

/// Integral of a trapezoidal profile's distance curve over [0, t].
///
/// The distance curve is quadratic per phase, so the integral is a
/// cubic assembled phase by phase.
fn distance_integral(profile: &TrapezoidalProfile, t: f64) -> f64 {
    let boundaries = [
        0.0,
        profile.accel_time(),
        profile.accel_time() + profile.cruise_time(),
        profile.total_time(),
    ];

    let mut integral = 0.0;
    for window in boundaries.windows(2) {
        let t0 = window[0];
        let t1 = window[1].min(t);
        if t1 <= t0 {
            continue;
        }
        let dt = t1 - t0;
        let d0 = profile.distance_at(t0);
        let v0 = profile.velocity_at(t0);
        let a = profile.accel_at((t0 + t1) / 2.0);
        integral += d0 * dt + 0.5 * v0 * dt * dt + a * dt * dt * dt / 6.0;
    }
    if t > profile.total_time() {
        integral += (t - profile.total_time()) * profile.distance_at(profile.total_time());
    }
    integral
}
