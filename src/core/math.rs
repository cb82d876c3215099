//! Numeric tolerances and the closed-form quadratic solver.
//!
//! Every epsilon-keyed comparison in the pipeline goes through a named
//! constant here so boundary behavior can be targeted by tests.

/// Rotation tolerance in radians.
///
/// Below this magnitude the exponential/logarithm maps switch to their
/// Taylor-series fallback, and headings are considered equal.
pub const ROTATION_EPS: f64 = 1e-5;

/// Linear distance tolerance in path units.
///
/// Arc steps shorter than this are treated as zero during the timing
/// passes and resampling.
pub const DISTANCE_EPS: f64 = 1e-6;

/// Time tolerance in seconds.
pub const TIME_EPS: f64 = 1e-6;

/// Acceleration tolerance in path-units/s².
pub const ACCEL_EPS: f64 = 1e-6;

/// Collinearity tolerance for the spline optimizer's degenerate-joint
/// check, applied to twist components (path units and radians).
pub const COLLINEAR_EPS: f64 = 1e-9;

/// Real roots of `a·x² + b·x + c = 0`, largest first.
///
/// Returns zero, one, or two roots. A discriminant of exactly zero
/// yields the single repeated root. A vanishing quadratic term degrades
/// to the linear solution.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Vec<f64> {
    if a == 0.0 {
        if b == 0.0 {
            return Vec::new();
        }
        return vec![-c / b];
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return Vec::new();
    }
    if discriminant == 0.0 {
        return vec![-b / (2.0 * a)];
    }

    let sqrt_d = discriminant.sqrt();
    let r0 = (-b + sqrt_d) / (2.0 * a);
    let r1 = (-b - sqrt_d) / (2.0 * a);
    if r0 >= r1 {
        vec![r0, r1]
    } else {
        vec![r1, r0]
    }
}

/// Smallest non-negative root from a largest-first root list.
///
/// Scans from the end (roots are sorted descending). If no root is
/// non-negative, the last (most negative) root is returned as a
/// fallback; callers relying on this must tolerate a negative result.
/// Returns `None` only when the list is empty.
pub fn smallest_non_negative_root(roots: &[f64]) -> Option<f64> {
    for root in roots.iter().rev() {
        if *root >= 0.0 {
            return Some(*root);
        }
    }
    roots.last().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_two_roots_largest_first() {
        // x² - 5x + 6 = (x-2)(x-3)
        let roots = solve_quadratic(1.0, -5.0, 6.0);
        assert_eq!(roots.len(), 2);
        assert_relative_eq!(roots[0], 3.0);
        assert_relative_eq!(roots[1], 2.0);
    }

    #[test]
    fn test_two_roots_negative_leading_coefficient() {
        // -x² + 5x - 6: same roots, flipped computation order
        let roots = solve_quadratic(-1.0, 5.0, -6.0);
        assert_eq!(roots.len(), 2);
        assert_relative_eq!(roots[0], 3.0);
        assert_relative_eq!(roots[1], 2.0);
    }

    #[test]
    fn test_repeated_root() {
        // x² - 4x + 4 = (x-2)²
        let roots = solve_quadratic(1.0, -4.0, 4.0);
        assert_eq!(roots.len(), 1);
        assert_relative_eq!(roots[0], 2.0);
    }

    #[test]
    fn test_no_real_roots() {
        let roots = solve_quadratic(1.0, 0.0, 1.0);
        assert!(roots.is_empty());
    }

    #[test]
    fn test_linear_degenerate() {
        let roots = solve_quadratic(0.0, 2.0, -4.0);
        assert_eq!(roots.len(), 1);
        assert_relative_eq!(roots[0], 2.0);
    }

    #[test]
    fn test_smallest_non_negative() {
        let roots = solve_quadratic(1.0, -5.0, 6.0);
        assert_relative_eq!(smallest_non_negative_root(&roots).unwrap(), 2.0);
    }

    #[test]
    fn test_smallest_non_negative_mixed_signs() {
        // x² - x - 6 = (x-3)(x+2)
        let roots = solve_quadratic(1.0, -1.0, -6.0);
        assert_relative_eq!(smallest_non_negative_root(&roots).unwrap(), 3.0);
    }

    #[test]
    fn test_negative_fallback() {
        // x² + 5x + 6 = (x+2)(x+3): both roots negative
        let roots = solve_quadratic(1.0, 5.0, 6.0);
        assert_relative_eq!(smallest_non_negative_root(&roots).unwrap(), -3.0);
    }

    #[test]
    fn test_empty_roots() {
        assert!(smallest_non_negative_root(&[]).is_none());
    }
}
