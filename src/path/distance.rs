//! Arc-length indexing over a flattened sample sequence.
//!
//! Two access patterns: fixed-step resampling for the timing pass, and
//! on-demand interpolated lookup at arbitrary distances.

use crate::core::math::DISTANCE_EPS;
use crate::spline::CurvePoint;
use serde::{Deserialize, Serialize};

/// A curve sample tagged with cumulative arc length.
///
/// `floor_index`/`ceil_index` are the bracketing indices into the
/// original flattened sequence the sample was interpolated between, so
/// constraint queries can be mapped back to caller-visible distances
/// after resampling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistancedPoint {
    /// The interpolated curve sample
    pub point: CurvePoint,
    /// Cumulative arc length from the path start, in path units
    pub distance: f64,
    /// Index of the original sample at or before this distance
    pub floor_index: usize,
    /// Index of the original sample at or after this distance
    pub ceil_index: usize,
}

/// Arc-length index over a flattened sample sequence.
pub struct DistanceView {
    points: Vec<CurvePoint>,
    distances: Vec<f64>,
}

impl DistanceView {
    /// Build the cumulative chord-length index.
    ///
    /// # Panics
    /// Panics on an empty sequence; callers always flatten at least one
    /// sample.
    pub fn new(points: Vec<CurvePoint>) -> Self {
        assert!(!points.is_empty(), "distance view over empty sample sequence");
        let mut distances = Vec::with_capacity(points.len());
        distances.push(0.0);
        for pair in points.windows(2) {
            let chord = pair[0].pose.translation.distance(&pair[1].pose.translation);
            distances.push(distances.last().unwrap() + chord);
        }
        Self { points, distances }
    }

    /// Total arc length.
    #[inline]
    pub fn length(&self) -> f64 {
        *self.distances.last().unwrap()
    }

    /// Number of underlying samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the view holds a single sample.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Interpolated sample at an arbitrary distance.
    ///
    /// Distances outside [0, length] clamp to the first/last sample.
    pub fn sample(&self, distance: f64) -> DistancedPoint {
        let last = self.points.len() - 1;
        if distance <= 0.0 {
            return DistancedPoint {
                point: self.points[0],
                distance: 0.0,
                floor_index: 0,
                ceil_index: 0,
            };
        }
        if distance >= self.length() {
            return DistancedPoint {
                point: self.points[last],
                distance: self.length(),
                floor_index: last,
                ceil_index: last,
            };
        }

        // Binary search for the bracketing pair
        let ceil = self.distances.partition_point(|d| *d < distance).min(last);
        let floor = ceil - 1;
        let span = self.distances[ceil] - self.distances[floor];
        let t = if span > DISTANCE_EPS {
            (distance - self.distances[floor]) / span
        } else {
            0.0
        };

        let a = &self.points[floor];
        let b = &self.points[ceil];
        let point = CurvePoint::new(
            a.pose.interpolate(&b.pose, t),
            a.curvature + t * (b.curvature - a.curvature),
            a.dcurvature_ds + t * (b.dcurvature_ds - a.dcurvature_ds),
        );
        DistancedPoint {
            point,
            distance,
            floor_index: floor,
            ceil_index: ceil,
        }
    }
}

/// Resample a flattened sequence at a constant distance step.
///
/// Curvature at interior points is re-derived from a 3-point central
/// finite difference over the resampled points; the first and last
/// points keep their flattening-stage curvature.
pub fn resample_by_distance(points: &[CurvePoint], step: f64) -> Vec<DistancedPoint> {
    debug_assert!(step > 0.0);
    let view = DistanceView::new(points.to_vec());
    let count = (view.length() / step).floor() as usize;

    let mut resampled: Vec<DistancedPoint> = (0..=count)
        .map(|k| view.sample(k as f64 * step))
        .collect();

    // Central-difference curvature over the new points, interior only
    let curvatures: Vec<f64> = (1..resampled.len().saturating_sub(1))
        .map(|i| {
            three_point_curvature(
                &resampled[i - 1].point,
                &resampled[i].point,
                &resampled[i + 1].point,
            )
        })
        .collect();
    for (i, curvature) in curvatures.into_iter().enumerate() {
        resampled[i + 1].point.curvature = curvature;
    }

    resampled
}

/// Signed curvature of the circle through three consecutive points.
fn three_point_curvature(a: &CurvePoint, b: &CurvePoint, c: &CurvePoint) -> f64 {
    let ab = b.pose.translation - a.pose.translation;
    let bc = c.pose.translation - b.pose.translation;
    let ac = c.pose.translation - a.pose.translation;
    let denominator = ab.norm() * bc.norm() * ac.norm();
    if denominator < DISTANCE_EPS {
        return 0.0;
    }
    2.0 * ab.cross(&bc) / denominator
}
