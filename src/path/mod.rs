//! Sampled-path views: adaptive flattening and arc-length indexing.

mod distance;
mod flatten;

pub use distance::{resample_by_distance, DistanceView, DistancedPoint};
pub use flatten::{flatten, FlattenConfig, MAX_SUBDIVIDE_DEPTH};
