//! SE(2) pose algebra: points, rotations, poses, and twists.

mod point;
mod pose;
mod rotation;

pub use point::Point2D;
pub use pose::{Pose2D, Twist2D};
pub use rotation::Rotation2D;
