//! Delimited-table export of timed trajectories.

use crate::error::Result;
use crate::timing::Trajectory;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Pose columns resolved through the named scalar lookup.
const POSE_COLUMNS: [&str; 3] = ["x", "y", "heading"];

/// Write the header-plus-rows table for a trajectory.
///
/// The unit label is recorded in a comment line ahead of the column
/// header; rows are comma-delimited.
pub fn write_trajectory<W: Write>(
    writer: &mut W,
    trajectory: &Trajectory,
    units: &str,
) -> Result<()> {
    writeln!(writer, "# units: {}", units)?;
    writeln!(
        writer,
        "time,{},distance,velocity,acceleration,jerk",
        POSE_COLUMNS.join(",")
    )?;
    for point in trajectory {
        write!(writer, "{:.6}", point.time)?;
        for column in POSE_COLUMNS {
            write!(writer, ",{:.6}", point.pose.scalar(column))?;
        }
        writeln!(
            writer,
            ",{:.6},{:.6},{:.6},{:.6}",
            point.distance, point.velocity, point.acceleration, point.jerk
        )?;
    }
    Ok(())
}

/// Write the table to a file through a buffered writer.
pub fn export_trajectory(path: &Path, trajectory: &Trajectory, units: &str) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_trajectory(&mut writer, trajectory, units)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Pose2D;
    use crate::timing::TrajectoryPoint;

    fn sample_trajectory() -> Trajectory {
        Trajectory::new(vec![
            TrajectoryPoint {
                time: 0.0,
                pose: Pose2D::from_xy_heading(0.0, 0.0, 0.0),
                curvature: 0.0,
                distance: 0.0,
                velocity: 0.0,
                acceleration: 0.0,
                jerk: 0.0,
            },
            TrajectoryPoint {
                time: 0.5,
                pose: Pose2D::from_xy_heading(1.25, 0.0, 0.0),
                curvature: 0.0,
                distance: 1.25,
                velocity: 5.0,
                acceleration: 10.0,
                jerk: 20.0,
            },
        ])
    }

    #[test]
    fn test_header_and_rows() {
        let mut buffer = Vec::new();
        write_trajectory(&mut buffer, &sample_trajectory(), "cm").unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "# units: cm");
        assert_eq!(
            lines[1],
            "time,x,y,heading,distance,velocity,acceleration,jerk"
        );
        assert!(lines[2].starts_with("0.000000,0.000000,"));
        assert!(lines[3].starts_with("0.500000,1.250000,"));
        assert_eq!(lines[3].split(',').count(), 8);
    }

    #[test]
    fn test_empty_trajectory_writes_header_only() {
        let mut buffer = Vec::new();
        write_trajectory(&mut buffer, &Trajectory::default(), "m").unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().count(), 2);
    }
}
