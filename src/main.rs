//! marga-gen - trajectory generator CLI.
//!
//! Reads a robot-limits JSON document and a path JSON document, runs
//! the generation pipeline, and writes a header-plus-rows text table.
//!
//! # Usage
//!
//! ```bash
//! marga-gen --pathfile path.json --robotfile robot.json --outfile out.csv \
//!     --dx 0.05 --dy 0.005 --dtheta 0.1 --step 0.5 --timestep 0.01 --units cm
//! ```
//!
//! Exit codes: 0 on success, 2 when no feasible motion profile exists
//! for the requested limits, 1 for malformed input or I/O failures.

use std::path::Path;

use clap::Parser;

use marga_gen::io::export_trajectory;
use marga_gen::{
    FlattenConfig, GeneratorConfig, MargaError, PathDocument, Result, RobotLimits, SCurveProfile,
    Trajectory, TrajectoryGenerator,
};

/// Process exit code signaling an infeasible motion profile.
const EXIT_INFEASIBLE: i32 = 2;

#[derive(Parser)]
#[command(name = "marga-gen")]
#[command(about = "Generate a time-stamped trajectory from sparse waypoints")]
struct Args {
    /// Maximum longitudinal pose change per flattening step, in path units
    #[arg(long, default_value = "0.05")]
    dx: f64,

    /// Maximum lateral pose change per flattening step, in path units
    #[arg(long, default_value = "0.005")]
    dy: f64,

    /// Maximum heading change per flattening step, in radians
    #[arg(long, default_value = "0.1")]
    dtheta: f64,

    /// Arc-length resampling step, in path units
    #[arg(long, default_value = "0.5")]
    step: f64,

    /// Output timestep, in seconds
    #[arg(long, default_value = "0.01")]
    timestep: f64,

    /// Linear unit label recorded in the output header
    #[arg(long, default_value = "cm")]
    units: String,

    /// Path JSON document (waypoints + constraints)
    #[arg(long)]
    pathfile: String,

    /// Robot JSON document (kinematic limits)
    #[arg(long)]
    robotfile: String,

    /// Output table path
    #[arg(long)]
    outfile: String,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        let code = match e {
            MargaError::Infeasible(_) => EXIT_INFEASIBLE,
            _ => 1,
        };
        std::process::exit(code);
    }
}

fn run(args: &Args) -> Result<()> {
    let limits = RobotLimits::load(Path::new(&args.robotfile))?;
    let document = PathDocument::load(Path::new(&args.pathfile))?;
    log::info!(
        "loaded {} waypoints and {} constraints from {}",
        document.waypoints.len(),
        document.constraints.len(),
        args.pathfile
    );

    let generator = TrajectoryGenerator::new(GeneratorConfig {
        max_velocity: limits.max_velocity,
        max_acceleration: limits.max_acceleration,
        start_velocity: document.start_velocity,
        end_velocity: document.end_velocity,
        flatten: FlattenConfig {
            max_dx: args.dx,
            max_dy: args.dy,
            max_dtheta: args.dtheta,
        },
        step: args.step,
        timestep: args.timestep,
    });
    let trajectory = generator.generate(&document.waypoints, &document.constraints)?;
    check_jerk_budget(&limits, &trajectory)?;

    export_trajectory(Path::new(&args.outfile), &trajectory, &args.units)?;
    log::info!("wrote {} rows to {}", trajectory.len(), args.outfile);
    Ok(())
}

/// When a jerk bound is declared, verify the traveled distance admits a
/// jerk-limited profile at all and report its duration floor.
fn check_jerk_budget(limits: &RobotLimits, trajectory: &Trajectory) -> Result<()> {
    let Some(max_jerk) = limits.max_jerk else {
        return Ok(());
    };
    let mut profile = SCurveProfile::new(
        max_jerk,
        -max_jerk,
        limits.max_acceleration,
        -limits.max_acceleration,
        limits.max_velocity,
    );
    profile.update(trajectory.total_distance())?;
    log::info!(
        "jerk-limited duration floor {:.3} s (trajectory spans {:.3} s)",
        profile.total_time(),
        trajectory.total_time()
    );
    Ok(())
}
