//! File output for the generator CLI.

mod export;

pub use export::{export_trajectory, write_trajectory};
