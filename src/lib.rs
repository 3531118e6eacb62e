//! An agent-based model of the end-of-life (EOL) decisions made by wind plant owners.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod cli;
pub mod conversion;
pub mod curve;
pub mod destination;
pub mod distance;
pub mod id;
pub mod input;
pub mod log;
pub mod model;
pub mod output;
pub mod pathway;
pub mod plant;
pub mod report;
pub mod settings;
pub mod simulation;
pub mod units;
pub mod utils;

#[cfg(test)]
mod fixture;

/// Get the path to the folder where windeol's configuration files are stored.
///
/// Falls back to the working directory if the platform has no config folder.
pub fn get_windeol_config_dir() -> PathBuf {
    let Some(mut path) = dirs::config_dir() else {
        return PathBuf::new();
    };

    path.push("windeol");
    path
}
