//! Integration tests for the `run` command.
use itertools::Itertools;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use windeol::cli::{RunOpts, handle_run_command};
use windeol::settings::Settings;

/// Get the path to the bundled model.
fn get_model_dir() -> PathBuf {
    PathBuf::from("demos/simple")
}

fn read_records(file_path: &Path) -> Vec<HashMap<String, String>> {
    csv::Reader::from_path(file_path)
        .unwrap()
        .into_deserialize()
        .try_collect()
        .unwrap()
}

/// An integration test for the `run` command.
#[test]
fn test_handle_run_command() {
    let settings = Settings {
        log_level: "off".to_string(),
        ..Settings::default()
    };

    // Save results to non-existent directory to check that directory creation works
    let tempdir = tempdir().unwrap();
    let output_dir = tempdir.path().join("results");
    let opts = RunOpts {
        output_dir: Some(output_dir.clone()),
        overwrite: false,
        debug_model: true,
    };
    handle_run_command(&get_model_dir(), &opts, Some(settings)).unwrap();

    for file_name in [
        "metadata.toml",
        "plants.csv",
        "pathway_choices.csv",
        "report_totals.csv",
        "debug_eol_distances.csv",
        "windeol_info.log",
        "windeol_error.log",
    ] {
        assert!(output_dir.join(file_name).is_file(), "Missing {file_name}");
    }

    // Plant 1 is already past its useful life and must choose a pathway
    let choices = read_records(&output_dir.join("pathway_choices.csv"));
    assert!(choices.iter().any(|row| row["plant_id"] == "1"));

    // Each plant can only choose once
    assert!(choices.iter().map(|row| &row["plant_id"]).all_unique());

    // Four variables are reported every year
    let totals = read_records(&output_dir.join("report_totals.csv"));
    assert_eq!(totals.len(), 4 * 11);
}
