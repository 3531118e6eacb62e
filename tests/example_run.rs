//! Integration tests for the `example run` command.
use tempfile::tempdir;
use windeol::cli::RunOpts;
use windeol::cli::example::handle_example_run_command;
use windeol::settings::Settings;

/// An integration test for the `example run` command.
#[test]
fn test_handle_example_run_command() {
    let settings = Settings {
        log_level: "off".to_string(),
        ..Settings::default()
    };
    let tempdir = tempdir().unwrap();
    let opts = RunOpts {
        output_dir: Some(tempdir.path().to_path_buf()),
        ..RunOpts::default()
    };
    handle_example_run_command("simple", &opts, Some(settings)).unwrap();

    assert!(tempdir.path().join("plants.csv").is_file());
    assert!(!tempdir.path().join("debug_eol_distances.csv").exists());
}
