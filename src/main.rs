//! Provides the main entry point to the program.
use human_panic::setup_panic;
use log::error;
use std::process::ExitCode;
use windeol::cli::run_cli;
use windeol::log::is_logger_initialised;

fn main() -> ExitCode {
    setup_panic!();

    if let Err(err) = run_cli() {
        if is_logger_initialised() {
            error!("{err:?}");
        } else {
            eprintln!("Error: {err:?}");
        }

        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
