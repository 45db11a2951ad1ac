//! Warden console standalone binary.

use std::process::ExitCode;

use clap::Parser;
use warden_console::{ConsoleArgs, cli};

fn main() -> ExitCode {
    let args = ConsoleArgs::parse();

    match cli::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
