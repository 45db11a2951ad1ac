//! Unified warden-rs CLI.
//!
//! This binary provides a unified interface to all warden components:
//! - `warden-rs server` - Run the HTTP session API
//! - `warden-rs console` - Run the interactive session console
//! - `warden-rs auth` - Manage users and sessions from the shell
//!
//! Each subcommand can also be run as a standalone binary.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// Warden-rs unified CLI.
#[derive(Parser)]
#[command(
    name = "warden-rs",
    version,
    about = "Single-session login tracking over plain-text stores",
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP session API.
    #[command(name = "server", alias = "serve")]
    Server(Box<warden_server::ServerArgs>),

    /// Run the interactive console.
    #[command(name = "console")]
    Console(Box<warden_console::ConsoleArgs>),

    /// Manage users and sessions.
    #[command(name = "auth")]
    Auth(warden_auth::AuthArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Server(args) => warden_server::cli::run(*args).await,
        Commands::Console(args) => {
            tokio::task::block_in_place(|| warden_console::cli::run(*args))
        }
        Commands::Auth(args) => warden_auth::cli::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
