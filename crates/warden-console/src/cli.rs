//! CLI module for warden-console.
//!
//! This module provides the command-line interface that can be used either
//! as a standalone binary or as a subcommand of the main warden-rs CLI.

use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use warden_auth::{ManagerOptions, SessionManager, TextFileStore};
use warden_config::{CliOverrides, LoggingConfig, apply_overrides, load_or_default, validate_config};

use crate::Console;

/// Warden console CLI arguments.
#[derive(Parser, Debug, Clone)]
#[command(name = "warden-console", version, about = "Interactive warden session console")]
pub struct ConsoleArgs {
    /// Config file path (json/yaml/toml). Defaults to warden.toml if present.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: CliOverrides,
}

/// Run the console on stdin/stdout with the given arguments.
pub fn run(args: ConsoleArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_or_default(args.config.as_deref())?;
    apply_overrides(&mut config, &args.overrides);
    validate_config(&config)?;

    init_tracing(&config.logging);

    let store = TextFileStore::new(&config.store.users_path, &config.store.sessions_path);
    let manager = SessionManager::with_options(
        store,
        ManagerOptions {
            strict_persistence: config.store.strict_persistence,
        },
    );
    info!(
        users = %config.store.users_path,
        sessions = %config.store.sessions_path,
        "console started"
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    Console::new(&manager, stdin.lock(), stdout.lock()).run()?;
    Ok(())
}

/// Initialize tracing for the console.
///
/// The console owns stdout, so log output defaults to stderr and the
/// default level is `warn` unless the config says otherwise.
fn init_tracing(config: &LoggingConfig) {
    let base_level = config.level.as_deref().unwrap_or("warn");
    let mut filter_str = base_level.to_string();

    for (module, level) in &config.filters {
        filter_str.push(',');
        filter_str.push_str(module);
        filter_str.push('=');
        filter_str.push_str(level);
    }

    let filter = EnvFilter::try_new(&filter_str).unwrap_or_else(|_| EnvFilter::new("warn"));

    let format = config
        .format
        .as_deref()
        .unwrap_or(warden_core::DEFAULT_LOG_FORMAT);
    let to_stdout = config.output.as_deref() == Some("stdout");

    match (format, to_stdout) {
        ("json", true) => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(io::stdout))
            .init(),
        ("json", false) => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(io::stderr))
            .init(),
        (_, true) => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_writer(io::stdout))
            .init(),
        (_, false) => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_writer(io::stderr))
            .init(),
    }
}
