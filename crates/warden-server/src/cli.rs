//! Command line for the HTTP transport.

use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use warden_config::{CliOverrides, LoggingConfig, apply_overrides, load_or_default, validate_config};

use crate::{CancellationToken, run_with_shutdown};

/// Warden server CLI arguments.
#[derive(Parser, Debug, Clone)]
#[command(name = "warden-server", version, about = "Session API over plain-text stores")]
pub struct ServerArgs {
    /// Config file path (json/yaml/toml). Defaults to warden.toml if present.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: CliOverrides,
}

/// Load config, start logging and metrics, then serve until a shutdown
/// signal. Shared by `warden-server` and `warden-rs server`.
pub async fn run(args: ServerArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_or_default(args.config.as_deref())?;
    apply_overrides(&mut config, &args.overrides);
    validate_config(&config)?;

    init_tracing(&config.logging);

    if let Some(listen) = &config.metrics.listen {
        match warden_metrics::init_prometheus(listen) {
            Ok(()) => info!("metrics exporter listening on {}", listen),
            Err(e) => warn!("failed to start metrics exporter: {}", e),
        }
    }

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            wait_for_signal().await;
            info!("shutdown signal received");
            shutdown.cancel();
        }
    });

    run_with_shutdown(config, shutdown).await?;
    Ok(())
}

/// Resolve once Ctrl+C or SIGTERM arrives. A signal that cannot be
/// registered is logged and never fires.
async fn wait_for_signal() {
    #[cfg(unix)]
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        .inspect_err(|e| warn!("SIGTERM handler unavailable: {}", e))
        .ok();

    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Ctrl+C handler unavailable: {}", e);
            std::future::pending::<()>().await;
        }
    };
    let terminate = async {
        #[cfg(unix)]
        {
            if let Some(sig) = sigterm.as_mut() {
                sig.recv().await;
                return;
            }
        }
        std::future::pending::<()>().await
    };

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

/// Base level followed by the per-module overrides, in `EnvFilter` syntax.
fn filter_directives(config: &LoggingConfig) -> String {
    let base = config.level.as_deref().unwrap_or(warden_core::DEFAULT_LOG_LEVEL);
    std::iter::once(base.to_string())
        .chain(config.filters.iter().map(|(module, level)| format!("{module}={level}")))
        .collect::<Vec<_>>()
        .join(",")
}

fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_new(filter_directives(config))
        .unwrap_or_else(|_| EnvFilter::new(warden_core::DEFAULT_LOG_LEVEL));
    let writer = match config.output.as_deref() {
        Some("stdout") => BoxMakeWriter::new(io::stdout),
        _ => BoxMakeWriter::new(io::stderr),
    };
    let registry = tracing_subscriber::registry().with(filter);

    match config.format.as_deref().unwrap_or(warden_core::DEFAULT_LOG_FORMAT) {
        "json" => registry.with(fmt::layer().json().with_writer(writer)).init(),
        "compact" => registry.with(fmt::layer().compact().with_writer(writer)).init(),
        _ => registry.with(fmt::layer().with_writer(writer)).init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_directives_default_level() {
        let config = LoggingConfig::default();
        assert_eq!(filter_directives(&config), warden_core::DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn filter_directives_with_overrides() {
        let mut config = LoggingConfig {
            level: Some("debug".into()),
            ..Default::default()
        };
        config.filters.insert("warden_auth".into(), "trace".into());
        config.filters.insert("axum".into(), "warn".into());

        let directives = filter_directives(&config);
        assert!(directives.starts_with("debug,"));
        assert!(directives.contains("warden_auth=trace"));
        assert!(directives.contains("axum=warn"));
        assert!(EnvFilter::try_new(&directives).is_ok());
    }

    #[test]
    fn parse_config_flag() {
        let args = ServerArgs::parse_from(["warden-server", "-c", "warden.toml"]);
        assert_eq!(args.config.as_deref(), Some(std::path::Path::new("warden.toml")));
    }
}
