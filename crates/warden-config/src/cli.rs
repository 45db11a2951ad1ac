//! CLI override definitions and application logic.

use clap::Parser;

use crate::Config;

#[derive(Debug, Clone, Parser, Default)]
pub struct CliOverrides {
    /// Override user table path
    #[arg(long)]
    pub users_path: Option<String>,
    /// Override session table path
    #[arg(long)]
    pub sessions_path: Option<String>,
    /// Fail operations whose changes cannot be saved
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub strict_persistence: Option<bool>,
    /// Override HTTP listen address, e.g. 0.0.0.0:8080
    #[arg(long)]
    pub listen: Option<String>,
    /// Override route prefix of the people API
    #[arg(long)]
    pub base_path: Option<String>,
    /// Override metrics listen address
    #[arg(long)]
    pub metrics_listen: Option<String>,
    /// Override log level (trace/debug/info/warn/error)
    #[arg(long)]
    pub log_level: Option<String>,
    /// Override log format (pretty/compact/json)
    #[arg(long)]
    pub log_format: Option<String>,
}

pub fn apply_overrides(config: &mut Config, overrides: &CliOverrides) {
    if let Some(v) = &overrides.users_path {
        config.store.users_path = v.clone();
    }
    if let Some(v) = &overrides.sessions_path {
        config.store.sessions_path = v.clone();
    }
    if let Some(v) = overrides.strict_persistence {
        config.store.strict_persistence = v;
    }
    if let Some(v) = &overrides.listen {
        config.server.listen = v.clone();
    }
    if let Some(v) = &overrides.base_path {
        config.server.base_path = v.clone();
    }
    if let Some(v) = &overrides.metrics_listen {
        config.metrics.listen = Some(v.clone());
    }
    if let Some(v) = &overrides.log_level {
        config.logging.level = Some(v.clone());
    }
    if let Some(v) = &overrides.log_format {
        config.logging.format = Some(v.clone());
    }
}
