//! Configuration validation logic.

use std::net::SocketAddr;

use crate::Config;
use crate::loader::ConfigError;

const LOG_FORMATS: [&str; 3] = ["pretty", "compact", "json"];
const LOG_OUTPUTS: [&str; 2] = ["stderr", "stdout"];

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.store.users_path.trim().is_empty() {
        return Err(ConfigError::Validation("store.users_path is empty".into()));
    }
    if config.store.sessions_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "store.sessions_path is empty".into(),
        ));
    }
    if config.store.users_path == config.store.sessions_path {
        return Err(ConfigError::Validation(
            "store.users_path and store.sessions_path must differ".into(),
        ));
    }
    if config.server.listen.parse::<SocketAddr>().is_err() {
        return Err(ConfigError::Validation(format!(
            "server.listen is not a socket address: {}",
            config.server.listen
        )));
    }
    let base = &config.server.base_path;
    if !base.starts_with('/') || (base.len() > 1 && base.ends_with('/')) {
        return Err(ConfigError::Validation(
            "server.base_path must start with '/' and must not end with '/'".into(),
        ));
    }
    if let Some(listen) = &config.metrics.listen
        && listen.parse::<SocketAddr>().is_err()
    {
        return Err(ConfigError::Validation(format!(
            "metrics.listen is not a socket address: {listen}"
        )));
    }
    if let Some(format) = &config.logging.format
        && !LOG_FORMATS.contains(&format.as_str())
    {
        return Err(ConfigError::Validation(format!(
            "logging.format must be one of: {:?}",
            LOG_FORMATS
        )));
    }
    if let Some(output) = &config.logging.output
        && !LOG_OUTPUTS.contains(&output.as_str())
    {
        return Err(ConfigError::Validation(format!(
            "logging.output must be one of: {:?}",
            LOG_OUTPUTS
        )));
    }
    Ok(())
}
