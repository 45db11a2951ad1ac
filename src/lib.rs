//! # warden-rs
//!
//! Single-session login tracking backed by plain-text tables.
//!
//! A user holds at most one live session. Users and sessions live in two
//! comma-separated text files that are re-read before every request, so
//! several front ends can share them.
//!
//! ## Crates
//!
//! - [`warden_core`] - Shared defaults and error kinds
//! - [`warden_auth`] - Credential store, session table and session manager
//! - [`warden_config`] - Configuration loading and validation
//! - [`warden_metrics`] - Prometheus-compatible metrics
//! - [`warden_server`] - HTTP session API
//! - [`warden_console`] - Interactive console

pub use warden_auth as auth;
pub use warden_config as config;
pub use warden_console as console;
pub use warden_core as core;
pub use warden_metrics as metrics;
pub use warden_server as server;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use warden_auth::{
        ManagerOptions, MemoryStore, SessionError, SessionManager, SessionStore, TextFileStore,
    };
    pub use warden_config::{Config, load_config, validate_config};
    pub use warden_server::{CancellationToken, ServerError, run, run_with_shutdown};
}
