//! Warden server library.
//!
//! HTTP front end of the session manager. This module exposes the router and
//! server loop for use by integration tests and embedding scenarios.

pub mod cli;
mod error;
mod routes;
mod server;
mod state;

pub use cli::ServerArgs;
pub use error::ServerError;
pub use routes::{Credentials, LogoutRequest, router};
pub use server::{DEFAULT_SHUTDOWN_TIMEOUT, run, run_with_shutdown, serve};
pub use state::{AppState, DynStore, SharedManager};
pub use tokio_util::sync::CancellationToken;
