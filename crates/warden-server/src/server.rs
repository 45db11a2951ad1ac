//! HTTP server loop with graceful shutdown.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use warden_config::Config;
use warden_core::defaults;

use crate::error::ServerError;
use crate::routes::router;
use crate::state::AppState;

/// Default graceful shutdown timeout.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration =
    Duration::from_secs(defaults::DEFAULT_SHUTDOWN_TIMEOUT_SECS);

/// Run the server without an external shutdown trigger.
pub async fn run(config: Config) -> Result<(), ServerError> {
    run_with_shutdown(config, CancellationToken::new()).await
}

/// Run the server with a cancellation token for graceful shutdown.
pub async fn run_with_shutdown(
    config: Config,
    shutdown: CancellationToken,
) -> Result<(), ServerError> {
    let listen: SocketAddr = config
        .server
        .listen
        .parse()
        .map_err(|_| ServerError::Config("invalid listen address".into()))?;

    let state = AppState::from_config(&config.store);
    info!(
        users = %config.store.users_path,
        sessions = %config.store.sessions_path,
        strict_persistence = config.store.strict_persistence,
        "session store opened"
    );

    let app = router(state, &config.server.base_path);
    let listener = TcpListener::bind(listen).await?;
    info!(address = %listen, base_path = %config.server.base_path, "listening");

    serve(
        listener,
        app,
        shutdown,
        Duration::from_secs(config.server.shutdown_timeout_secs),
    )
    .await
}

/// Serve `app` on an already bound listener.
///
/// Once `shutdown` fires, no new connections are accepted and in-flight
/// requests get `drain_timeout` to finish.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    shutdown: CancellationToken,
    drain_timeout: Duration,
) -> Result<(), ServerError> {
    let signal = shutdown.clone();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(signal.cancelled_owned())
            .await
    });

    tokio::select! {
        result = &mut server => {
            result??;
            return Ok(());
        }
        _ = shutdown.cancelled() => {
            info!("shutdown signal received, draining requests");
        }
    }

    match tokio::time::timeout(drain_timeout, server).await {
        Ok(result) => result??,
        Err(_) => warn!(
            timeout_secs = drain_timeout.as_secs(),
            "graceful shutdown timed out"
        ),
    }
    info!("server stopped");
    Ok(())
}
