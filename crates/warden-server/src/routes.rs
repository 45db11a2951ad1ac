//! HTTP routes of the people API.
//!
//! | Method | Path                  | Success                    |
//! |--------|-----------------------|----------------------------|
//! | GET    | `{base}`              | usernames                  |
//! | POST   | `{base}/register`     | `{message}`                |
//! | POST   | `{base}/login`        | `{session_id, username}`   |
//! | POST   | `{base}/logout`       | `{username, message}`      |
//! | GET    | `{base}/session`      | `{session_id}`             |
//! | GET    | `{base}/session/{id}` | `{session_id, username}`   |
//! | GET    | `/health`             | `ok`                       |

use std::time::Instant;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{MatchedPath, Path, Query, Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::debug;
use warden_metrics::{
    record_error, record_http_request, record_login_failure, record_login_success, record_logout,
    record_registration, record_registration_rejected, set_active_sessions, ERROR_INVALID,
};

use crate::error::ServerError;
use crate::state::AppState;

/// Username and password, in a JSON body or a query string.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    #[serde(alias = "Username")]
    pub username: String,
    #[serde(alias = "passwordHash", alias = "PasswordHash")]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogoutRequest {
    #[serde(alias = "sessionId", alias = "SessionId")]
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub username: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SessionIdResponse {
    pub session_id: String,
}

/// Build the application router with the people API mounted at `base_path`.
pub fn router(state: AppState, base_path: &str) -> Router {
    let base = base_path.trim_end_matches('/');
    let root = if base.is_empty() { "/" } else { base };

    Router::new()
        .route(root, get(list_users))
        .route(&format!("{base}/register"), post(register))
        .route(&format!("{base}/login"), post(login))
        .route(&format!("{base}/logout"), post(logout))
        .route(&format!("{base}/session"), get(session_for_credentials))
        .route(&format!("{base}/session/{{id}}"), get(lookup_session))
        .route("/health", get(health))
        .route_layer(middleware::from_fn(track_metrics))
        .with_state(state)
}

async fn track_metrics(req: Request, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_default();
    let start = Instant::now();
    let response = next.run(req).await;
    record_http_request(
        &route,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );
    response
}

async fn health() -> &'static str {
    "ok"
}

async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<String>>, ServerError> {
    let users = state.call(|m| Ok(m.list_usernames())).await?;
    Ok(Json(users))
}

async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<MessageResponse>, ServerError> {
    let Json(req) = payload.inspect_err(|_| record_registration_rejected(ERROR_INVALID))?;
    let username = req.username.clone();
    let result = state
        .call(move |m| m.register(&req.username, &req.password))
        .await;

    match result {
        Ok(()) => {
            record_registration();
            Ok(Json(MessageResponse {
                message: format!("user {username} registered"),
            }))
        }
        Err(e) => {
            debug!(username = %username, error = %e, "registration rejected");
            record_registration_rejected(e.error_type());
            Err(e)
        }
    }
}

async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<SessionResponse>, ServerError> {
    let Json(req) = payload.inspect_err(|_| record_login_failure(ERROR_INVALID))?;
    let username = req.username.clone();
    let result = state
        .call(move |m| {
            let token = m.login(&req.username, &req.password)?;
            Ok((token, m.list_sessions().len()))
        })
        .await;

    match result {
        Ok((session_id, active)) => {
            record_login_success();
            set_active_sessions(active);
            Ok(Json(SessionResponse {
                session_id,
                username,
            }))
        }
        Err(e) => {
            record_login_failure(e.error_type());
            Err(e)
        }
    }
}

async fn logout(
    State(state): State<AppState>,
    payload: Result<Json<LogoutRequest>, JsonRejection>,
) -> Result<Json<LogoutResponse>, ServerError> {
    let Json(req) = payload.inspect_err(|_| record_error(ERROR_INVALID))?;
    let (username, active) = state
        .call(move |m| {
            let username = m.logout(&req.session_id)?;
            Ok((username, m.list_sessions().len()))
        })
        .await
        .inspect_err(|e| record_error(e.error_type()))?;

    record_logout();
    set_active_sessions(active);
    Ok(Json(LogoutResponse {
        message: format!("user {username} logged out"),
        username,
    }))
}

async fn session_for_credentials(
    State(state): State<AppState>,
    query: Result<Query<Credentials>, QueryRejection>,
) -> Result<Json<SessionIdResponse>, ServerError> {
    let Query(q) = query?;
    let session_id = state
        .call(move |m| m.session_for_credentials(&q.username, &q.password))
        .await?;
    Ok(Json(SessionIdResponse { session_id }))
}

async fn lookup_session(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<SessionResponse>, ServerError> {
    let Path(id) = path?;
    let lookup = id.clone();
    let username = state.call(move |m| m.lookup_session(&lookup)).await?;
    Ok(Json(SessionResponse {
        session_id: id,
        username,
    }))
}
