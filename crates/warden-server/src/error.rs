//! Server error types.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use warden_auth::{ErrorKind, SessionError};
use warden_metrics::{ERROR_CONFIG, ERROR_INVALID, ERROR_IO, ERROR_STORAGE};

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("config: {0}")]
    Config(String),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("task: {0}")]
    Task(#[from] tokio::task::JoinError),
    /// Body, query string or path could not be extracted.
    #[error("bad request: {message}")]
    Rejected { status: StatusCode, message: String },
}

impl ServerError {
    fn rejected(status: StatusCode, message: String) -> Self {
        ServerError::Rejected { status, message }
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(rejection: QueryRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for ServerError {
    fn from(rejection: PathRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text())
    }
}

impl ServerError {
    /// Get the error type string for metrics.
    pub fn error_type(&self) -> &'static str {
        match self {
            ServerError::Io(_) => ERROR_IO,
            ServerError::Config(_) => ERROR_CONFIG,
            ServerError::Session(e) => e.kind().as_str(),
            ServerError::Task(_) => ERROR_STORAGE,
            ServerError::Rejected { .. } => ERROR_INVALID,
        }
    }

    /// HTTP status for this error.
    ///
    /// Conflicts answer 400 rather than 409 to stay compatible with
    /// existing clients of the people API.
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Session(e) => match e.kind() {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
                ErrorKind::Conflict | ErrorKind::Invalid => StatusCode::BAD_REQUEST,
                ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ServerError::Rejected { status, .. } => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(serde_json::json!({
                "error": self.to_string(),
                "kind": self.error_type(),
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_errors_map_to_status() {
        let cases = [
            (SessionError::UserNotFound, StatusCode::NOT_FOUND),
            (SessionError::SessionNotFound, StatusCode::NOT_FOUND),
            (SessionError::NoActiveSession, StatusCode::NOT_FOUND),
            (SessionError::BadCredentials, StatusCode::UNAUTHORIZED),
            (SessionError::UserExists, StatusCode::BAD_REQUEST),
            (SessionError::AlreadyLoggedIn, StatusCode::BAD_REQUEST),
            (
                SessionError::InvalidUsername("a,b".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                SessionError::Storage("disk full".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ServerError::from(err).status(), status);
        }
    }

    #[test]
    fn error_type_uses_session_kind() {
        assert_eq!(
            ServerError::from(SessionError::BadCredentials).error_type(),
            "authentication"
        );
        assert_eq!(ServerError::Config("x".into()).error_type(), ERROR_CONFIG);
    }

    #[test]
    fn rejection_keeps_status_and_is_invalid() {
        let err = ServerError::rejected(StatusCode::UNPROCESSABLE_ENTITY, "missing field".into());
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.error_type(), ERROR_INVALID);
        assert_eq!(err.to_string(), "bad request: missing field");
    }
}
