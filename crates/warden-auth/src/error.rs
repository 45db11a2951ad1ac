//! Session and store error types.

use warden_core::{
    ERROR_AUTHENTICATION, ERROR_CONFLICT, ERROR_INVALID, ERROR_NOT_FOUND, ERROR_STORAGE,
};

/// Failure of a session-manager operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Registration for a username that already exists.
    #[error("user already exists")]
    UserExists,

    /// No user with the given name.
    #[error("user not found")]
    UserNotFound,

    /// Password digest does not match the stored one.
    #[error("invalid password")]
    BadCredentials,

    /// The user already holds a live session.
    #[error("user is already logged in")]
    AlreadyLoggedIn,

    /// No session with the given token.
    #[error("session not found")]
    SessionNotFound,

    /// Credentials are valid but the user holds no session.
    #[error("no active session")]
    NoActiveSession,

    /// Username cannot be represented in the text tables.
    #[error("invalid username: {0}")]
    InvalidUsername(String),

    /// Backing store failure (only surfaced with strict persistence).
    #[error("storage error: {0}")]
    Storage(String),
}

impl SessionError {
    /// Create a storage error from any error type.
    #[inline]
    pub fn storage<E: std::fmt::Display>(err: E) -> Self {
        Self::Storage(err.to_string())
    }

    /// Coarse classification used by transports for status codes and metrics.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UserNotFound | Self::SessionNotFound | Self::NoActiveSession => {
                ErrorKind::NotFound
            }
            Self::UserExists | Self::AlreadyLoggedIn => ErrorKind::Conflict,
            Self::BadCredentials => ErrorKind::Authentication,
            Self::InvalidUsername(_) => ErrorKind::Invalid,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }
}

/// Error taxonomy shared by every transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Authentication,
    Invalid,
    Storage,
}

impl ErrorKind {
    /// Stable label for logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => ERROR_NOT_FOUND,
            ErrorKind::Conflict => ERROR_CONFLICT,
            ErrorKind::Authentication => ERROR_AUTHENTICATION,
            ErrorKind::Invalid => ERROR_INVALID,
            ErrorKind::Storage => ERROR_STORAGE,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store adapter error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// The backing store refused the write (used by test stores).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        SessionError::storage(err)
    }
}
