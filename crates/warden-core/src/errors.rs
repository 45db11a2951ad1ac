//! Error kind constants for metrics and logging.
//!
//! Every failure surfaced by the session core falls into one of these
//! classes. Transports use them as log fields and metric labels.

/// Unknown username, unknown token, or no active session.
pub const ERROR_NOT_FOUND: &str = "not_found";
/// Duplicate registration or a second login for a logged-in user.
pub const ERROR_CONFLICT: &str = "conflict";
/// Wrong password.
pub const ERROR_AUTHENTICATION: &str = "authentication";
/// Username rejected before it reaches the store.
pub const ERROR_INVALID: &str = "invalid";
/// Backing store could not be read or written.
pub const ERROR_STORAGE: &str = "storage";
/// Configuration error.
pub const ERROR_CONFIG: &str = "config";
/// I/O error outside the backing store (sockets, terminal).
pub const ERROR_IO: &str = "io";
