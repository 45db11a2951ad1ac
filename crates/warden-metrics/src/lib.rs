//! Metrics collection and Prometheus exporter for warden-rs.
//!
//! Counters for registrations, logins and logouts, a gauge of live
//! sessions, and per-request HTTP metrics.

use std::net::SocketAddr;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Initialize Prometheus metrics exporter.
///
/// Starts an HTTP server on the given address to expose metrics.
/// Returns an error message if binding fails.
pub fn init_prometheus(listen: &str) -> Result<(), String> {
    let addr: SocketAddr = listen
        .parse()
        .map_err(|e| format!("invalid metrics listen address: {}", e))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("failed to install prometheus exporter: {}", e))?;

    Ok(())
}

// ============================================================================
// Metric Names
// ============================================================================

/// Total number of successful registrations.
pub const REGISTRATIONS_TOTAL: &str = "warden_registrations_total";
/// Total number of rejected registrations.
pub const REGISTRATIONS_REJECTED_TOTAL: &str = "warden_registrations_rejected_total";
/// Total number of successful logins.
pub const LOGIN_SUCCESS_TOTAL: &str = "warden_login_success_total";
/// Total number of failed logins, labelled by error kind.
pub const LOGIN_FAILURE_TOTAL: &str = "warden_login_failure_total";
/// Total number of logouts.
pub const LOGOUTS_TOTAL: &str = "warden_logouts_total";
/// Number of live sessions seen after the last operation.
pub const SESSIONS_ACTIVE: &str = "warden_sessions_active";
/// Total number of HTTP requests, labelled by route and status.
pub const HTTP_REQUESTS_TOTAL: &str = "warden_http_requests_total";
/// HTTP request duration histogram (seconds).
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "warden_http_request_duration_seconds";
/// Total number of errors by type.
pub const ERRORS_TOTAL: &str = "warden_errors_total";

// ============================================================================
// Metric Recording Functions
// ============================================================================

/// Record a successful registration.
#[inline]
pub fn record_registration() {
    counter!(REGISTRATIONS_TOTAL).increment(1);
}

/// Record a rejected registration (kind: "conflict", "invalid", ...).
#[inline]
pub fn record_registration_rejected(kind: &'static str) {
    counter!(REGISTRATIONS_REJECTED_TOTAL, "kind" => kind).increment(1);
}

/// Record a successful login.
#[inline]
pub fn record_login_success() {
    counter!(LOGIN_SUCCESS_TOTAL).increment(1);
}

/// Record a failed login (kind: "not_found", "authentication", "conflict", ...).
#[inline]
pub fn record_login_failure(kind: &'static str) {
    counter!(LOGIN_FAILURE_TOTAL, "kind" => kind).increment(1);
}

/// Record a logout.
#[inline]
pub fn record_logout() {
    counter!(LOGOUTS_TOTAL).increment(1);
}

/// Set the live session gauge.
#[inline]
pub fn set_active_sessions(count: usize) {
    gauge!(SESSIONS_ACTIVE).set(count as f64);
}

/// Record a finished HTTP request.
/// Note: This function allocates Strings for the labels.
#[inline]
pub fn record_http_request(route: &str, status: u16, duration_secs: f64) {
    counter!(HTTP_REQUESTS_TOTAL, "route" => route.to_owned(), "status" => status.to_string())
        .increment(1);
    histogram!(HTTP_REQUEST_DURATION_SECONDS, "route" => route.to_owned()).record(duration_secs);
}

/// Record an error by type.
#[inline]
pub fn record_error(error_type: &'static str) {
    counter!(ERRORS_TOTAL, "type" => error_type).increment(1);
}

// ============================================================================
// Error Type Constants (re-exported from warden-core)
// ============================================================================

pub use warden_core::{
    ERROR_AUTHENTICATION, ERROR_CONFIG, ERROR_CONFLICT, ERROR_INVALID, ERROR_IO, ERROR_NOT_FOUND,
    ERROR_STORAGE,
};
