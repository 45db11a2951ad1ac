//! Default configuration values.
//!
//! Centralized default constants for use across all crates.

// ============================================================================
// Store Defaults
// ============================================================================

/// Default path of the user table.
pub const DEFAULT_USERS_PATH: &str = "users.txt";
/// Default path of the session table.
pub const DEFAULT_SESSIONS_PATH: &str = "sessions.txt";
/// Save failures are logged and ignored unless strict persistence is on.
pub const DEFAULT_STRICT_PERSISTENCE: bool = false;

/// Field separator used by both text tables.
pub const FIELD_SEPARATOR: char = ',';

// ============================================================================
// Digest Defaults
// ============================================================================

/// Raw SHA-256 output length in bytes.
pub const DIGEST_BYTES: usize = 32;
/// Length of a padded standard Base64 encoding of [`DIGEST_BYTES`].
pub const DIGEST_ENCODED_LEN: usize = 44;

// ============================================================================
// Server Defaults
// ============================================================================

/// Default HTTP listen address.
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8080";
/// Default route prefix of the people controller.
pub const DEFAULT_BASE_PATH: &str = "/api/peoples";
/// Default graceful shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Logging Defaults
// ============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Default log format (pretty, compact, json).
pub const DEFAULT_LOG_FORMAT: &str = "pretty";
/// Default log output (stderr, stdout).
pub const DEFAULT_LOG_OUTPUT: &str = "stderr";

// ============================================================================
// Config Defaults
// ============================================================================

/// Config file looked up when none is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "warden.toml";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_length_matches_base64_of_sha256() {
        // 32 bytes -> ceil(32 / 3) * 4 = 44 padded chars
        assert_eq!(DIGEST_BYTES.div_ceil(3) * 4, DIGEST_ENCODED_LEN);
    }

    #[test]
    fn default_paths_differ() {
        assert_ne!(DEFAULT_USERS_PATH, DEFAULT_SESSIONS_PATH);
    }
}
