//! Password hashing utilities.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256};
use warden_core::{DIGEST_BYTES, DIGEST_ENCODED_LEN};

/// Compute SHA-256 and return it as padded standard Base64.
///
/// This is the on-disk form of every password in the user table.
///
/// # Example
/// ```
/// use warden_auth::digest;
///
/// let hash = digest("password123");
/// assert_eq!(hash.len(), 44); // 32 bytes -> 44 Base64 chars
/// ```
#[inline]
pub fn digest(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    STANDARD.encode(hasher.finalize())
}

/// Verify if a stored digest matches a plaintext password.
#[inline]
pub fn verify_password(password: &str, hash: &str) -> bool {
    digest(password) == hash
}

/// Heuristic used when loading the user table: does `value` look like
/// output of [`digest`]?
///
/// True iff the value is exactly 44 characters long and decodes as
/// standard Base64 to 32 bytes. A plaintext password that happens to satisfy
/// both conditions is misclassified and stays unhashed.
pub fn looks_like_digest(value: &str) -> bool {
    value.len() == DIGEST_ENCODED_LEN
        && STANDARD
            .decode(value)
            .is_ok_and(|bytes| bytes.len() == DIGEST_BYTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_known_vector() {
        // SHA-256("password") in Base64
        assert_eq!(
            digest("password"),
            "XohImNooBHFR0OVvjcYpJ3NgPQ1qq73WKhHvch0VQtg="
        );
    }

    #[test]
    fn test_consistency() {
        let password = "my_secret_password";
        assert_eq!(digest(password), digest(password));
    }

    #[test]
    fn test_no_collisions_in_corpus() {
        let corpus = ["", "a", "b", "pw1", "pw2", "secret", "Secret", "secret ", "пароль"];
        let mut seen = std::collections::HashSet::new();
        for p in corpus {
            assert!(seen.insert(digest(p)), "collision for {p:?}");
        }
    }

    #[test]
    fn test_verify_password() {
        let hash = digest("test123");
        assert!(verify_password("test123", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_digest_is_recognized() {
        for p in ["", "x", "a much longer password with spaces"] {
            assert!(looks_like_digest(&digest(p)));
        }
    }

    #[test]
    fn test_plaintext_is_not_recognized() {
        assert!(!looks_like_digest("secret"));
        assert!(!looks_like_digest(""));
        // right length, not Base64
        assert!(!looks_like_digest(&"!".repeat(44)));
        // valid Base64 but decodes to 33 bytes
        assert!(!looks_like_digest(&"A".repeat(44)));
    }

    #[test]
    fn test_known_misclassification() {
        // 44 chars of valid Base64 for 32 bytes: indistinguishable from a digest.
        let unlucky = format!("{}A=", "B".repeat(42));
        assert!(looks_like_digest(&unlucky));
    }
}
