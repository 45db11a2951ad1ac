//! Rows of the user and session tables.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::hash::digest;

/// Login status of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    #[default]
    LoggedOut,
    LoggedIn,
}

impl UserStatus {
    /// Persisted flag (`0` / `1`).
    #[inline]
    pub fn as_flag(self) -> u8 {
        match self {
            UserStatus::LoggedOut => 0,
            UserStatus::LoggedIn => 1,
        }
    }

    /// Parse the persisted flag. Anything but `0` / `1` is rejected.
    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "0" => Some(UserStatus::LoggedOut),
            "1" => Some(UserStatus::LoggedIn),
            _ => None,
        }
    }

    #[inline]
    pub fn is_logged_in(self) -> bool {
        self == UserStatus::LoggedIn
    }
}

/// A user row. The username is the key of the table that holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Password digest. Straight from a store this may still be a
    /// plaintext password until the credential store migrates it.
    pub password_hash: String,
    /// Login status.
    pub status: UserStatus,
}

impl UserRecord {
    /// New logged-out user with the given plaintext password.
    pub fn from_password(password: &str) -> Self {
        Self {
            password_hash: digest(password),
            status: UserStatus::LoggedOut,
        }
    }

    /// Record with an already computed (or raw, unmigrated) password field.
    pub fn new(password_hash: impl Into<String>, status: UserStatus) -> Self {
        Self {
            password_hash: password_hash.into(),
            status,
        }
    }
}

/// A live session, as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionRecord {
    pub token: String,
    pub username: String,
}

/// Username -> user row.
pub type UserMap = BTreeMap<String, UserRecord>;

/// Session token -> username.
pub type SessionMap = BTreeMap<String, String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_flags() {
        assert_eq!(UserStatus::from_flag("0"), Some(UserStatus::LoggedOut));
        assert_eq!(UserStatus::from_flag("1"), Some(UserStatus::LoggedIn));
        assert_eq!(UserStatus::from_flag("2"), None);
        assert_eq!(UserStatus::from_flag(""), None);
        assert_eq!(UserStatus::LoggedIn.as_flag(), 1);
        assert_eq!(UserStatus::default(), UserStatus::LoggedOut);
    }

    #[test]
    fn from_password_hashes() {
        let rec = UserRecord::from_password("pw");
        assert_eq!(rec.password_hash, digest("pw"));
        assert!(!rec.status.is_logged_in());
    }
}
