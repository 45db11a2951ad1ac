//! Data-access trait for the two tables.

use std::sync::Arc;

use crate::error::StoreError;
use crate::record::{SessionMap, UserMap};

/// Durable load/save of the user and session tables.
///
/// Implementations only move whole tables in and out. Migration of
/// plaintext passwords, invariants between the tables and all locking are
/// handled by [`SessionManager`](crate::SessionManager).
///
/// A table that does not exist yet loads as empty.
pub trait SessionStore: Send + Sync {
    /// Read every user row. Password fields are returned as stored.
    fn load_users(&self) -> Result<UserMap, StoreError>;

    /// Replace the user table.
    fn save_users(&self, users: &UserMap) -> Result<(), StoreError>;

    /// Read every session row.
    fn load_sessions(&self) -> Result<SessionMap, StoreError>;

    /// Replace the session table.
    fn save_sessions(&self, sessions: &SessionMap) -> Result<(), StoreError>;
}

/// Blanket implementation for `Arc<S>` where `S: SessionStore`.
///
/// This allows sharing one store between a manager and its callers.
impl<S: SessionStore + ?Sized> SessionStore for Arc<S> {
    #[inline]
    fn load_users(&self) -> Result<UserMap, StoreError> {
        (**self).load_users()
    }

    #[inline]
    fn save_users(&self, users: &UserMap) -> Result<(), StoreError> {
        (**self).save_users(users)
    }

    #[inline]
    fn load_sessions(&self) -> Result<SessionMap, StoreError> {
        (**self).load_sessions()
    }

    #[inline]
    fn save_sessions(&self, sessions: &SessionMap) -> Result<(), StoreError> {
        (**self).save_sessions(sessions)
    }
}

/// Blanket implementation for `Box<S>` where `S: SessionStore`.
impl<S: SessionStore + ?Sized> SessionStore for Box<S> {
    #[inline]
    fn load_users(&self) -> Result<UserMap, StoreError> {
        (**self).load_users()
    }

    #[inline]
    fn save_users(&self, users: &UserMap) -> Result<(), StoreError> {
        (**self).save_users(users)
    }

    #[inline]
    fn load_sessions(&self) -> Result<SessionMap, StoreError> {
        (**self).load_sessions()
    }

    #[inline]
    fn save_sessions(&self, sessions: &SessionMap) -> Result<(), StoreError> {
        (**self).save_sessions(sessions)
    }
}
