//! In-memory store.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::error::StoreError;
use crate::record::{SessionMap, UserMap, UserRecord};

use super::SessionStore;

/// Store that keeps both tables in process memory.
///
/// Suitable for tests and for embedding the manager without files. Writes
/// are counted, and the store can be switched into a failing mode to
/// exercise the manager's error policy.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: Mutex<UserMap>,
    sessions: Mutex<SessionMap>,
    user_writes: AtomicUsize,
    session_writes: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from raw `(username, password field, status)` rows.
    ///
    /// Password fields are stored as given, so plaintext rows can be used to
    /// exercise migration on load.
    ///
    /// # Example
    /// ```
    /// use warden_auth::{MemoryStore, UserStatus};
    ///
    /// let store = MemoryStore::from_rows([("alice", "secret", UserStatus::LoggedOut)]);
    /// ```
    pub fn from_rows<I, U, P>(rows: I) -> Self
    where
        I: IntoIterator<Item = (U, P, crate::UserStatus)>,
        U: Into<String>,
        P: Into<String>,
    {
        let users = rows
            .into_iter()
            .map(|(u, p, s)| (u.into(), UserRecord::new(p, s)))
            .collect();
        Self {
            users: Mutex::new(users),
            ..Self::default()
        }
    }

    /// Snapshot of the stored user table.
    pub fn users(&self) -> UserMap {
        self.users.lock().clone()
    }

    /// Snapshot of the stored session table.
    pub fn sessions(&self) -> SessionMap {
        self.sessions.lock().clone()
    }

    /// Overwrite a user row as an external writer would.
    pub fn put_user(&self, username: impl Into<String>, record: UserRecord) {
        self.users.lock().insert(username.into(), record);
    }

    /// Overwrite a session row as an external writer would.
    pub fn put_session(&self, token: impl Into<String>, username: impl Into<String>) {
        self.sessions.lock().insert(token.into(), username.into());
    }

    /// Number of successful user table writes.
    pub fn user_writes(&self) -> usize {
        self.user_writes.load(Ordering::Relaxed)
    }

    /// Number of successful session table writes.
    pub fn session_writes(&self) -> usize {
        self.session_writes.load(Ordering::Relaxed)
    }

    /// Make every subsequent load fail (or succeed again).
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::Relaxed);
    }

    /// Make every subsequent save fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    fn check_read(&self) -> Result<(), StoreError> {
        if self.fail_reads.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable("reads disabled".into()));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable("writes disabled".into()));
        }
        Ok(())
    }
}

impl SessionStore for MemoryStore {
    fn load_users(&self) -> Result<UserMap, StoreError> {
        self.check_read()?;
        Ok(self.users.lock().clone())
    }

    fn save_users(&self, users: &UserMap) -> Result<(), StoreError> {
        self.check_write()?;
        *self.users.lock() = users.clone();
        self.user_writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn load_sessions(&self) -> Result<SessionMap, StoreError> {
        self.check_read()?;
        Ok(self.sessions.lock().clone())
    }

    fn save_sessions(&self, sessions: &SessionMap) -> Result<(), StoreError> {
        self.check_write()?;
        *self.sessions.lock() = sessions.clone();
        self.session_writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
