//! Single-session login manager.

use parking_lot::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::credentials::CredentialStore;
use crate::error::SessionError;
use crate::hash::verify_password;
use crate::record::{SessionRecord, UserRecord, UserStatus};
use crate::sessions::SessionTable;
use crate::store::SessionStore;

/// Behaviour switches for [`SessionManager`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ManagerOptions {
    /// Surface save failures as [`SessionError::Storage`] and roll the
    /// operation back. When `false`, save failures are logged and the
    /// in-memory tables stay authoritative until the next successful save.
    pub strict_persistence: bool,
}

#[derive(Debug, Clone, Default)]
struct Tables {
    users: CredentialStore,
    sessions: SessionTable,
}

/// Owns the credential store and the session table and enforces that a
/// user holds at most one session.
///
/// Every operation runs under one lock: tables are re-read from the store
/// (so edits by other writers are picked up), checked, mutated and written
/// back before the lock is released.
///
/// # Example
/// ```
/// use warden_auth::{MemoryStore, SessionError, SessionManager};
///
/// let manager = SessionManager::new(MemoryStore::new());
/// manager.register("bob", "secret")?;
///
/// let token = manager.login("bob", "secret")?;
/// assert_eq!(manager.login("bob", "secret"), Err(SessionError::AlreadyLoggedIn));
/// assert_eq!(manager.logout(&token)?, "bob");
/// # Ok::<(), SessionError>(())
/// ```
pub struct SessionManager<S: SessionStore> {
    store: S,
    tables: Mutex<Tables>,
    options: ManagerOptions,
}

impl<S: SessionStore> SessionManager<S> {
    /// Create a manager with default options and load both tables.
    pub fn new(store: S) -> Self {
        Self::with_options(store, ManagerOptions::default())
    }

    /// Create a manager and load both tables.
    ///
    /// Plaintext passwords found in the user table are hashed and written
    /// back immediately. Load failures are logged and leave the tables
    /// empty until the next operation reloads them.
    pub fn with_options(store: S, options: ManagerOptions) -> Self {
        let manager = Self {
            store,
            tables: Mutex::new(Tables::default()),
            options,
        };
        {
            let mut tables = manager.tables.lock();
            manager.sync(&mut tables);
            // failures are already logged by persist
            let _ = manager.persist(&mut tables);
        }
        manager
    }

    /// The underlying store.
    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[inline]
    pub fn options(&self) -> ManagerOptions {
        self.options
    }

    /// Create a logged-out user.
    pub fn register(&self, username: &str, password: &str) -> Result<(), SessionError> {
        validate_username(username)?;
        let result = self.transact(|t| {
            if t.users.contains(username) {
                return Err(SessionError::UserExists);
            }
            t.users.put(username, UserRecord::from_password(password));
            Ok(())
        });
        match &result {
            Ok(()) => info!(username, "user registered"),
            Err(e) => debug!(username, kind = %e.kind(), "registration rejected: {}", e),
        }
        result
    }

    /// Verify credentials and open the user's only session.
    ///
    /// Returns the new session token.
    pub fn login(&self, username: &str, password: &str) -> Result<String, SessionError> {
        let result = self.transact(|t| {
            let record = authenticate(&t.users, username, password)?;
            if record.status.is_logged_in() {
                return Err(SessionError::AlreadyLoggedIn);
            }
            let token = generate_token();
            t.sessions.insert(token.clone(), username);
            t.users.set_status(username, UserStatus::LoggedIn);
            Ok(token)
        });
        match &result {
            Ok(_) => info!(username, "user logged in"),
            Err(e) => warn!(username, kind = %e.kind(), "login rejected: {}", e),
        }
        result
    }

    /// Close the session identified by `token`.
    ///
    /// Returns the username that owned it.
    pub fn logout(&self, token: &str) -> Result<String, SessionError> {
        let result = self.transact(|t| {
            let username = t.sessions.remove(token).ok_or(SessionError::SessionNotFound)?;
            if !t.users.set_status(&username, UserStatus::LoggedOut) {
                warn!(username, "session owner missing from user table");
            }
            Ok(username)
        });
        match &result {
            Ok(username) => info!(username, "user logged out"),
            Err(e) => debug!(kind = %e.kind(), "logout rejected: {}", e),
        }
        result
    }

    /// Owner of the session identified by `token`.
    pub fn lookup_session(&self, token: &str) -> Result<String, SessionError> {
        self.read(|t| {
            t.sessions
                .get(token)
                .map(str::to_string)
                .ok_or(SessionError::SessionNotFound)
        })
    }

    /// Token of the user's live session, after re-checking the password.
    ///
    /// If an external writer left several sessions for the user, the first
    /// one in table order is returned.
    pub fn session_for_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<String, SessionError> {
        self.read(|t| {
            authenticate(&t.users, username, password)?;
            t.sessions
                .find_by_username(username)
                .map(str::to_string)
                .ok_or(SessionError::NoActiveSession)
        })
    }

    /// All usernames in ascending order.
    pub fn list_usernames(&self) -> Vec<String> {
        self.read(|t| t.users.usernames())
    }

    /// All live sessions in table order.
    pub fn list_sessions(&self) -> Vec<SessionRecord> {
        self.read(|t| t.sessions.records())
    }

    /// Current status of `username`, if the user exists.
    pub fn status(&self, username: &str) -> Option<UserStatus> {
        self.read(|t| t.users.get(username).map(|r| r.status))
    }

    /// Reload both tables and write back anything pending.
    ///
    /// Unlike the other operations this reports save failures even when
    /// strict persistence is off.
    pub fn refresh(&self) -> Result<(), SessionError> {
        let mut tables = self.tables.lock();
        self.sync(&mut tables);
        self.persist(&mut tables)
    }

    /// Run `op` inside the reload-mutate-persist critical section.
    fn transact<T>(
        &self,
        op: impl FnOnce(&mut Tables) -> Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        let mut tables = self.tables.lock();
        self.sync(&mut tables);

        let snapshot = self.options.strict_persistence.then(|| tables.clone());
        let result = op(&mut *tables);

        match self.persist(&mut tables) {
            Err(err) if self.options.strict_persistence && result.is_ok() => {
                if let Some(mut snapshot) = snapshot {
                    // part of the write may have landed; rewrite both next time
                    snapshot.users.mark_dirty();
                    snapshot.sessions.mark_dirty();
                    *tables = snapshot;
                }
                Err(err)
            }
            _ => result,
        }
    }

    /// Run a read-only `op`. Pending writes are retried but their failure
    /// never reaches the caller.
    fn read<T>(&self, op: impl FnOnce(&Tables) -> T) -> T {
        let mut tables = self.tables.lock();
        self.sync(&mut tables);
        let out = op(&*tables);
        let _ = self.persist(&mut tables);
        out
    }

    /// Re-read both tables from the store.
    ///
    /// A table with unsaved changes is kept as is: memory stays
    /// authoritative until it has been written.
    fn sync(&self, tables: &mut Tables) {
        if !tables.users.is_dirty() {
            match CredentialStore::load(&self.store) {
                Ok(users) => tables.users = users,
                Err(e) => warn!(error = %e, "failed to reload user table, keeping memory copy"),
            }
        }
        if !tables.sessions.is_dirty() {
            match SessionTable::load(&self.store) {
                Ok(sessions) => tables.sessions = sessions,
                Err(e) => warn!(error = %e, "failed to reload session table, keeping memory copy"),
            }
        }
        debug!(
            users = tables.users.len(),
            sessions = tables.sessions.len(),
            "tables synchronized"
        );
    }

    /// Write every dirty table. Both writes are attempted; the first error
    /// is returned.
    fn persist(&self, tables: &mut Tables) -> Result<(), SessionError> {
        let users = tables.users.save(&self.store);
        if let Err(e) = &users {
            warn!(error = %e, "failed to save user table");
        }
        let sessions = tables.sessions.save(&self.store);
        if let Err(e) = &sessions {
            warn!(error = %e, "failed to save session table");
        }
        users?;
        sessions?;
        Ok(())
    }
}

// Cannot derive Debug without requiring S: Debug
impl<S: SessionStore> std::fmt::Debug for SessionManager<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

fn authenticate<'a>(
    users: &'a CredentialStore,
    username: &str,
    password: &str,
) -> Result<&'a UserRecord, SessionError> {
    let record = users.get(username).ok_or(SessionError::UserNotFound)?;
    if !verify_password(password, &record.password_hash) {
        return Err(SessionError::BadCredentials);
    }
    Ok(record)
}

/// Usernames are stored unescaped in comma-separated lines and trimmed on
/// read, so separators, line breaks and surrounding whitespace cannot
/// round-trip.
fn validate_username(username: &str) -> Result<(), SessionError> {
    if username.is_empty() {
        return Err(SessionError::InvalidUsername("empty".into()));
    }
    if username.trim() != username {
        return Err(SessionError::InvalidUsername(
            "leading or trailing whitespace".into(),
        ));
    }
    if username.contains([warden_core::FIELD_SEPARATOR, '\n', '\r']) {
        return Err(SessionError::InvalidUsername(
            "contains a separator or line break".into(),
        ));
    }
    Ok(())
}

fn generate_token() -> String {
    Uuid::new_v4().to_string()
}
