//! In-memory projection of the persisted user table.

use tracing::info;

use crate::error::StoreError;
use crate::hash::{digest, looks_like_digest};
use crate::record::{UserMap, UserRecord, UserStatus};
use crate::store::SessionStore;

/// Username -> [`UserRecord`] with a dirty flag.
///
/// Loading migrates plaintext password fields to digests and marks the
/// table dirty so the next [`save`](Self::save) rewrites it.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    users: UserMap,
    dirty: bool,
}

impl CredentialStore {
    /// Create an empty, clean table.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw store rows, hashing any password field that does not
    /// already look like a digest.
    pub fn from_records(mut users: UserMap) -> Self {
        let mut migrated = 0usize;
        for record in users.values_mut() {
            if !looks_like_digest(&record.password_hash) {
                record.password_hash = digest(&record.password_hash);
                migrated += 1;
            }
        }
        if migrated > 0 {
            info!(migrated, "hashed plaintext passwords found in user table");
        }
        Self {
            users,
            dirty: migrated > 0,
        }
    }

    /// Read the user table from `store`.
    pub fn load<S: SessionStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        Ok(Self::from_records(store.load_users()?))
    }

    /// Write the table if it has unsaved changes.
    ///
    /// Returns whether a write happened. The table stays dirty when the
    /// write fails.
    pub fn save<S: SessionStore + ?Sized>(&mut self, store: &S) -> Result<bool, StoreError> {
        if !self.dirty {
            return Ok(false);
        }
        store.save_users(&self.users)?;
        self.dirty = false;
        Ok(true)
    }

    #[inline]
    pub fn get(&self, username: &str) -> Option<&UserRecord> {
        self.users.get(username)
    }

    #[inline]
    pub fn contains(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    /// Insert or replace a user.
    pub fn put(&mut self, username: impl Into<String>, record: UserRecord) {
        self.users.insert(username.into(), record);
        self.dirty = true;
    }

    /// Change a user's status. Returns `false` if the user is unknown.
    pub fn set_status(&mut self, username: &str, status: UserStatus) -> bool {
        match self.users.get_mut(username) {
            Some(record) => {
                if record.status != status {
                    record.status = status;
                    self.dirty = true;
                }
                true
            }
            None => false,
        }
    }

    /// Usernames in ascending order.
    pub fn usernames(&self) -> Vec<String> {
        self.users.keys().cloned().collect()
    }

    /// Iterate over `(username, record)` in ascending username order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &UserRecord)> {
        self.users.iter().map(|(u, r)| (u.as_str(), r))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Force the next save to write, even without changes.
    #[inline]
    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Whether there are unsaved changes.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}
