//! In-memory projection of the persisted session table.

use crate::error::StoreError;
use crate::record::{SessionMap, SessionRecord};
use crate::store::SessionStore;

/// Token -> username with a dirty flag.
#[derive(Debug, Clone, Default)]
pub struct SessionTable {
    sessions: SessionMap,
    dirty: bool,
}

impl SessionTable {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the session table from `store`.
    pub fn load<S: SessionStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        Ok(Self {
            sessions: store.load_sessions()?,
            dirty: false,
        })
    }

    /// Write the table if it has unsaved changes. Returns whether a write
    /// happened.
    pub fn save<S: SessionStore + ?Sized>(&mut self, store: &S) -> Result<bool, StoreError> {
        if !self.dirty {
            return Ok(false);
        }
        store.save_sessions(&self.sessions)?;
        self.dirty = false;
        Ok(true)
    }

    /// Owner of `token`.
    #[inline]
    pub fn get(&self, token: &str) -> Option<&str> {
        self.sessions.get(token).map(String::as_str)
    }

    #[inline]
    pub fn contains(&self, token: &str) -> bool {
        self.sessions.contains_key(token)
    }

    pub fn insert(&mut self, token: impl Into<String>, username: impl Into<String>) {
        self.sessions.insert(token.into(), username.into());
        self.dirty = true;
    }

    /// Remove a session, returning its owner.
    pub fn remove(&mut self, token: &str) -> Option<String> {
        let removed = self.sessions.remove(token);
        if removed.is_some() {
            self.dirty = true;
        }
        removed
    }

    /// First token (in table order) owned by `username`.
    ///
    /// The manager never creates two sessions for one user, but an external
    /// writer can. In that case the first match is returned.
    pub fn find_by_username(&self, username: &str) -> Option<&str> {
        self.sessions
            .iter()
            .find(|(_, owner)| owner.as_str() == username)
            .map(|(token, _)| token.as_str())
    }

    /// All sessions in table order.
    pub fn records(&self) -> Vec<SessionRecord> {
        self.sessions
            .iter()
            .map(|(token, username)| SessionRecord {
                token: token.clone(),
                username: username.clone(),
            })
            .collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Force the next save to write, even without changes.
    #[inline]
    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_insert_remove() {
        let mut table = SessionTable::new();
        table.insert("t1", "alice");
        assert!(table.is_dirty());
        assert_eq!(table.get("t1"), Some("alice"));
        assert_eq!(table.remove("t1").as_deref(), Some("alice"));
        assert_eq!(table.remove("t1"), None);
        assert!(table.is_empty());
    }

    #[test]
    fn test_find_by_username_first_match() {
        let mut table = SessionTable::new();
        table.insert("b-token", "alice");
        table.insert("a-token", "alice");
        table.insert("c-token", "bob");
        assert_eq!(table.find_by_username("alice"), Some("a-token"));
        assert_eq!(table.find_by_username("carol"), None);
    }

    #[test]
    fn test_save_only_when_dirty() {
        let store = MemoryStore::new();
        let mut table = SessionTable::load(&store).unwrap();
        assert!(!table.save(&store).unwrap());
        table.insert("t", "alice");
        assert!(table.save(&store).unwrap());
        assert_eq!(store.session_writes(), 1);
        assert_eq!(store.sessions()["t"], "alice");
    }
}
