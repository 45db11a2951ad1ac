//! Comma-separated text file store.
//!
//! Layout, one record per line:
//!
//! ```text
//! users.txt:     alice,XohImNooBHFR0OVvjcYpJ3NgPQ1qq73WKhHvch0VQtg=,0
//! sessions.txt:  9b2f6c1e-7d0a-4c55-9f61-0b8f3c2a1d44,alice
//! ```
//!
//! Fields are trimmed on read. Lines with the wrong number of fields or an
//! unknown status flag are skipped with a warning. A missing file is an
//! empty table.
//!
//! Saves go to a sibling temp file that is renamed over the table, so a
//! concurrent reader sees either the old or the new table in full.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;
use warden_core::FIELD_SEPARATOR;

use crate::error::StoreError;
use crate::record::{SessionMap, UserMap, UserRecord, UserStatus};

use super::SessionStore;

/// Store backed by two text files.
#[derive(Debug, Clone)]
pub struct TextFileStore {
    users_path: PathBuf,
    sessions_path: PathBuf,
}

impl TextFileStore {
    /// Create a store over the given user and session files.
    ///
    /// Files are not touched until the first load or save.
    pub fn new(users_path: impl Into<PathBuf>, sessions_path: impl Into<PathBuf>) -> Self {
        Self {
            users_path: users_path.into(),
            sessions_path: sessions_path.into(),
        }
    }

    /// Path of the user table.
    pub fn users_path(&self) -> &Path {
        &self.users_path
    }

    /// Path of the session table.
    pub fn sessions_path(&self) -> &Path {
        &self.sessions_path
    }
}

impl SessionStore for TextFileStore {
    fn load_users(&self) -> Result<UserMap, StoreError> {
        let data = read_table(&self.users_path)?;
        let users = parse_users(&data);
        debug!(path = %self.users_path.display(), count = users.len(), "user table loaded");
        Ok(users)
    }

    fn save_users(&self, users: &UserMap) -> Result<(), StoreError> {
        write_table(&self.users_path, &format_users(users))?;
        debug!(path = %self.users_path.display(), count = users.len(), "user table saved");
        Ok(())
    }

    fn load_sessions(&self) -> Result<SessionMap, StoreError> {
        let data = read_table(&self.sessions_path)?;
        let sessions = parse_sessions(&data);
        debug!(path = %self.sessions_path.display(), count = sessions.len(), "session table loaded");
        Ok(sessions)
    }

    fn save_sessions(&self, sessions: &SessionMap) -> Result<(), StoreError> {
        write_table(&self.sessions_path, &format_sessions(sessions))?;
        debug!(path = %self.sessions_path.display(), count = sessions.len(), "session table saved");
        Ok(())
    }
}

/// Read a table file, treating a missing file as empty.
fn read_table(path: &Path) -> Result<String, StoreError> {
    match fs::read_to_string(path) {
        Ok(data) => Ok(data),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e.into()),
    }
}

/// Replace a table file atomically.
///
/// The temp name is unique per call so that two stores over the same files
/// never write into each other's temp file.
fn write_table(path: &Path, data: &str) -> Result<(), StoreError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{name}.{}.tmp", Uuid::new_v4().simple()));

    if let Err(e) = fs::write(&tmp, data) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

/// Parse the user table. Later lines win on duplicate usernames.
pub fn parse_users(data: &str) -> UserMap {
    let mut users = UserMap::new();
    for (idx, line) in data.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).map(str::trim).collect();
        let &[username, password, flag] = fields.as_slice() else {
            warn!(line = idx + 1, "skipping user line: expected 3 fields");
            continue;
        };
        if username.is_empty() {
            warn!(line = idx + 1, "skipping user line: empty username");
            continue;
        }
        let Some(status) = UserStatus::from_flag(flag) else {
            warn!(line = idx + 1, flag, "skipping user line: unknown status flag");
            continue;
        };
        users.insert(username.to_string(), UserRecord::new(password, status));
    }
    users
}

/// Serialize the user table.
pub fn format_users(users: &UserMap) -> String {
    let mut out = String::new();
    for (username, record) in users {
        let _ = writeln!(
            out,
            "{username}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}",
            record.password_hash,
            record.status.as_flag()
        );
    }
    out
}

/// Parse the session table. Later lines win on duplicate tokens.
pub fn parse_sessions(data: &str) -> SessionMap {
    let mut sessions = SessionMap::new();
    for (idx, line) in data.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).map(str::trim).collect();
        let &[token, username] = fields.as_slice() else {
            warn!(line = idx + 1, "skipping session line: expected 2 fields");
            continue;
        };
        if token.is_empty() || username.is_empty() {
            warn!(line = idx + 1, "skipping session line: empty field");
            continue;
        }
        sessions.insert(token.to_string(), username.to_string());
    }
    sessions
}

/// Serialize the session table.
pub fn format_sessions(sessions: &SessionMap) -> String {
    let mut out = String::new();
    for (token, username) in sessions {
        let _ = writeln!(out, "{token}{FIELD_SEPARATOR}{username}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::digest;

    #[test]
    fn test_parse_users() {
        let data = "alice, secret ,0\n\nbob,XohImNooBHFR0OVvjcYpJ3NgPQ1qq73WKhHvch0VQtg=,1\n";
        let users = parse_users(data);
        assert_eq!(users.len(), 2);
        assert_eq!(users["alice"], UserRecord::new("secret", UserStatus::LoggedOut));
        assert_eq!(users["bob"].status, UserStatus::LoggedIn);
    }

    #[test]
    fn test_parse_users_skips_malformed() {
        let data = "only,two\nfour,fields,here,0\ncarol,pw,7\n,pw,0\ndave,pw,0\n";
        let users = parse_users(data);
        assert_eq!(users.keys().collect::<Vec<_>>(), ["dave"]);
    }

    #[test]
    fn test_parse_sessions() {
        let data = "t1,alice\nbroken\nt2 , bob\n,carol\n";
        let sessions = parse_sessions(data);
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions["t2"], "bob");
    }

    #[test]
    fn test_format_layout() {
        let mut users = UserMap::new();
        users.insert("alice".into(), UserRecord::new(digest("pw"), UserStatus::LoggedIn));
        let text = format_users(&users);
        assert_eq!(text, format!("alice,{},1\n", digest("pw")));

        let mut sessions = SessionMap::new();
        sessions.insert("tok".into(), "alice".into());
        assert_eq!(format_sessions(&sessions), "tok,alice\n");
        assert_eq!(format_sessions(&SessionMap::new()), "");
    }

    #[test]
    fn test_missing_files_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = TextFileStore::new(dir.path().join("users.txt"), dir.path().join("sessions.txt"));
        assert!(store.load_users().unwrap().is_empty());
        assert!(store.load_sessions().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = TextFileStore::new(dir.path().join("users.txt"), dir.path().join("sessions.txt"));

        let mut users = UserMap::new();
        users.insert("alice".into(), UserRecord::from_password("pw"));
        store.save_users(&users).unwrap();
        assert_eq!(store.load_users().unwrap(), users);

        let mut sessions = SessionMap::new();
        sessions.insert("t".into(), "alice".into());
        store.save_sessions(&sessions).unwrap();
        assert_eq!(store.load_sessions().unwrap(), sessions);
    }

    #[test]
    fn test_unreadable_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        // a directory cannot be read as a table
        let store = TextFileStore::new(dir.path(), dir.path().join("sessions.txt"));
        assert!(store.load_users().is_err());
    }

    fn big_table(n: usize) -> UserMap {
        (0..n)
            .map(|i| (format!("user{i:05}"), UserRecord::from_password(&format!("pw{i}"))))
            .collect()
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = TextFileStore::new(dir.path().join("users.txt"), dir.path().join("sessions.txt"));
        store.save_users(&big_table(10)).unwrap();
        store.save_users(&big_table(3)).unwrap();
        store.save_sessions(&SessionMap::new()).unwrap();

        let mut names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(names, ["sessions.txt", "users.txt"]);
        assert_eq!(store.load_users().unwrap().len(), 3);
    }

    #[test]
    fn test_save_into_missing_dir_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = TextFileStore::new(
            dir.path().join("missing").join("users.txt"),
            dir.path().join("sessions.txt"),
        );
        assert!(store.save_users(&big_table(1)).is_err());
    }

    #[test]
    fn test_concurrent_load_sees_whole_table() {
        const ROWS: usize = 5000;
        let dir = tempfile::tempdir().unwrap();
        let store = TextFileStore::new(dir.path().join("users.txt"), dir.path().join("sessions.txt"));
        let users = big_table(ROWS);
        store.save_users(&users).unwrap();

        let done = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
        let writer = {
            let store = store.clone();
            let done = done.clone();
            std::thread::spawn(move || {
                while !done.load(std::sync::atomic::Ordering::Relaxed) {
                    store.save_users(&users).unwrap();
                }
            })
        };

        let mut partial = 0;
        for _ in 0..500 {
            if store.load_users().unwrap().len() != ROWS {
                partial += 1;
            }
        }

        // another front end registering mid-save keeps every existing user
        let manager = crate::SessionManager::new(store.clone());
        manager.register("newcomer", "pw").unwrap();
        assert_eq!(manager.list_usernames().len(), ROWS + 1);

        done.store(true, std::sync::atomic::Ordering::Relaxed);
        writer.join().unwrap();
        assert_eq!(partial, 0);
    }
}
