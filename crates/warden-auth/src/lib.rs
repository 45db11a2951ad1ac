//! Login sessions for warden.
//!
//! This crate holds the session core: a credential table, a session table,
//! and the [`SessionManager`] that keeps them consistent so a user can hold
//! at most one live session. Persistence goes through the [`SessionStore`]
//! trait.
//!
//! # Example
//!
//! ```
//! use warden_auth::{SessionError, SessionManager, TextFileStore};
//!
//! # fn example() -> Result<(), SessionError> {
//! let store = TextFileStore::new("users.txt", "sessions.txt");
//! let manager = SessionManager::new(store);
//!
//! manager.register("alice", "s3cret")?;
//! let token = manager.login("alice", "s3cret")?;
//! assert_eq!(manager.lookup_session(&token)?, "alice");
//! manager.logout(&token)?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
mod credentials;
mod error;
mod hash;
mod manager;
mod record;
mod sessions;
pub mod store;

pub use cli::AuthArgs;
pub use credentials::CredentialStore;
pub use error::{ErrorKind, SessionError, StoreError};
pub use hash::{digest, looks_like_digest, verify_password};
pub use manager::{ManagerOptions, SessionManager};
pub use record::{SessionMap, SessionRecord, UserMap, UserRecord, UserStatus};
pub use sessions::SessionTable;
pub use store::{MemoryStore, SessionStore, TextFileStore};
