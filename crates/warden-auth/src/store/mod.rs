//! Store adapters for the user and session tables.
//!
//! This module provides:
//!
//! - [`SessionStore`] — load-all / save-all trait over both tables
//! - [`TextFileStore`] — the comma-separated text files used in production
//! - [`MemoryStore`] — in-process store for tests and embedding
//!
//! # Adding a new backend
//!
//! ```ignore
//! use warden_auth::store::SessionStore;
//! use warden_auth::{SessionMap, StoreError, UserMap};
//!
//! struct MyStore { /* ... */ }
//!
//! impl SessionStore for MyStore {
//!     fn load_users(&self) -> Result<UserMap, StoreError> { todo!() }
//!     fn save_users(&self, users: &UserMap) -> Result<(), StoreError> { todo!() }
//!     fn load_sessions(&self) -> Result<SessionMap, StoreError> { todo!() }
//!     fn save_sessions(&self, sessions: &SessionMap) -> Result<(), StoreError> { todo!() }
//! }
//! ```

mod memory;
mod text;
mod traits;

pub use memory::MemoryStore;
pub use text::{TextFileStore, format_sessions, format_users, parse_sessions, parse_users};
pub use traits::SessionStore;
