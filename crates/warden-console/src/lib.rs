//! Interactive console for warden.
//!
//! Reads commands line by line and drives a [`SessionManager`]:
//!
//! - `delete <id>` / `logout <id>`: close a session
//! - `register`: create a user
//! - `users`: list usernames
//! - `session`: show the live session of a user
//! - `quit` / `exit`: stop
//! - anything else is taken as a session id; if it is not live the
//!   console asks for a username and password and logs the user in
//!
//! [`SessionManager`]: warden_auth::SessionManager

pub mod cli;
mod repl;

pub use cli::ConsoleArgs;
pub use repl::{Command, Console};
