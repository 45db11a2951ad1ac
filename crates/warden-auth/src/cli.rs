//! CLI module for warden-auth.
//!
//! Administrative access to the text tables. It can be used either as a
//! standalone binary or as a subcommand of the main warden-rs CLI.
//!
//! # Usage
//!
//! ```bash
//! # Add a user
//! warden-auth register alice s3cret
//!
//! # List users with their login status
//! warden-auth --users /var/lib/warden/users.txt list
//!
//! # Open and close a session
//! warden-auth login alice s3cret
//! warden-auth logout 9b2f6c1e-7d0a-4c55-9f61-0b8f3c2a1d44
//!
//! # Hash plaintext passwords left in the user table
//! warden-auth migrate
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tabled::{Table, Tabled};
use warden_core::defaults;

use crate::{
    CredentialStore, SessionManager, SessionStore, TextFileStore, UserStatus, digest,
    looks_like_digest,
};

/// Warden user and session management CLI arguments.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "warden-auth",
    version,
    about = "Manage warden users and sessions"
)]
pub struct AuthArgs {
    /// User table path.
    #[arg(long = "users", env = "WARDEN_USERS", default_value = defaults::DEFAULT_USERS_PATH, global = true)]
    pub users_path: PathBuf,

    /// Session table path.
    #[arg(long = "sessions", env = "WARDEN_SESSIONS", default_value = defaults::DEFAULT_SESSIONS_PATH, global = true)]
    pub sessions_path: PathBuf,

    #[command(subcommand)]
    pub command: AuthCommands,
}

/// Auth CLI subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum AuthCommands {
    /// Register a new user.
    Register {
        /// Username (no commas, no surrounding whitespace).
        username: String,
        /// Plaintext password (stored hashed).
        password: String,
    },

    /// List all users.
    List {
        /// Output format (table, json, csv).
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Log a user in and print the session token.
    Login { username: String, password: String },

    /// Close a session by token.
    #[command(alias = "delete")]
    Logout { token: String },

    /// Print the live session token of a user.
    Session { username: String, password: String },

    /// List all live sessions.
    Sessions {
        /// Output format (table, json, csv).
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Hash plaintext passwords in the user table.
    Migrate,

    /// Show password digest (for manual configuration).
    Hash {
        /// Password to hash.
        password: String,
    },
}

/// User row for display.
#[derive(Tabled, Serialize)]
struct UserDisplay {
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// Session row for display.
#[derive(Tabled, Serialize)]
struct SessionDisplay {
    #[tabled(rename = "Token")]
    token: String,
    #[tabled(rename = "Username")]
    username: String,
}

/// Run the auth CLI with the given arguments.
///
/// This is the main entry point for the auth CLI, used by both the
/// standalone binary and the unified warden-rs CLI.
pub fn run(args: AuthArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = TextFileStore::new(&args.users_path, &args.sessions_path);

    match args.command {
        AuthCommands::Register { username, password } => {
            SessionManager::new(store).register(&username, &password)?;
            println!("User {username} registered.");
        }
        AuthCommands::List { format } => list_users(store, &format)?,
        AuthCommands::Login { username, password } => {
            let token = SessionManager::new(store).login(&username, &password)?;
            println!("{token}");
        }
        AuthCommands::Logout { token } => {
            let username = SessionManager::new(store).logout(&token)?;
            println!("Session {token} closed. User {username} logged out.");
        }
        AuthCommands::Session { username, password } => {
            let token = SessionManager::new(store).session_for_credentials(&username, &password)?;
            println!("{token}");
        }
        AuthCommands::Sessions { format } => list_sessions(store, &format)?,
        AuthCommands::Migrate => migrate(&store)?,
        AuthCommands::Hash { password } => println!("{}", digest(&password)),
    }
    Ok(())
}

fn status_label(status: UserStatus) -> &'static str {
    match status {
        UserStatus::LoggedIn => "logged in",
        UserStatus::LoggedOut => "logged out",
    }
}

fn list_users(store: TextFileStore, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let manager = SessionManager::new(store);
    let rows: Vec<UserDisplay> = manager
        .list_usernames()
        .into_iter()
        .map(|username| {
            let status = manager.status(&username).unwrap_or_default();
            UserDisplay {
                username,
                status: status_label(status).to_string(),
            }
        })
        .collect();

    if rows.is_empty() {
        println!("No users found.");
        return Ok(());
    }

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&rows)?),
        "csv" => {
            println!("username,status");
            for row in rows {
                println!("{},{}", row.username, row.status);
            }
        }
        _ => println!("{}", Table::new(rows)),
    }
    Ok(())
}

fn list_sessions(store: TextFileStore, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let rows: Vec<SessionDisplay> = SessionManager::new(store)
        .list_sessions()
        .into_iter()
        .map(|s| SessionDisplay {
            token: s.token,
            username: s.username,
        })
        .collect();

    if rows.is_empty() {
        println!("No active sessions.");
        return Ok(());
    }

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&rows)?),
        "csv" => {
            println!("token,username");
            for row in rows {
                println!("{},{}", row.token, row.username);
            }
        }
        _ => println!("{}", Table::new(rows)),
    }
    Ok(())
}

/// Load the raw user table, hash plaintext entries and write it back.
fn migrate(store: &TextFileStore) -> Result<(), Box<dyn std::error::Error>> {
    let raw = store.load_users()?;
    let plaintext = raw
        .values()
        .filter(|r| !looks_like_digest(&r.password_hash))
        .count();

    let mut users = CredentialStore::from_records(raw);
    if users.save(store)? {
        println!("Hashed {plaintext} plaintext password(s).");
    } else {
        println!("All {} password(s) already hashed.", users.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(dir: &tempfile::TempDir, extra: &[&str]) -> AuthArgs {
        let users = dir.path().join("users.txt");
        let sessions = dir.path().join("sessions.txt");
        let mut argv = vec![
            "warden-auth".to_string(),
            "--users".to_string(),
            users.display().to_string(),
            "--sessions".to_string(),
            sessions.display().to_string(),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        AuthArgs::parse_from(argv)
    }

    #[test]
    fn test_parse_delete_alias() {
        let args = AuthArgs::parse_from(["warden-auth", "delete", "tok"]);
        assert!(matches!(args.command, AuthCommands::Logout { token } if token == "tok"));
    }

    #[test]
    fn test_register_and_migrate() {
        let dir = tempfile::tempdir().unwrap();
        run(args(&dir, &["register", "alice", "pw"])).unwrap();
        assert!(run(args(&dir, &["register", "alice", "pw"])).is_err());

        std::fs::write(
            dir.path().join("users.txt"),
            format!("alice,{},0\nbob,plain,0\n", digest("pw")),
        )
        .unwrap();
        run(args(&dir, &["migrate"])).unwrap();

        let text = std::fs::read_to_string(dir.path().join("users.txt")).unwrap();
        assert!(text.contains(&format!("bob,{},0", digest("plain"))));
    }
}
