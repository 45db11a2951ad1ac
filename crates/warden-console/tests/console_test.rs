//! Console transcripts against in-memory and file-backed stores.

use std::io::Cursor;

use warden_auth::{MemoryStore, SessionManager, TextFileStore, UserStatus, digest};
use warden_console::Console;

fn run_script<S: warden_auth::SessionStore>(manager: &SessionManager<S>, script: &str) -> String {
    let mut output = Vec::new();
    Console::new(manager, Cursor::new(script.as_bytes()), &mut output)
        .run()
        .unwrap();
    String::from_utf8(output).unwrap()
}

fn bob() -> SessionManager<MemoryStore> {
    SessionManager::new(MemoryStore::from_rows([(
        "bob",
        digest("pw"),
        UserStatus::LoggedOut,
    )]))
}

fn token_from(output: &str) -> String {
    output
        .lines()
        .flat_map(|l| l.split("Session id: ").nth(1))
        .next()
        .unwrap()
        .trim()
        .to_string()
}

#[test]
fn test_login_with_unknown_token() {
    let manager = bob();
    let out = run_script(&manager, "whatever\nbob\npw\n");
    assert!(out.contains("User bob logged in. Session id: "));

    let token = token_from(&out);
    assert_eq!(manager.lookup_session(&token).unwrap(), "bob");
    assert_eq!(manager.status("bob"), Some(UserStatus::LoggedIn));
}

#[test]
fn test_live_token_is_already_logged_in() {
    let manager = bob();
    let token = manager.login("bob", "pw").unwrap();
    let out = run_script(&manager, &format!("{token}\n"));
    assert!(out.contains("You are already logged in."));
}

#[test]
fn test_single_session_enforced() {
    let manager = bob();
    manager.login("bob", "pw").unwrap();
    let out = run_script(&manager, "new-id\nbob\npw\n");
    assert!(out.contains("This account is already in use in another session."));
    assert_eq!(manager.list_sessions().len(), 1);
}

#[test]
fn test_unknown_user_aborts_before_password() {
    let manager = bob();
    let out = run_script(&manager, "x\nghost\nquit\n");
    assert!(out.contains("User not found."));
    assert!(!out.contains("Password: "));
}

#[test]
fn test_wrong_password() {
    let manager = bob();
    let out = run_script(&manager, "x\nbob\nnope\n");
    assert!(out.contains("Invalid password."));
    assert!(manager.list_sessions().is_empty());
}

#[test]
fn test_delete_twice() {
    let manager = bob();
    let token = manager.login("bob", "pw").unwrap();
    let out = run_script(&manager, &format!("delete {token}\ndelete {token}\n"));
    assert!(out.contains(&format!("Session {token} closed. User bob logged out.")));
    assert!(out.contains(&format!("Session {token} not found.")));
    assert_eq!(manager.status("bob"), Some(UserStatus::LoggedOut));
}

#[test]
fn test_register_users_and_session() {
    let manager = SessionManager::new(MemoryStore::new());
    let out = run_script(
        &manager,
        "register\nalice\ns3cret\nregister\nalice\nother\nusers\nx\nalice\ns3cret\nsession\nalice\ns3cret\nquit\nusers\n",
    );
    assert!(out.contains("User alice registered."));
    assert!(out.contains("User already exists."));
    assert!(out.lines().any(|l| l.ends_with("alice")));

    let token = token_from(&out);
    assert_eq!(
        out.matches(&format!("Session id: {token}")).count(),
        2,
        "login and session report the same token"
    );
}

#[test]
fn test_session_without_login() {
    let manager = bob();
    let out = run_script(&manager, "session\nbob\npw\n");
    assert!(out.contains("No active session."));
}

#[test]
fn test_eof_mid_prompt_stops() {
    let manager = bob();
    let out = run_script(&manager, "x\nbob");
    // "bob" without newline is still a line; EOF at the password prompt
    assert!(out.ends_with("Password: "));
    assert!(manager.list_sessions().is_empty());
}

#[test]
fn test_console_picks_up_external_edits() {
    let dir = tempfile::tempdir().unwrap();
    let users = dir.path().join("users.txt");
    let sessions = dir.path().join("sessions.txt");
    let manager = SessionManager::new(TextFileStore::new(&users, &sessions));

    // another writer adds a plaintext user after the console started
    std::fs::write(&users, "dave,hunter2,0\n").unwrap();

    let out = run_script(&manager, "x\ndave\nhunter2\n");
    assert!(out.contains("User dave logged in."));

    let text = std::fs::read_to_string(&users).unwrap();
    assert_eq!(text, format!("dave,{},1\n", digest("hunter2")));
    let token = token_from(&out);
    assert_eq!(
        std::fs::read_to_string(&sessions).unwrap(),
        format!("{token},dave\n")
    );
}
