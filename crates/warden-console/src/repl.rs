//! Line-oriented session console.

use std::io::{self, BufRead, Write};

use tracing::debug;
use warden_auth::{SessionError, SessionManager, SessionStore};

const PROMPT: &str =
    "Enter a session id (or 'delete <id>', 'register', 'users', 'session', 'quit'): ";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `delete <token>` or `logout <token>`.
    Delete(String),
    Register,
    Users,
    Session,
    Quit,
    /// Anything else is taken as a session token.
    Token(String),
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if let Some(token) = line
            .strip_prefix("delete ")
            .or_else(|| line.strip_prefix("logout "))
        {
            return Command::Delete(token.trim().to_string());
        }
        match line {
            "" => Command::Empty,
            "register" => Command::Register,
            "users" => Command::Users,
            "session" => Command::Session,
            "quit" | "exit" => Command::Quit,
            token => Command::Token(token.to_string()),
        }
    }
}

/// Console front end over a [`SessionManager`].
///
/// Every command goes through the manager, so tables are re-read from the
/// store before each request.
pub struct Console<'a, S: SessionStore, R, W> {
    manager: &'a SessionManager<S>,
    input: R,
    output: W,
}

impl<'a, S, R, W> Console<'a, S, R, W>
where
    S: SessionStore,
    R: BufRead,
    W: Write,
{
    pub fn new(manager: &'a SessionManager<S>, input: R, output: W) -> Self {
        Self {
            manager,
            input,
            output,
        }
    }

    /// Run until `quit`, `exit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            let Some(line) = self.prompt(PROMPT)? else {
                return Ok(());
            };
            let command = Command::parse(&line);
            debug!(?command, "console command");
            if !self.execute(command)? {
                return Ok(());
            }
        }
    }

    /// Execute one command. Returns `false` when the console should stop.
    pub fn execute(&mut self, command: Command) -> io::Result<bool> {
        match command {
            Command::Quit => return Ok(false),
            Command::Empty => {}
            Command::Delete(token) => self.delete(&token)?,
            Command::Register => return self.register(),
            Command::Users => self.users()?,
            Command::Session => return self.session(),
            Command::Token(token) => return self.login(&token),
        }
        Ok(true)
    }

    fn delete(&mut self, token: &str) -> io::Result<()> {
        match self.manager.logout(token) {
            Ok(username) => writeln!(
                self.output,
                "Session {token} closed. User {username} logged out."
            ),
            Err(SessionError::SessionNotFound) => {
                writeln!(self.output, "Session {token} not found.")
            }
            Err(e) => self.report(&e),
        }
    }

    fn register(&mut self) -> io::Result<bool> {
        let Some(username) = self.prompt("Username: ")? else {
            return Ok(false);
        };
        let Some(password) = self.prompt("Password: ")? else {
            return Ok(false);
        };
        match self.manager.register(&username, &password) {
            Ok(()) => writeln!(self.output, "User {username} registered.")?,
            Err(SessionError::UserExists) => writeln!(self.output, "User already exists.")?,
            Err(e) => self.report(&e)?,
        }
        Ok(true)
    }

    fn users(&mut self) -> io::Result<()> {
        let users = self.manager.list_usernames();
        if users.is_empty() {
            return writeln!(self.output, "No users.");
        }
        for username in users {
            writeln!(self.output, "{username}")?;
        }
        Ok(())
    }

    fn session(&mut self) -> io::Result<bool> {
        let Some(username) = self.prompt("Username: ")? else {
            return Ok(false);
        };
        let Some(password) = self.prompt("Password: ")? else {
            return Ok(false);
        };
        match self.manager.session_for_credentials(&username, &password) {
            Ok(token) => writeln!(self.output, "Session id: {token}")?,
            Err(e) => self.report(&e)?,
        }
        Ok(true)
    }

    /// Treat `token` as a session id; if it is not live, log a user in.
    fn login(&mut self, token: &str) -> io::Result<bool> {
        if self.manager.lookup_session(token).is_ok() {
            writeln!(self.output, "You are already logged in.")?;
            return Ok(true);
        }

        let Some(username) = self.prompt("Username: ")? else {
            return Ok(false);
        };
        if self.manager.status(&username).is_none() {
            writeln!(self.output, "User not found.")?;
            return Ok(true);
        }
        let Some(password) = self.prompt("Password: ")? else {
            return Ok(false);
        };

        match self.manager.login(&username, &password) {
            Ok(token) => writeln!(
                self.output,
                "User {username} logged in. Session id: {token}"
            )?,
            Err(SessionError::AlreadyLoggedIn) => writeln!(
                self.output,
                "This account is already in use in another session."
            )?,
            Err(e) => self.report(&e)?,
        }
        Ok(true)
    }

    fn report(&mut self, err: &SessionError) -> io::Result<()> {
        match err {
            SessionError::UserNotFound => writeln!(self.output, "User not found."),
            SessionError::BadCredentials => writeln!(self.output, "Invalid password."),
            SessionError::NoActiveSession => writeln!(self.output, "No active session."),
            other => writeln!(self.output, "Error: {other}"),
        }
    }

    /// Print `text` and read one line. `None` at end of input.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_commands() {
        assert_eq!(Command::parse("delete abc"), Command::Delete("abc".into()));
        assert_eq!(Command::parse("logout  abc "), Command::Delete("abc".into()));
        assert_eq!(Command::parse("register"), Command::Register);
        assert_eq!(Command::parse("users\n"), Command::Users);
        assert_eq!(Command::parse("session"), Command::Session);
        assert_eq!(Command::parse("quit"), Command::Quit);
        assert_eq!(Command::parse("exit"), Command::Quit);
        assert_eq!(Command::parse("   "), Command::Empty);
        assert_eq!(
            Command::parse("9b2f6c1e-7d0a"),
            Command::Token("9b2f6c1e-7d0a".into())
        );
        // bare "delete" has no token and is looked up as one
        assert_eq!(Command::parse("delete"), Command::Token("delete".into()));
    }
}
