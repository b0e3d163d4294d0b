use serde::{Deserialize, Serialize};

/// A username/password pair: the request body for both operations and the
/// record persisted by a credential store.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub password: String,
}

impl User {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Result of a registration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    Registered,
    UsernameTaken,
}

impl RegisterOutcome {
    pub fn message(self) -> &'static str {
        match self {
            Self::Registered => "Registration successful!",
            Self::UsernameTaken => "Username already exists!",
        }
    }
}

/// Result of a login attempt. Unknown user and wrong password are the same outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    LoginSuccess,
    InvalidCredentials,
}

impl LoginOutcome {
    pub fn message(self) -> &'static str {
        match self {
            Self::LoginSuccess => "Login successful!",
            Self::InvalidCredentials => "Invalid username or password!",
        }
    }
}

/// What `CredentialStore::insert_if_absent` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    Taken,
}
