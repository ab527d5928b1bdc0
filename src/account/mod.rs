//! User accounts and high-score persistence
//!
//! The session only talks to the [`AccountStore`] trait. Two stores are
//! provided: [`FileStore`] keeps everything in a JSON file, [`MemoryStore`]
//! keeps it in memory for tests and throwaway runs.

mod file;
mod memory;
mod password;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use password::{hash_password, verify_password};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

/// The logged-in user as seen by the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub high_score: u32,
}

/// A stored account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub username: String,
    pub password_hash: String,
    #[serde(default)]
    pub high_score: u32,
}

/// Coarse classification used to decide how a failure is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed username or password
    Validation,
    /// Unknown user or wrong password
    Auth,
    /// The store could not be read or written
    Persistence,
}

#[derive(Error, Debug)]
pub enum AccountError {
    #[error("username and password must not be empty")]
    EmptyCredentials,
    #[error("username must be at least 3 characters")]
    UsernameTooShort,
    #[error("password must be at least 6 characters")]
    PasswordTooShort,
    #[error("username may only contain letters, digits, '_' and '-'")]
    InvalidUsername,
    #[error("username '{0}' already exists")]
    UsernameTaken(String),
    #[error("user '{0}' does not exist")]
    UnknownUser(String),
    #[error("wrong password")]
    WrongPassword,
    #[error("account storage I/O failed")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("account file is malformed")]
    Malformed {
        #[from]
        source: serde_json::Error,
    },
    #[error("account storage unavailable: {0}")]
    Unavailable(String),
}

impl AccountError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccountError::EmptyCredentials
            | AccountError::UsernameTooShort
            | AccountError::PasswordTooShort
            | AccountError::InvalidUsername
            | AccountError::UsernameTaken(_) => ErrorKind::Validation,
            AccountError::UnknownUser(_) | AccountError::WrongPassword => ErrorKind::Auth,
            AccountError::Io { .. }
            | AccountError::Malformed { .. }
            | AccountError::Unavailable(_) => ErrorKind::Persistence,
        }
    }
}

/// Persistence for usernames, password hashes and high scores
pub trait AccountStore {
    /// Create an account. Fails on a taken name or malformed credentials.
    fn register(&mut self, username: &str, password: &str) -> Result<(), AccountError>;

    fn login(&mut self, username: &str, password: &str) -> Result<Identity, AccountError>;

    /// Store `score` if it beats the saved one; returns whether it did
    fn update_high_score(&mut self, username: &str, score: u32) -> Result<bool, AccountError>;

    /// 0 for unknown users
    fn high_score(&self, username: &str) -> Result<u32, AccountError>;

    /// All accounts in registration order
    fn load_all(&self) -> Result<Vec<AccountRecord>, AccountError>;
}

/// Check username and password format rules
pub fn validate_credentials(username: &str, password: &str) -> Result<(), AccountError> {
    if username.is_empty() || password.is_empty() {
        return Err(AccountError::EmptyCredentials);
    }
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(AccountError::UsernameTooShort);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AccountError::PasswordTooShort);
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    {
        return Err(AccountError::InvalidUsername);
    }
    Ok(())
}
