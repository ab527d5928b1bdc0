use std::fmt;

use crate::game::Direction;

/// Username and password as typed into the login form
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// A device-independent user input, consumed by the session once per frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Confirm,
    Cancel,
    Move(Direction),
    ToggleLeaderboard,
    Restart,
    Logout,
    Login(Credentials),
    Register(Credentials),
}

impl From<Direction> for Intent {
    fn from(direction: Direction) -> Self {
        Intent::Move(direction)
    }
}
