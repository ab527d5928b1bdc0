use crate::game::RoundSnapshot;
use crate::leaderboard::LeaderboardEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Error,
}

/// A message for the user, e.g. the outcome of a login attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub message: String,
    pub tone: Tone,
}

impl Feedback {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            tone: Tone::Info,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            tone: Tone::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            tone: Tone::Error,
        }
    }
}

/// What the current screen shows
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Intro {
        /// 0.0 to 1.0
        progress: f32,
    },
    Login {
        feedback: Feedback,
    },
    Playing {
        username: String,
        high_score: u32,
        round: RoundSnapshot,
    },
    GameOver {
        username: String,
        final_score: u32,
        high_score: u32,
        new_record: bool,
        /// The snake filled the board
        board_full: bool,
        notice: Option<Feedback>,
    },
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub screen: Screen,
    /// Present only while the leaderboard is open
    pub leaderboard: Option<Vec<LeaderboardEntry>>,
}
