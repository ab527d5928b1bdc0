//! The application state machine: intro, login, play and game over

mod intent;
mod machine;
mod snapshot;

pub use intent::{Credentials, Intent};
pub use machine::{Session, SessionState};
pub use snapshot::{Feedback, Screen, Snapshot, Tone};

#[cfg(test)]
mod tests;
