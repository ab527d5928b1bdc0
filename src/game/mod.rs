//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Timestamps are plain milliseconds so rounds can be driven by any clock.

pub mod config;
pub mod direction;
pub mod food;
pub mod grid;
pub mod round;
pub mod snake;

// Re-export commonly used types
pub use config::GameConfig;
pub use direction::Direction;
pub use food::{BoardFull, Food};
pub use grid::{Grid, Position};
pub use round::{EndCause, Round, RoundSnapshot, TickOutcome};
pub use snake::{Advance, CollisionType, Snake};
