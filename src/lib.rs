//! Snake Ledger - a terminal Snake game with accounts and a high-score leaderboard
//!
//! This library provides:
//! - Core game logic: grid, snake, food, rounds (game module)
//! - Account storage with salted password hashes (account module)
//! - Leaderboard ranking (leaderboard module)
//! - The intro/login/playing/game-over state machine (session module)
//! - Terminal input, rendering and the interactive mode (input, render, modes)

pub mod account;
pub mod game;
pub mod input;
pub mod leaderboard;
pub mod modes;
pub mod render;
pub mod session;
