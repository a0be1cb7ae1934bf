//! Minigolf server library.
//!
//! This module exposes the server components for use in tests and binaries.

pub mod ball;
pub mod collision;
pub mod config;
pub mod game_loop;
pub mod levels;
pub mod player;
pub mod protocol;
pub mod scheduler;
pub mod state;
pub mod ws;
