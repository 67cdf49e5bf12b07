//! Fruit Snake - a grid Snake game with typed food effects
//!
//! This library provides:
//! - Core game logic (game module): snake movement, turn buffering, food effects,
//!   collisions and the game-over/restart cycle
//! - TUI rendering (render module)
//! - Keyboard mapping (input module)
//! - Session statistics (metrics module)
//! - The interactive terminal mode (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
