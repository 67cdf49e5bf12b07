//! Core game logic module for Snake
//!
//! This module contains all the game rules without any I/O or rendering dependencies.
//! A front end drives it by calling [`GameEngine::tick`] on its own schedule and
//! reading the resulting [`GameState`].

pub mod config;
pub mod direction;
pub mod engine;
pub mod food;
pub mod rules;
pub mod state;

// Re-export commonly used types
pub use config::{ConfigError, GameConfig};
pub use direction::Direction;
pub use engine::{GameEngine, TickInfo, TickResult};
pub use food::{Food, FoodEffect, FoodKind};
pub use rules::CollisionType;
pub use state::{Cell, GameState, Phase, Rgb, Snake};
