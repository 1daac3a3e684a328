//! Core Snake rules: grid, snake segments, fruit and collisions
//!
//! Nothing in here touches the terminal or the clock. One call to
//! [`GameEngine::step`] is one tick; the caller decides how often to tick.

pub mod action;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use config::{
    ConfigError, Difficulty, GameConfig, MAX_FRUIT_COUNT, MAX_GRID_SIZE, MIN_SNAKE_LENGTH, SnakeLength,
};
pub use engine::{GameEngine, StepInfo, StepResult};
pub use state::{CollisionType, GameState, Position, Snake, SnakeStatus};
