//! Snake - the classic grid game in the terminal
//!
//! This library provides:
//! - Core game logic (game module)
//! - Keyboard mapping (input module)
//! - TUI rendering (render module)
//! - Session bookkeeping such as high score and play time (metrics module)
//! - The menu and the interactive game loop (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
