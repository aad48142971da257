//! Terminal input module (controller-facing).
//!
//! Maps `crossterm` key events to per-player actions and tracks which keys
//! are held, producing the [`crate::types::ControllerState`] a match consumes
//! each frame. Debouncing and auto-repeat live in the core; this crate only
//! answers "what is held right now".

pub mod keyboard;
pub mod map;

pub use console_tetris_types as types;

pub use keyboard::KeyboardState;
pub use map::{binding_for, should_quit, should_restart, KeyBinding};
