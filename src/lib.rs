//! Console Tetris (workspace facade crate).
//!
//! Re-exports the workspace crates under one roof:
//! `console_tetris::{core, input, remote, term, types}`.

pub use console_tetris_core as core;
pub use console_tetris_input as input;
pub use console_tetris_remote as remote;
pub use console_tetris_term as term;
pub use console_tetris_types as types;
