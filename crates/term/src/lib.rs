//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal play. Views render
//! core snapshots into a plain framebuffer, and the renderer flushes that
//! framebuffer to the terminal, redrawing only what changed.
//!
//! Board cells are drawn 2 columns wide to compensate for the terminal
//! glyph aspect ratio.

pub mod fb;
pub mod renderer;
pub mod screen;
pub mod view;

pub use console_tetris_core as core;
pub use console_tetris_types as types;

pub use fb::{Attrs, CellStyle, FrameBuffer, Glyph, Rgb};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use screen::{Screen, VersusScreen};
pub use view::PlayerView;
