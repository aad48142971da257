//! Core rules engine - pure, deterministic, and testable
//!
//! This crate holds the falling-block rules: the playfield, the active
//! piece, collision and locking, line clears, per-player timing and the
//! phase machine of one player's match. It performs no I/O and never reads
//! a clock; every frame is driven by a caller-supplied `dt`.
//!
//! # Module Structure
//!
//! - [`shapes`]: static catalog of the seven kinds in four rotations
//! - [`piece`]: the active piece and the [`CollisionChecker`] seam
//! - [`matrix`]: locked cells with a hidden vanish buffer, locking and row clears
//! - [`bag`]: seeded 7-bag randomizer
//! - [`debounce`]: held actions to discrete actions with auto-repeat
//! - [`player`]: per-player phase machine (playing, clearing, game over)
//! - [`snapshot`]: allocation-free per-frame view for renderers
//! - [`session`]: [`Match`], the single owner of all players
//! - [`replay`]: recorded frames that rebuild a match exactly
//!
//! # Example
//!
//! ```
//! use console_tetris_core::{Phase, Player};
//! use console_tetris_types::{Action, ActionSet};
//!
//! let mut player = Player::new(12345);
//! player.action(Action::MoveLeft);
//! player.action(Action::HardDrop);
//! player.update(1.0 / 60.0, ActionSet::empty());
//!
//! assert_eq!(player.pieces_locked(), 1);
//! assert_eq!(player.phase(), Phase::Playing);
//! ```
//!
//! # Concurrency
//!
//! Nothing here is shared. A [`Match`] owns its players, each player owns
//! its matrix, piece, bag and debouncer. Callers that receive input on other
//! threads hand a [`ControllerState`](types::ControllerState) to the thread
//! that calls `update`.

pub mod bag;
pub mod debounce;
pub mod matrix;
pub mod piece;
pub mod player;
pub mod replay;
pub mod session;
pub mod shapes;
pub mod snapshot;

pub use console_tetris_types as types;

pub use bag::Bag;
pub use debounce::{Debouncer, FiredActions, InputConfig};
pub use matrix::{Matrix, Rows};
pub use piece::{CollisionChecker, Piece};
pub use player::{Phase, Player, PlayerConfig};
pub use replay::{Replay, ReplayFrame};
pub use session::Match;
pub use shapes::{shape_from_kind, Shape, ShapeGrid};
pub use snapshot::{PlayerSnapshot, SNAPSHOT_ROWS, SNAPSHOT_TOP};
