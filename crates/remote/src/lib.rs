//! Remote-control transport.
//!
//! A small tokio TCP server that lets out-of-process controllers hold
//! actions for a player slot. It only publishes [`ControllerState`]
//! snapshots; it never touches game state.

pub mod protocol;
pub mod runtime;
pub mod server;

pub use console_tetris_types as types;

pub use protocol::{decode, encode, Frame, FrameError, FRAME_LEN, PROTOCOL_VERSION};
pub use runtime::Remote;
pub use server::{run_server, RemoteConfig};
pub use types::ControllerState;
