//! Wire format for remote controllers
//!
//! Every frame is exactly [`FRAME_LEN`] bytes:
//!
//! | tag    | bytes                                 | meaning                          |
//! |--------|---------------------------------------|----------------------------------|
//! | `T`    | `T`, `R`, [`PROTOCOL_VERSION`], slot   | handshake, claims a player slot  |
//! | `I`    | `I`, held mask, 0, 0                  | held actions for the claimed slot |
//!
//! The held mask uses [`ActionSet`] bit positions.

use std::fmt;

use crate::types::{ActionSet, PLAYERS};

pub const FRAME_LEN: usize = 4;
pub const PROTOCOL_VERSION: u8 = 1;

const TAG_HANDSHAKE: u8 = b'T';
const TAG_HANDSHAKE_2: u8 = b'R';
const TAG_INPUT: u8 = b'I';

/// A decoded frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    Handshake { slot: usize },
    Input(ActionSet),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    UnknownTag(u8),
    BadMagic,
    VersionMismatch { expected: u8, got: u8 },
    InvalidSlot(u8),
    UnknownActionBits(u8),
    NonZeroPadding,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::UnknownTag(tag) => write!(f, "unknown frame tag 0x{tag:02x}"),
            FrameError::BadMagic => write!(f, "malformed handshake"),
            FrameError::VersionMismatch { expected, got } => {
                write!(f, "protocol version mismatch: expected {expected}, got {got}")
            }
            FrameError::InvalidSlot(slot) => write!(f, "invalid player slot {slot}"),
            FrameError::UnknownActionBits(mask) => {
                write!(f, "unknown action bits in mask 0x{mask:02x}")
            }
            FrameError::NonZeroPadding => write!(f, "input frame padding must be zero"),
        }
    }
}

impl std::error::Error for FrameError {}

pub fn decode(bytes: [u8; FRAME_LEN]) -> Result<Frame, FrameError> {
    match bytes[0] {
        TAG_HANDSHAKE => {
            if bytes[1] != TAG_HANDSHAKE_2 {
                return Err(FrameError::BadMagic);
            }
            if bytes[2] != PROTOCOL_VERSION {
                return Err(FrameError::VersionMismatch {
                    expected: PROTOCOL_VERSION,
                    got: bytes[2],
                });
            }
            let slot = bytes[3] as usize;
            if slot >= PLAYERS {
                return Err(FrameError::InvalidSlot(bytes[3]));
            }
            Ok(Frame::Handshake { slot })
        }
        TAG_INPUT => {
            if bytes[2] != 0 || bytes[3] != 0 {
                return Err(FrameError::NonZeroPadding);
            }
            ActionSet::from_bits(bytes[1])
                .map(Frame::Input)
                .ok_or(FrameError::UnknownActionBits(bytes[1]))
        }
        tag => Err(FrameError::UnknownTag(tag)),
    }
}

pub fn encode(frame: Frame) -> [u8; FRAME_LEN] {
    match frame {
        Frame::Handshake { slot } => [TAG_HANDSHAKE, TAG_HANDSHAKE_2, PROTOCOL_VERSION, slot as u8],
        Frame::Input(held) => [TAG_INPUT, held.bits(), 0, 0],
    }
}
