//! Shared types - constants, piece kinds, actions and held-action sets
//!
//! Everything here is plain data shared by the rules engine and the outer
//! collaborators (terminal, keyboard, remote transport).
//!
//! # Playfield Dimensions
//!
//! The matrix is `WIDTH` columns by `TOTAL_HEIGHT` rows. Row 0 is the top of
//! the hidden vanish buffer and rows grow downward:
//!
//! | Rows | Region |
//! |------|--------|
//! | `0..VANISH_HEIGHT` | vanish buffer (pieces spawn here, never drawn) |
//! | `VANISH_HEIGHT..TOTAL_HEIGHT` | visible playfield |
//!
//! `LOCK_CEILING` is the topmost row a locked cell may occupy. Locking any
//! cell above it is a top-out.
//!
//! # Timing Constants
//!
//! All timing is in seconds (`f32`) and driven by the caller's `dt`:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `GRAVITY_INTERVAL` | 1.0 | Time between unforced downward steps |
//! | `CLEAR_DURATION` | 0.5 | Line-clear animation before rows collapse |
//! | `GAME_OVER_DURATION` | 1.0 | Top-out animation before the match ends |
//! | `DEFAULT_REPEAT_DELAY` | 0.25 | Hold time before auto-repeat starts |
//! | `DEFAULT_REPEAT_INTERVAL` | 0.0625 | Interval between auto-repeats |
//!
//! # Examples
//!
//! ```
//! use console_tetris_types::{Action, ActionSet, ShapeKind};
//!
//! assert_eq!(ShapeKind::from_str("t"), Some(ShapeKind::T));
//!
//! let mut held = ActionSet::empty();
//! held.insert(Action::MoveLeft);
//! held.insert(Action::HardDrop);
//! assert!(held.contains(Action::MoveLeft));
//! assert_eq!(held.len(), 2);
//! ```

use serde::{Deserialize, Serialize};

/// Matrix width in cells
pub const WIDTH: i32 = 10;

/// Rows visible to the player
pub const VISIBLE_HEIGHT: i32 = 20;

/// Hidden rows above the visible area
pub const VANISH_HEIGHT: i32 = 20;

/// Total matrix height (vanish buffer + visible rows)
pub const TOTAL_HEIGHT: i32 = VISIBLE_HEIGHT + VANISH_HEIGHT;

/// Topmost row a locked cell may occupy (one row above the visible area)
pub const LOCK_CEILING: i32 = VANISH_HEIGHT - 1;

/// Number of player slots in a match
pub const PLAYERS: usize = 2;

/// Time between gravity steps
pub const GRAVITY_INTERVAL: f32 = 1.0;

/// Line-clear animation length
pub const CLEAR_DURATION: f32 = 0.5;

/// Top-out animation length
pub const GAME_OVER_DURATION: f32 = 1.0;

/// Hold time before a repeatable action starts repeating
pub const DEFAULT_REPEAT_DELAY: f32 = 0.25;

/// Interval between repeats once repeating
pub const DEFAULT_REPEAT_INTERVAL: f32 = 0.0625;


/// The seven piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl ShapeKind {
    /// Every kind, in catalog order
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::I,
        ShapeKind::O,
        ShapeKind::T,
        ShapeKind::S,
        ShapeKind::Z,
        ShapeKind::J,
        ShapeKind::L,
    ];

    /// Catalog index (0..7)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Parse kind from string (case-insensitive)
    ///
    /// ```
    /// use console_tetris_types::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::from_str("I"), Some(ShapeKind::I));
    /// assert_eq!(ShapeKind::from_str("x"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(ShapeKind::I),
            "o" => Some(ShapeKind::O),
            "t" => Some(ShapeKind::T),
            "s" => Some(ShapeKind::S),
            "z" => Some(ShapeKind::Z),
            "j" => Some(ShapeKind::J),
            "l" => Some(ShapeKind::L),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::I => "i",
            ShapeKind::O => "o",
            ShapeKind::T => "t",
            ShapeKind::S => "s",
            ShapeKind::Z => "z",
            ShapeKind::J => "j",
            ShapeKind::L => "l",
        }
    }
}

/// Game actions
///
/// The first seven are external: they come from a controller (keyboard or
/// remote) through the input debouncer. `Fall`, `Lock` and `GameOver` are
/// raised by the player state machine itself and are never accepted from
/// the outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Shift one column left
    MoveLeft,
    /// Shift one column right
    MoveRight,
    /// Step one row down
    MoveDown,
    /// Drop to the resting position without locking
    SoftDrop,
    /// Drop to the resting position and lock
    HardDrop,
    /// Rotate counter-clockwise
    RotateLeft,
    /// Rotate clockwise
    RotateRight,
    /// Gravity tick
    Fall,
    /// Commit the piece into the matrix
    Lock,
    /// Top-out
    GameOver,
}

impl Action {
    /// External actions in bit order
    pub const EXTERNAL: [Action; 7] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::MoveDown,
        Action::SoftDrop,
        Action::HardDrop,
        Action::RotateLeft,
        Action::RotateRight,
    ];

    pub fn is_external(self) -> bool {
        !matches!(self, Action::Fall | Action::Lock | Action::GameOver)
    }

    /// Bit position inside an [`ActionSet`], `None` for internal actions
    pub fn bit(self) -> Option<u8> {
        Self::EXTERNAL
            .iter()
            .position(|&a| a == self)
            .map(|i| i as u8)
    }

    /// Parse action from string
    ///
    /// ```
    /// use console_tetris_types::Action;
    ///
    /// assert_eq!(Action::from_str("hardDrop"), Some(Action::HardDrop));
    /// assert_eq!(Action::from_str("ROTATELEFT"), Some(Action::RotateLeft));
    /// assert_eq!(Action::from_str("lock"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(Action::MoveLeft),
            "moveright" => Some(Action::MoveRight),
            "movedown" => Some(Action::MoveDown),
            "softdrop" => Some(Action::SoftDrop),
            "harddrop" => Some(Action::HardDrop),
            "rotateleft" => Some(Action::RotateLeft),
            "rotateright" => Some(Action::RotateRight),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::MoveLeft => "moveLeft",
            Action::MoveRight => "moveRight",
            Action::MoveDown => "moveDown",
            Action::SoftDrop => "softDrop",
            Action::HardDrop => "hardDrop",
            Action::RotateLeft => "rotateLeft",
            Action::RotateRight => "rotateRight",
            Action::Fall => "fall",
            Action::Lock => "lock",
            Action::GameOver => "gameOver",
        }
    }
}

/// Set of currently held external actions
///
/// One bit per entry of [`Action::EXTERNAL`]. This is what a controller
/// hands to the player every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ActionSet {
    bits: u8,
}

impl ActionSet {
    const MASK: u8 = (1 << Action::EXTERNAL.len()) - 1;

    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Build from a raw mask. Returns `None` if any bit beyond the external
    /// actions is set.
    pub fn from_bits(bits: u8) -> Option<Self> {
        if bits & !Self::MASK != 0 {
            return None;
        }
        Some(Self { bits })
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }

    /// Add an external action.
    ///
    /// # Panics
    ///
    /// Panics on an internal action (`Fall`, `Lock`, `GameOver`).
    pub fn insert(&mut self, action: Action) {
        let Some(bit) = action.bit() else {
            panic!("internal action {:?} cannot be held", action);
        };
        self.bits |= 1 << bit;
    }

    pub fn remove(&mut self, action: Action) {
        if let Some(bit) = action.bit() {
            self.bits &= !(1 << bit);
        }
    }

    pub fn contains(&self, action: Action) -> bool {
        action.bit().is_some_and(|bit| self.bits & (1 << bit) != 0)
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn union(&self, other: &ActionSet) -> ActionSet {
        ActionSet {
            bits: self.bits | other.bits,
        }
    }

    /// Held actions in [`Action::EXTERNAL`] order
    pub fn iter(&self) -> impl Iterator<Item = Action> + '_ {
        Action::EXTERNAL
            .iter()
            .copied()
            .filter(move |&a| self.contains(a))
    }
}

impl TryFrom<u8> for ActionSet {
    type Error = String;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        ActionSet::from_bits(bits).ok_or_else(|| format!("unknown action bits in mask 0x{bits:02x}"))
    }
}

impl From<ActionSet> for u8 {
    fn from(set: ActionSet) -> u8 {
        set.bits
    }
}

impl FromIterator<Action> for ActionSet {
    fn from_iter<T: IntoIterator<Item = Action>>(iter: T) -> Self {
        let mut set = ActionSet::empty();
        for action in iter {
            set.insert(action);
        }
        set
    }
}

/// Held actions for every player slot, as delivered to a match each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControllerState {
    pub players: [ActionSet; PLAYERS],
}

impl ControllerState {
    pub fn player(&self, slot: usize) -> ActionSet {
        self.players.get(slot).copied().unwrap_or_default()
    }

    /// Union of two controller states, slot by slot
    pub fn merge(&self, other: &ControllerState) -> ControllerState {
        let mut out = *self;
        for (mine, theirs) in out.players.iter_mut().zip(other.players.iter()) {
            *mine = mine.union(theirs);
        }
        out
    }
}

/// A matrix cell
///
/// - `None`: empty
/// - `Some(ShapeKind)`: locked, tagged with the kind for rendering
pub type Cell = Option<ShapeKind>;
