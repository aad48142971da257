//! Key mapping from terminal events to player actions.

use crate::types::{Action, PLAYERS};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A key bound to one action of one player slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub slot: usize,
    pub action: Action,
}

impl KeyBinding {
    const fn new(slot: usize, action: Action) -> Self {
        Self { slot, action }
    }
}

/// Map a key to the player action it controls.
///
/// Player 1 plays on the arrows (`.` rotates left, enter soft-drops, space
/// hard-drops); player 2 on `a`/`s`/`d`/`w` (`z` rotates left, `e`
/// soft-drops, tab hard-drops).
pub fn binding_for(code: KeyCode) -> Option<KeyBinding> {
    let binding = match code {
        KeyCode::Left => KeyBinding::new(0, Action::MoveLeft),
        KeyCode::Right => KeyBinding::new(0, Action::MoveRight),
        KeyCode::Down => KeyBinding::new(0, Action::MoveDown),
        KeyCode::Up => KeyBinding::new(0, Action::RotateRight),
        KeyCode::Char('.') => KeyBinding::new(0, Action::RotateLeft),
        KeyCode::Enter => KeyBinding::new(0, Action::SoftDrop),
        KeyCode::Char(' ') => KeyBinding::new(0, Action::HardDrop),

        KeyCode::Char('a') | KeyCode::Char('A') => KeyBinding::new(1, Action::MoveLeft),
        KeyCode::Char('d') | KeyCode::Char('D') => KeyBinding::new(1, Action::MoveRight),
        KeyCode::Char('s') | KeyCode::Char('S') => KeyBinding::new(1, Action::MoveDown),
        KeyCode::Char('w') | KeyCode::Char('W') => KeyBinding::new(1, Action::RotateRight),
        KeyCode::Char('z') | KeyCode::Char('Z') => KeyBinding::new(1, Action::RotateLeft),
        KeyCode::Char('e') | KeyCode::Char('E') => KeyBinding::new(1, Action::SoftDrop),
        KeyCode::Tab => KeyBinding::new(1, Action::HardDrop),

        _ => return None,
    };
    debug_assert!(binding.slot < PLAYERS);
    Some(binding)
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Check if key asks for a new match.
pub fn should_restart(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('r') | KeyCode::Char('R'))
}
