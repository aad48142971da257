//! Held-key tracking for terminal environments.
//!
//! Many terminals never emit key-release events. A key therefore counts as
//! held until it is released explicitly or until no press/repeat event for
//! it has arrived within the release timeout. Aging is driven by `dt`, not
//! by a clock, so the tracker is testable frame by frame.

use arrayvec::ArrayVec;
use crossterm::event::KeyCode;

use crate::map::{binding_for, KeyBinding};
use crate::types::{Action, ControllerState, PLAYERS};

const ACTIONS: usize = Action::EXTERNAL.len();

// In terminals without key-release events, a short timeout prevents a single tap
// from turning into a sustained "held" state.
const DEFAULT_KEY_RELEASE_TIMEOUT: f32 = 0.15;

#[derive(Debug, Clone)]
pub struct KeyboardState {
    /// Seconds since the last press/repeat, per held (slot, action)
    ages: [[Option<f32>; ACTIONS]; PLAYERS],
    release_timeout: f32,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self {
            ages: [[None; ACTIONS]; PLAYERS],
            release_timeout: DEFAULT_KEY_RELEASE_TIMEOUT,
        }
    }

    pub fn with_release_timeout(mut self, timeout: f32) -> Self {
        self.release_timeout = timeout;
        self
    }

    pub fn release_timeout(&self) -> f32 {
        self.release_timeout
    }

    fn slot_mut(&mut self, binding: KeyBinding) -> Option<&mut Option<f32>> {
        let bit = binding.action.bit()? as usize;
        self.ages.get_mut(binding.slot)?.get_mut(bit)
    }

    /// Press or auto-repeat. Returns the binding if the key controls a player.
    pub fn press(&mut self, code: KeyCode) -> Option<KeyBinding> {
        let binding = binding_for(code)?;
        *self.slot_mut(binding)? = Some(0.0);
        Some(binding)
    }

    pub fn release(&mut self, code: KeyCode) {
        if let Some(binding) = binding_for(code) {
            if let Some(age) = self.slot_mut(binding) {
                *age = None;
            }
        }
    }

    /// Age held keys by `dt`; returns the bindings that timed out
    pub fn update(&mut self, dt: f32) -> ArrayVec<KeyBinding, { PLAYERS * ACTIONS }> {
        let mut released = ArrayVec::new();
        for (slot, ages) in self.ages.iter_mut().enumerate() {
            for (age, &action) in ages.iter_mut().zip(Action::EXTERNAL.iter()) {
                let Some(a) = age.as_mut() else {
                    continue;
                };
                *a += dt;
                if *a > self.release_timeout {
                    *age = None;
                    released.push(KeyBinding { slot, action });
                }
            }
        }
        released
    }

    /// Currently held actions for every slot
    pub fn held(&self) -> ControllerState {
        let mut state = ControllerState::default();
        for (held, ages) in state.players.iter_mut().zip(self.ages.iter()) {
            for (age, &action) in ages.iter().zip(Action::EXTERNAL.iter()) {
                if age.is_some() {
                    held.insert(action);
                }
            }
        }
        state
    }

    pub fn reset(&mut self) {
        self.ages = [[None; ACTIONS]; PLAYERS];
    }
}

impl Default for KeyboardState {
    fn default() -> Self {
        Self::new()
    }
}
