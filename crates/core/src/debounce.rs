//! Input debouncer - held actions to discrete action events
//!
//! Called once per frame with the set of held external actions. Each bound
//! action is either one-shot (fires on press only) or repeatable (fires on
//! press, then auto-repeats DAS/ARR style while held).
//!
//! A repeatable action held for a total of `D` seconds after its press frame
//! fires `1 + floor(max(0, D - repeat_delay) / repeat_interval)` times.
//! Everything depends only on the previous state, `dt` and the held set.

use std::iter;

use crate::types::{Action, ActionSet, DEFAULT_REPEAT_DELAY, DEFAULT_REPEAT_INTERVAL};

const SLOTS: usize = Action::EXTERNAL.len();

/// Actions fired in one frame
///
/// Kept as a fire count per external action, so a long frame never loses
/// presses behind a run of repeats. [`FiredActions::iter`] yields each action
/// as many times as it fired, in [`Action::EXTERNAL`] order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FiredActions {
    counts: [u32; SLOTS],
}

impl FiredActions {
    fn push(&mut self, action: Action) {
        if let Some(bit) = action.bit() {
            let count = &mut self.counts[bit as usize];
            *count = count.saturating_add(1);
        }
    }

    /// How many times `action` fired this frame
    pub fn count(&self, action: Action) -> u32 {
        action.bit().map_or(0, |bit| self.counts[bit as usize])
    }

    pub fn len(&self) -> usize {
        self.counts.iter().map(|&n| n as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&n| n == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = Action> + '_ {
        Action::EXTERNAL
            .iter()
            .zip(self.counts.iter())
            .flat_map(|(&action, &n)| iter::repeat(action).take(n as usize))
    }
}

/// Smallest repeat interval accepted; keeps the repeat loop finite.
const MIN_REPEAT_INTERVAL: f32 = 1.0 / 1024.0;

/// Auto-repeat timing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputConfig {
    /// Hold time before repeating starts
    pub repeat_delay: f32,
    /// Interval between repeats
    pub repeat_interval: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            repeat_delay: DEFAULT_REPEAT_DELAY,
            repeat_interval: DEFAULT_REPEAT_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct KeyState {
    bound: bool,
    repeatable: bool,
    held: bool,
    held_time: f32,
    repeating: bool,
    repeat_acc: f32,
}

impl KeyState {
    fn release(&mut self) {
        self.held = false;
        self.held_time = 0.0;
        self.repeating = false;
        self.repeat_acc = 0.0;
    }
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    config: InputConfig,
    keys: [KeyState; SLOTS],
}

impl Debouncer {
    /// A debouncer with nothing bound
    pub fn new(config: InputConfig) -> Self {
        let config = InputConfig {
            repeat_delay: config.repeat_delay.max(0.0),
            repeat_interval: config.repeat_interval.max(MIN_REPEAT_INTERVAL),
        };
        Self {
            config,
            keys: [KeyState::default(); SLOTS],
        }
    }

    /// Directional moves repeat; drops and rotations are one-shot
    pub fn standard(config: InputConfig) -> Self {
        let mut debouncer = Self::new(config);
        debouncer
            .bind(Action::MoveLeft, true)
            .bind(Action::MoveRight, true)
            .bind(Action::MoveDown, true)
            .bind(Action::SoftDrop, false)
            .bind(Action::HardDrop, false)
            .bind(Action::RotateRight, false)
            .bind(Action::RotateLeft, false);
        debouncer
    }

    /// Start tracking an external action.
    ///
    /// # Panics
    ///
    /// Panics on an internal action.
    pub fn bind(&mut self, action: Action, repeatable: bool) -> &mut Self {
        let Some(bit) = action.bit() else {
            panic!("internal action {:?} cannot be bound", action);
        };
        let key = &mut self.keys[bit as usize];
        key.bound = true;
        key.repeatable = repeatable;
        key.release();
        self
    }

    pub fn config(&self) -> InputConfig {
        self.config
    }

    /// Advance by `dt` seconds with `held` currently pressed
    pub fn update(&mut self, dt: f32, held: ActionSet) -> FiredActions {
        let mut fired = FiredActions::default();
        let InputConfig {
            repeat_delay,
            repeat_interval,
        } = self.config;

        for (key, &action) in self.keys.iter_mut().zip(Action::EXTERNAL.iter()) {
            if !key.bound {
                continue;
            }
            if !held.contains(action) {
                key.release();
                continue;
            }

            if !key.held {
                key.held = true;
                fired.push(action);
                continue;
            }

            if !key.repeatable {
                continue;
            }

            key.held_time += dt;
            if key.held_time < repeat_delay {
                continue;
            }

            key.repeat_acc += if key.repeating {
                dt
            } else {
                key.repeating = true;
                key.held_time - repeat_delay
            };

            while key.repeat_acc >= repeat_interval {
                fired.push(action);
                key.repeat_acc -= repeat_interval;
            }
        }

        fired
    }

    /// Forget all held state
    pub fn reset(&mut self) {
        for key in &mut self.keys {
            key.release();
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::standard(InputConfig::default())
    }
}
