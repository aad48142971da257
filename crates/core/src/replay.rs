//! Replay records
//!
//! A match is fully determined by its seed, its config and the sequence of
//! `(dt, controls)` frames fed to it. Recording those frames is enough to
//! rebuild the match exactly.

use serde::{Deserialize, Serialize};

use crate::player::PlayerConfig;
use crate::session::Match;
use crate::types::ControllerState;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplayFrame {
    pub dt: f32,
    pub controls: ControllerState,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Replay {
    pub seed: u64,
    pub frames: Vec<ReplayFrame>,
}

impl Replay {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            frames: Vec::new(),
        }
    }

    pub fn record(&mut self, dt: f32, controls: &ControllerState) {
        self.frames.push(ReplayFrame {
            dt,
            controls: *controls,
        });
    }

    /// Rebuild the recorded match with the default config
    pub fn play(&self) -> Match {
        self.play_with(PlayerConfig::default())
    }

    pub fn play_with(&self, config: PlayerConfig) -> Match {
        let mut game = Match::with_config(self.seed, config);
        for frame in &self.frames {
            game.update(frame.dt, &frame.controls);
        }
        game
    }
}
