//! Match module - the authoritative owner of every player
//!
//! Controllers (keyboard, remote transport) never touch players directly:
//! they produce a [`ControllerState`] that the host loop passes to
//! [`Match::update`] once per frame.

use log::info;

use crate::player::{Player, PlayerConfig};
use crate::types::{ControllerState, PLAYERS};

#[derive(Debug, Clone)]
pub struct Match {
    players: [Player; PLAYERS],
    seed: u64,
    config: PlayerConfig,
    winner: Option<usize>,
}

impl Match {
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, PlayerConfig::default())
    }

    /// Every player's bag gets the same seed, so all players see the same
    /// piece sequence.
    pub fn with_config(seed: u64, config: PlayerConfig) -> Self {
        Self {
            players: std::array::from_fn(|_| Player::with_config(seed, config)),
            seed,
            config,
            winner: None,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn players(&self) -> &[Player; PLAYERS] {
        &self.players
    }

    pub fn player(&self, slot: usize) -> Option<&Player> {
        self.players.get(slot)
    }

    /// Advance every player by one frame with its slot's held set
    pub fn update(&mut self, dt: f32, controls: &ControllerState) {
        let was_over = self.is_over();
        for (slot, player) in self.players.iter_mut().enumerate() {
            player.update(dt, controls.player(slot));
        }
        if self.winner.is_none() {
            self.winner = self.last_standing();
            if let Some(slot) = self.winner {
                info!("player {} wins", slot + 1);
            }
        }
        if !was_over && self.is_over() {
            info!("match over (seed {})", self.seed);
        }
    }

    /// True once every player reached `GameOver`
    pub fn is_over(&self) -> bool {
        self.players.iter().all(Player::is_game_over)
    }

    /// The player left standing when every other one had topped out.
    ///
    /// Stays set after the winner tops out too; `None` for a draw or while
    /// more than one player is still in.
    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    fn last_standing(&self) -> Option<usize> {
        let mut standing = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.has_topped_out());
        match (standing.next(), standing.next()) {
            (Some((slot, _)), None) if PLAYERS > 1 => Some(slot),
            _ => None,
        }
    }

    /// Start over with fresh players
    pub fn restart(&mut self, seed: u64) {
        *self = Self::with_config(seed, self.config);
    }
}
