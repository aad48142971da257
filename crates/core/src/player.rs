//! Player module - one player's match as a state machine
//!
//! A player owns its piece, matrix, bag and input debouncer and moves
//! through four phases:
//!
//! ```text
//! Playing --lock with full rows--> Clearing --timer--> Playing
//! Playing --top-out--> GameOverAnimation --timer--> GameOver (terminal)
//! ```
//!
//! Time only advances through [`Player::update`]; the player never reads a
//! clock. Given the same seed, `dt` sequence and held sets, two players end
//! in the same state.

use log::{debug, info};

use crate::bag::Bag;
use crate::debounce::{Debouncer, InputConfig};
use crate::matrix::{Matrix, Rows};
use crate::piece::Piece;
use crate::types::{
    Action, ActionSet, ShapeKind, CLEAR_DURATION, GAME_OVER_DURATION, GRAVITY_INTERVAL,
    LOCK_CEILING, TOTAL_HEIGHT,
};

/// Smallest accepted gravity interval; keeps the gravity loop finite.
const MIN_GRAVITY_INTERVAL: f32 = 1.0 / 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Playing,
    Clearing,
    GameOverAnimation,
    GameOver,
}

/// Per-player timing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerConfig {
    pub gravity_interval: f32,
    pub clear_duration: f32,
    pub game_over_duration: f32,
    pub input: InputConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            gravity_interval: GRAVITY_INTERVAL,
            clear_duration: CLEAR_DURATION,
            game_over_duration: GAME_OVER_DURATION,
            input: InputConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    piece: Piece,
    matrix: Matrix,
    bag: Bag,
    input: Debouncer,
    config: PlayerConfig,
    phase: Phase,
    falling_timer: f32,
    clearing_timer: f32,
    clearing_max_duration: f32,
    clearing_rows: Rows,
    lines_cleared: u32,
    pieces_locked: u32,
}

impl Player {
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, PlayerConfig::default())
    }

    pub fn with_config(seed: u64, config: PlayerConfig) -> Self {
        let config = PlayerConfig {
            gravity_interval: config.gravity_interval.max(MIN_GRAVITY_INTERVAL),
            ..config
        };
        let mut bag = Bag::new(seed);
        let piece = Piece::spawn(bag.pop());

        Self {
            piece,
            matrix: Matrix::new(),
            bag,
            input: Debouncer::standard(config.input),
            config,
            phase: Phase::Playing,
            falling_timer: 0.0,
            clearing_timer: 0.0,
            clearing_max_duration: config.clear_duration,
            clearing_rows: Rows::new(),
            lines_cleared: 0,
            pieces_locked: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// True once the player has topped out, animation or not
    pub fn has_topped_out(&self) -> bool {
        matches!(self.phase, Phase::GameOverAnimation | Phase::GameOver)
    }

    pub fn piece(&self) -> &Piece {
        &self.piece
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Where the active piece would land, derived fresh from the matrix
    pub fn ghost(&self) -> Piece {
        let mut ghost = self.piece;
        ghost.fall(&self.matrix);
        ghost
    }

    /// The kind that spawns after the current piece locks
    pub fn next_kind(&self) -> ShapeKind {
        self.bag.peek()
    }

    /// Rows animating (line clear or top-out); empty while playing
    pub fn clearing_rows(&self) -> &[usize] {
        &self.clearing_rows
    }

    /// Animation progress in [0, 1]; 0 outside animated phases
    pub fn clearing_progress(&self) -> f32 {
        match self.phase {
            Phase::Clearing | Phase::GameOverAnimation if self.clearing_max_duration > 0.0 => {
                (self.clearing_timer / self.clearing_max_duration).clamp(0.0, 1.0)
            }
            Phase::Clearing | Phase::GameOverAnimation => 1.0,
            _ => 0.0,
        }
    }

    pub fn falling_timer(&self) -> f32 {
        self.falling_timer
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn pieces_locked(&self) -> u32 {
        self.pieces_locked
    }

    /// Apply one external action. A no-op unless the player is `Playing`.
    ///
    /// # Panics
    ///
    /// Panics on `Fall`, `Lock` or `GameOver`; those are raised internally.
    pub fn action(&mut self, action: Action) {
        assert!(
            action.is_external(),
            "internal action {:?} dispatched from outside the player",
            action
        );
        if self.phase != Phase::Playing {
            return;
        }
        self.dispatch(action);
    }

    /// Advance one frame by `dt` seconds with `held` pressed
    pub fn update(&mut self, dt: f32, held: ActionSet) {
        if self.phase == Phase::GameOver {
            return;
        }

        if matches!(self.phase, Phase::Clearing | Phase::GameOverAnimation) {
            self.advance_clearing(dt);
        }

        if self.phase != Phase::Playing {
            return;
        }

        let fired = self.input.update(dt, held);
        for action in fired.iter() {
            if self.phase != Phase::Playing {
                break;
            }
            self.dispatch(action);
        }

        self.falling_timer += dt;
        while self.phase == Phase::Playing && self.falling_timer >= self.config.gravity_interval
        {
            self.falling_timer -= self.config.gravity_interval;
            self.dispatch(Action::Fall);
        }
    }

    fn dispatch(&mut self, action: Action) {
        match action {
            Action::MoveLeft | Action::MoveRight => {
                let dx = if action == Action::MoveLeft { -1 } else { 1 };
                if self.piece.try_move(dx, 0, &self.matrix) && self.piece.is_resting(&self.matrix)
                {
                    self.reset_fall();
                }
            }
            Action::MoveDown => {
                if self.piece.try_move(0, 1, &self.matrix) {
                    self.reset_fall();
                }
            }
            Action::SoftDrop => {
                if self.piece.fall(&self.matrix) > 0 {
                    self.reset_fall();
                }
            }
            Action::HardDrop => {
                self.piece.fall(&self.matrix);
                self.dispatch(Action::Lock);
            }
            Action::RotateLeft | Action::RotateRight => {
                let clockwise = action == Action::RotateRight;
                if self.piece.rotate(clockwise, &self.matrix) && self.piece.is_resting(&self.matrix)
                {
                    self.reset_fall();
                }
            }
            Action::Fall => {
                if !self.piece.try_move(0, 1, &self.matrix) {
                    self.dispatch(Action::Lock);
                }
            }
            Action::Lock => self.lock_piece(),
            Action::GameOver => self.start_game_over(),
        }
    }

    fn lock_piece(&mut self) {
        if !self.matrix.lock(&self.piece) {
            debug!("{:?} locked above the ceiling", self.piece.kind());
            self.dispatch(Action::GameOver);
            return;
        }
        self.pieces_locked += 1;
        self.spawn();

        let rows = self.matrix.get_full_rows();
        if rows.is_empty() {
            self.check_block_out();
            return;
        }

        debug!("clearing {} row(s): {:?}", rows.len(), rows.as_slice());
        self.phase = Phase::Clearing;
        self.clearing_rows = rows;
        self.clearing_timer = 0.0;
        self.clearing_max_duration = self.config.clear_duration;
    }

    fn start_game_over(&mut self) {
        info!(
            "top-out after {} piece(s), {} line(s)",
            self.pieces_locked, self.lines_cleared
        );
        self.phase = Phase::GameOverAnimation;
        self.clearing_rows = (LOCK_CEILING as usize..TOTAL_HEIGHT as usize).collect();
        self.clearing_timer = 0.0;
        self.clearing_max_duration = self.config.game_over_duration;
    }

    fn advance_clearing(&mut self, dt: f32) {
        self.clearing_timer += dt;
        if self.clearing_timer < self.clearing_max_duration {
            return;
        }

        self.matrix.clear_rows(&self.clearing_rows);
        match self.phase {
            Phase::Clearing => {
                self.lines_cleared += self.clearing_rows.len() as u32;
                self.clearing_rows.clear();
                self.phase = Phase::Playing;
                self.check_block_out();
            }
            Phase::GameOverAnimation => {
                self.clearing_rows.clear();
                self.phase = Phase::GameOver;
                info!("game over");
            }
            Phase::Playing | Phase::GameOver => {}
        }
    }

    fn spawn(&mut self) {
        self.piece = Piece::spawn(self.bag.pop());
        self.reset_fall();
    }

    /// A fresh piece that already overlaps the stack ends the match.
    fn check_block_out(&mut self) {
        if self.matrix.collision(&self.piece) {
            debug!("{:?} spawned into the stack", self.piece.kind());
            self.dispatch(Action::GameOver);
        }
    }

    fn reset_fall(&mut self) {
        self.falling_timer = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{VANISH_HEIGHT, WIDTH};

    fn fill_row_except(matrix: &mut Matrix, y: i32, gaps: &[i32]) {
        for x in 0..WIDTH {
            if !gaps.contains(&x) {
                matrix.set(x, y, Some(ShapeKind::J));
            }
        }
    }

    fn with_piece(player: &mut Player, piece: Piece) {
        player.piece = piece;
        player.falling_timer = 0.0;
    }

    #[test]
    fn test_starts_playing_with_a_spawned_piece() {
        let player = Player::new(12345);
        assert_eq!(player.phase(), Phase::Playing);
        assert_eq!(*player.piece(), Piece::spawn(player.piece().kind()));
        assert_eq!(player.matrix().occupied_count(), 0);
    }

    #[test]
    fn test_lateral_move_resets_gravity_only_when_resting() {
        let mut player = Player::new(1);
        with_piece(&mut player, Piece::at(ShapeKind::O, 0, 4, 10));
        player.falling_timer = 0.5;
        player.action(Action::MoveLeft);
        assert_eq!(player.piece().x(), 3);
        assert_eq!(player.falling_timer(), 0.5);

        with_piece(&mut player, Piece::at(ShapeKind::O, 0, 4, TOTAL_HEIGHT - 2));
        player.falling_timer = 0.5;
        player.action(Action::MoveRight);
        assert_eq!(player.piece().x(), 5);
        assert_eq!(player.falling_timer(), 0.0);
    }

    #[test]
    fn test_move_down_resets_gravity() {
        let mut player = Player::new(1);
        player.falling_timer = 0.75;
        let y = player.piece().y();
        player.action(Action::MoveDown);
        assert_eq!(player.piece().y(), y + 1);
        assert_eq!(player.falling_timer(), 0.0);
    }

    #[test]
    fn test_soft_drop_lands_without_locking() {
        let mut player = Player::new(1);
        let ghost = player.ghost();
        player.action(Action::SoftDrop);
        assert_eq!(*player.piece(), ghost);
        assert_eq!(player.matrix().occupied_count(), 0);
        assert_eq!(player.pieces_locked(), 0);
    }

    #[test]
    fn test_hard_drop_locks_and_spawns_next() {
        let mut player = Player::new(1);
        let next = player.next_kind();
        player.action(Action::HardDrop);
        assert_eq!(player.matrix().occupied_count(), 4);
        assert_eq!(player.pieces_locked(), 1);
        assert_eq!(*player.piece(), Piece::spawn(next));
        assert_eq!(player.phase(), Phase::Playing);
    }

    #[test]
    fn test_gravity_fall_on_resting_piece_locks() {
        let mut player = Player::new(1);
        player.action(Action::SoftDrop);
        player.update(1.0, ActionSet::empty());
        assert_eq!(player.pieces_locked(), 1);
    }

    #[test]
    fn test_full_row_enters_clearing_then_collapses() {
        let mut player = Player::new(1);
        let bottom = TOTAL_HEIGHT - 1;
        fill_row_except(&mut player.matrix, bottom, &[0, 1, 2, 3]);
        player.matrix.set(9, bottom - 1, Some(ShapeKind::T));
        with_piece(&mut player, Piece::at(ShapeKind::I, 0, 0, 30));

        player.action(Action::HardDrop);
        assert_eq!(player.phase(), Phase::Clearing);
        assert_eq!(player.clearing_rows(), &[bottom as usize]);

        // Input is ignored while clearing.
        let piece = *player.piece();
        player.action(Action::MoveLeft);
        assert_eq!(*player.piece(), piece);

        player.update(0.25, ActionSet::empty());
        assert_eq!(player.phase(), Phase::Clearing);
        assert_eq!(player.clearing_progress(), 0.5);

        player.update(0.25, ActionSet::empty());
        assert_eq!(player.phase(), Phase::Playing);
        assert_eq!(player.lines_cleared(), 1);
        assert_eq!(player.matrix().occupied_count(), 1);
        assert_eq!(player.matrix().get(9, bottom), Some(Some(ShapeKind::T)));
    }

    #[test]
    fn test_locking_above_ceiling_runs_game_over_animation() {
        let mut player = Player::new(1);
        for y in VANISH_HEIGHT..TOTAL_HEIGHT {
            fill_row_except(&mut player.matrix, y, &[0]);
        }
        with_piece(&mut player, Piece::at(ShapeKind::O, 0, 4, VANISH_HEIGHT - 3));

        player.action(Action::HardDrop);
        assert_eq!(player.phase(), Phase::GameOverAnimation);
        assert_eq!(player.clearing_rows().len(), (TOTAL_HEIGHT - LOCK_CEILING) as usize);
        assert_eq!(player.clearing_rows()[0], LOCK_CEILING as usize);

        player.update(0.5, ActionSet::empty());
        assert_eq!(player.phase(), Phase::GameOverAnimation);
        player.update(0.5, ActionSet::empty());
        assert_eq!(player.phase(), Phase::GameOver);
        // The stack is gone; only the two cells locked above the ceiling drop in.
        assert_eq!(player.matrix().occupied_count(), 2);
    }

    #[test]
    fn test_spawning_into_the_stack_ends_the_match() {
        let mut player = Player::new(1);
        let spawn = Piece::spawn(player.next_kind());
        for (x, y) in spawn.cells().filter(|&(_, y)| y == LOCK_CEILING) {
            player.matrix.set(x, y, Some(ShapeKind::S));
        }
        with_piece(&mut player, Piece::at(ShapeKind::O, 0, 0, 30));

        player.action(Action::HardDrop);
        assert_eq!(player.phase(), Phase::GameOverAnimation);
    }

    #[test]
    fn test_game_over_ignores_everything() {
        let mut player = Player::new(1);
        player.dispatch(Action::GameOver);
        player.update(5.0, ActionSet::empty());
        assert!(player.is_game_over());

        let piece = *player.piece();
        player.action(Action::HardDrop);
        player.update(10.0, [Action::MoveLeft].into_iter().collect());
        assert!(player.is_game_over());
        assert_eq!(*player.piece(), piece);
    }

    #[test]
    #[should_panic(expected = "internal action")]
    fn test_external_lock_is_a_programmer_error() {
        Player::new(1).action(Action::Lock);
    }

    #[test]
    fn test_ghost_does_not_move_the_piece() {
        let player = Player::new(3);
        let ghost = player.ghost();
        assert_eq!(ghost.x(), player.piece().x());
        assert!(ghost.y() > player.piece().y());
        assert!(ghost.is_resting(player.matrix()));
        assert_eq!(*player.piece(), Piece::spawn(player.piece().kind()));
    }
}
