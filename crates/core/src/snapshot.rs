//! Snapshot module - a plain copy of one player's frame for renderers
//!
//! Renderers read snapshots instead of borrowing a live [`Player`], so a
//! frame can be drawn while the match keeps running.

use crate::matrix::Rows;
use crate::piece::Piece;
use crate::player::{Phase, Player};
use crate::types::{Cell, ShapeKind, LOCK_CEILING, TOTAL_HEIGHT, WIDTH};

/// First matrix row included in a snapshot (the row above the visible area)
pub const SNAPSHOT_TOP: i32 = LOCK_CEILING;

/// Rows in a snapshot: the visible playfield plus the row above it
pub const SNAPSHOT_ROWS: usize = (TOTAL_HEIGHT - SNAPSHOT_TOP) as usize;

/// Everything a renderer needs to draw one player for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub phase: Phase,
    /// `board[r]` is matrix row `SNAPSHOT_TOP + r`
    pub board: [[Cell; WIDTH as usize]; SNAPSHOT_ROWS],
    /// Active piece, only while playing
    pub active: Option<Piece>,
    pub ghost: Option<Piece>,
    pub next: ShapeKind,
    pub clearing_rows: Rows,
    pub clearing_progress: f32,
    pub lines_cleared: u32,
    pub pieces_locked: u32,
}

impl PlayerSnapshot {
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        let row = y - SNAPSHOT_TOP;
        if x < 0 || x >= WIDTH || row < 0 || row >= SNAPSHOT_ROWS as i32 {
            return None;
        }
        Some(self.board[row as usize][x as usize])
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }
}

impl Default for PlayerSnapshot {
    fn default() -> Self {
        Self {
            phase: Phase::Playing,
            board: [[None; WIDTH as usize]; SNAPSHOT_ROWS],
            active: None,
            ghost: None,
            next: ShapeKind::I,
            clearing_rows: Rows::new(),
            clearing_progress: 0.0,
            lines_cleared: 0,
            pieces_locked: 0,
        }
    }
}

impl Player {
    /// Fill `out` in place; reuses the snapshot's storage.
    pub fn snapshot_into(&self, out: &mut PlayerSnapshot) {
        let matrix = self.matrix();
        for (r, row) in out.board.iter_mut().enumerate() {
            row.copy_from_slice(matrix.row(SNAPSHOT_TOP as usize + r));
        }

        let playing = self.phase() == Phase::Playing;
        out.phase = self.phase();
        out.active = playing.then(|| *self.piece());
        out.ghost = playing.then(|| self.ghost());
        out.next = self.next_kind();
        out.clearing_rows.clear();
        out.clearing_rows
            .extend(self.clearing_rows().iter().copied());
        out.clearing_progress = self.clearing_progress();
        out.lines_cleared = self.lines_cleared();
        out.pieces_locked = self.pieces_locked();
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        let mut s = PlayerSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}
