//! Matrix module - the playfield of locked cells
//!
//! The matrix is `WIDTH` x `TOTAL_HEIGHT` cells stored as a flat row-major
//! array. Rows `0..VANISH_HEIGHT` form the hidden vanish buffer, the rest is
//! the visible playfield. Coordinates are (x, y) with y growing downward.
//!
//! Locked cells only change through [`Matrix::lock`] and
//! [`Matrix::clear_rows`].

use arrayvec::ArrayVec;

use crate::piece::{CollisionChecker, Piece};
use crate::types::{Cell, LOCK_CEILING, TOTAL_HEIGHT, VANISH_HEIGHT, WIDTH};

const CELL_COUNT: usize = (WIDTH * TOTAL_HEIGHT) as usize;

/// Row indices, enough for every row of the matrix
pub type Rows = ArrayVec<usize, { TOTAL_HEIGHT as usize }>;

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    cells: [Cell; CELL_COUNT],
}

impl Matrix {
    pub fn new() -> Self {
        Self {
            cells: [None; CELL_COUNT],
        }
    }

    #[inline(always)]
    fn index(x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= WIDTH || y < 0 || y >= TOTAL_HEIGHT {
            return None;
        }
        Some((y as usize) * (WIDTH as usize) + (x as usize))
    }

    pub fn width(&self) -> i32 {
        WIDTH
    }

    pub fn height(&self) -> i32 {
        TOTAL_HEIGHT
    }

    /// Cell at (x, y), `None` when out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Overwrite a cell directly. Returns false if out of bounds.
    ///
    /// Gameplay goes through `lock`; this exists for scripted setups.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// True if any cell of the piece is off the sides, below the floor, or on
    /// a locked cell. Cells above row 0 are not blocked.
    pub fn collision(&self, piece: &Piece) -> bool {
        piece.cells().any(|(x, y)| {
            if x < 0 || x >= WIDTH || y >= TOTAL_HEIGHT {
                return true;
            }
            y >= 0 && self.is_occupied(x, y)
        })
    }

    /// Commit every cell of the piece.
    ///
    /// Returns false if any cell lies above `LOCK_CEILING` (top-out). Cells
    /// inside the matrix are written either way.
    pub fn lock(&mut self, piece: &Piece) -> bool {
        let mut fits = true;
        for (x, y) in piece.cells() {
            if y < LOCK_CEILING {
                fits = false;
            }
            self.set(x, y, Some(piece.kind()));
        }
        fits
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= TOTAL_HEIGHT as usize {
            return false;
        }
        self.row(y).iter().all(|cell| cell.is_some())
    }

    /// Fully occupied rows, top to bottom
    pub fn get_full_rows(&self) -> Rows {
        (0..TOTAL_HEIGHT as usize)
            .filter(|&y| self.is_row_full(y))
            .collect()
    }

    /// Remove the given rows and let everything above each of them drop by
    /// one. Order and duplicates in `rows` do not matter; out-of-range rows
    /// are ignored.
    pub fn clear_rows(&mut self, rows: &[usize]) {
        let mut doomed = [false; TOTAL_HEIGHT as usize];
        for &y in rows {
            if let Some(flag) = doomed.get_mut(y) {
                *flag = true;
            }
        }

        // Top to bottom: a shift never moves a row that is still pending.
        let width = WIDTH as usize;
        for y in (0..TOTAL_HEIGHT as usize).filter(|&y| doomed[y]) {
            self.cells.copy_within(0..y * width, width);
            self.cells[..width].fill(None);
        }
    }

    /// A row as a slice of cells
    pub fn row(&self, y: usize) -> &[Cell] {
        let width = WIDTH as usize;
        &self.cells[y * width..(y + 1) * width]
    }

    /// Rows of the visible playfield, top to bottom
    pub fn visible_rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        let width = WIDTH as usize;
        self.cells[VANISH_HEIGHT as usize * width..].chunks_exact(width)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionChecker for Matrix {
    fn blocked(&self, piece: &Piece) -> bool {
        self.collision(piece)
    }
}
