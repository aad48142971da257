//! Piece module - the active falling piece
//!
//! A piece knows its kind, rotation and grid position, but nothing about the
//! matrix. Every operation that changes it takes a [`CollisionChecker`] and
//! commits only when the candidate placement is not blocked.

use crate::shapes::{shape_from_kind, Shape, ShapeGrid};
use crate::types::{ShapeKind, VANISH_HEIGHT, WIDTH};

/// Answers whether a candidate placement is blocked
pub trait CollisionChecker {
    fn blocked(&self, piece: &Piece) -> bool;
}

impl<F> CollisionChecker for F
where
    F: Fn(&Piece) -> bool,
{
    fn blocked(&self, piece: &Piece) -> bool {
        self(piece)
    }
}

/// An active shape instance
///
/// `(x, y)` is the grid-space top-left of the current rotation's bounding
/// box. `rotation` is always in `0..4`, clockwise from spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: ShapeKind,
    rotation: u8,
    x: i32,
    y: i32,
}

impl Piece {
    /// Create a piece at its spawn position: horizontally centered, resting
    /// on top of the visible area inside the vanish buffer.
    pub fn spawn(kind: ShapeKind) -> Self {
        let grid = &shape_from_kind(kind).grids[0];
        Self {
            kind,
            rotation: 0,
            x: (WIDTH - grid.width()) / 2,
            y: VANISH_HEIGHT - grid.height(),
        }
    }

    /// Create a piece at an explicit placement
    pub fn at(kind: ShapeKind, rotation: u8, x: i32, y: i32) -> Self {
        Self {
            kind,
            rotation: rotation % 4,
            x,
            y,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn shape(&self) -> &'static Shape {
        shape_from_kind(self.kind)
    }

    pub fn grid(&self) -> &'static ShapeGrid {
        &self.shape().grids[self.rotation as usize]
    }

    /// Occupied cells in grid space
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> {
        let (x, y) = (self.x, self.y);
        self.grid().cells().map(move |(col, row)| (x + col, y + row))
    }

    /// Shift by (dx, dy). Commits and returns true only if the target is free.
    pub fn try_move<C>(&mut self, dx: i32, dy: i32, checker: &C) -> bool
    where
        C: CollisionChecker + ?Sized,
    {
        let candidate = Piece {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        };
        self.commit_if_free(candidate, checker)
    }

    /// Rotate a quarter turn.
    ///
    /// The rotation frame stays in place: the bounding box moves by the
    /// difference between the new and old rotation offsets. There is exactly
    /// one candidate per attempt (no kick search).
    pub fn rotate<C>(&mut self, clockwise: bool, checker: &C) -> bool
    where
        C: CollisionChecker + ?Sized,
    {
        let rotation = if clockwise {
            (self.rotation + 1) % 4
        } else {
            (self.rotation + 3) % 4
        };

        let (old_x, old_y) = self.grid().offset();
        let (new_x, new_y) = self.shape().grids[rotation as usize].offset();

        let candidate = Piece {
            rotation,
            x: self.x - old_x + new_x,
            y: self.y - old_y + new_y,
            ..*self
        };
        self.commit_if_free(candidate, checker)
    }

    /// Step down until blocked; returns the number of rows travelled.
    ///
    /// The checker must block somewhere below (the matrix floor does).
    pub fn fall<C>(&mut self, checker: &C) -> u32
    where
        C: CollisionChecker + ?Sized,
    {
        let mut distance = 0;
        while self.try_move(0, 1, checker) {
            distance += 1;
        }
        distance
    }

    /// True when one more step down would be blocked
    pub fn is_resting<C>(&self, checker: &C) -> bool
    where
        C: CollisionChecker + ?Sized,
    {
        let below = Piece {
            y: self.y + 1,
            ..*self
        };
        checker.blocked(&below)
    }

    fn commit_if_free<C>(&mut self, candidate: Piece, checker: &C) -> bool
    where
        C: CollisionChecker + ?Sized,
    {
        if checker.blocked(&candidate) {
            return false;
        }
        *self = candidate;
        true
    }
}
