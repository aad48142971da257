//! Shape catalog - the seven piece kinds in four rotations each
//!
//! Every rotation is described by the minos it occupies inside a 4x4
//! rotation frame. At compile time each rotation is reduced to a
//! [`ShapeGrid`]: the tight bounding box of its minos, the box's offset
//! inside the frame, and the occupancy mask. Rotating a piece keeps the frame
//! where it is, so the box moves by the difference of the two offsets.

use crate::types::ShapeKind;

/// Mino position inside the rotation frame
type Mino = (i8, i8);

/// One rotation state of one piece kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeGrid {
    width: u8,
    height: u8,
    offset_x: i8,
    offset_y: i8,
    mask: [[bool; 4]; 4],
}

impl ShapeGrid {
    const fn from_minos(minos: [Mino; 4]) -> Self {
        let mut min_x = i8::MAX;
        let mut min_y = i8::MAX;
        let mut max_x = i8::MIN;
        let mut max_y = i8::MIN;

        let mut i = 0;
        while i < 4 {
            let (x, y) = minos[i];
            if x < min_x {
                min_x = x;
            }
            if x > max_x {
                max_x = x;
            }
            if y < min_y {
                min_y = y;
            }
            if y > max_y {
                max_y = y;
            }
            i += 1;
        }

        let mut mask = [[false; 4]; 4];
        let mut i = 0;
        while i < 4 {
            let (x, y) = minos[i];
            mask[(y - min_y) as usize][(x - min_x) as usize] = true;
            i += 1;
        }

        Self {
            width: (max_x - min_x + 1) as u8,
            height: (max_y - min_y + 1) as u8,
            offset_x: min_x,
            offset_y: min_y,
            mask,
        }
    }

    pub fn width(&self) -> i32 {
        self.width as i32
    }

    pub fn height(&self) -> i32 {
        self.height as i32
    }

    /// Position of the bounding box inside the rotation frame
    pub fn offset(&self) -> (i32, i32) {
        (self.offset_x as i32, self.offset_y as i32)
    }

    /// Whether (col, row) of the bounding box is occupied
    pub fn occupied(&self, col: i32, row: i32) -> bool {
        if col < 0 || row < 0 || col >= self.width() || row >= self.height() {
            return false;
        }
        self.mask[row as usize][col as usize]
    }

    /// Occupied (col, row) pairs, row-major, relative to the box's top-left
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.height()).flat_map(move |row| {
            (0..self.width())
                .filter(move |&col| self.mask[row as usize][col as usize])
                .map(move |col| (col, row))
        })
    }
}

/// The four rotation states of one kind, indexed clockwise from spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub grids: [ShapeGrid; 4],
}

const fn shape(kind: ShapeKind, rotations: [[Mino; 4]; 4]) -> Shape {
    Shape {
        kind,
        grids: [
            ShapeGrid::from_minos(rotations[0]),
            ShapeGrid::from_minos(rotations[1]),
            ShapeGrid::from_minos(rotations[2]),
            ShapeGrid::from_minos(rotations[3]),
        ],
    }
}

static CATALOG: [Shape; 7] = [
    shape(
        ShapeKind::I,
        [
            [(0, 1), (1, 1), (2, 1), (3, 1)],
            [(2, 0), (2, 1), (2, 2), (2, 3)],
            [(0, 2), (1, 2), (2, 2), (3, 2)],
            [(1, 0), (1, 1), (1, 2), (1, 3)],
        ],
    ),
    shape(
        ShapeKind::O,
        [
            [(1, 0), (2, 0), (1, 1), (2, 1)],
            [(1, 0), (2, 0), (1, 1), (2, 1)],
            [(1, 0), (2, 0), (1, 1), (2, 1)],
            [(1, 0), (2, 0), (1, 1), (2, 1)],
        ],
    ),
    shape(
        ShapeKind::T,
        [
            [(1, 0), (0, 1), (1, 1), (2, 1)],
            [(1, 0), (1, 1), (2, 1), (1, 2)],
            [(0, 1), (1, 1), (2, 1), (1, 2)],
            [(1, 0), (0, 1), (1, 1), (1, 2)],
        ],
    ),
    shape(
        ShapeKind::S,
        [
            [(1, 0), (2, 0), (0, 1), (1, 1)],
            [(1, 0), (1, 1), (2, 1), (2, 2)],
            [(1, 1), (2, 1), (0, 2), (1, 2)],
            [(0, 0), (0, 1), (1, 1), (1, 2)],
        ],
    ),
    shape(
        ShapeKind::Z,
        [
            [(0, 0), (1, 0), (1, 1), (2, 1)],
            [(2, 0), (1, 1), (2, 1), (1, 2)],
            [(0, 1), (1, 1), (1, 2), (2, 2)],
            [(1, 0), (0, 1), (1, 1), (0, 2)],
        ],
    ),
    shape(
        ShapeKind::J,
        [
            [(0, 0), (0, 1), (1, 1), (2, 1)],
            [(1, 0), (2, 0), (1, 1), (1, 2)],
            [(0, 1), (1, 1), (2, 1), (2, 2)],
            [(1, 0), (1, 1), (0, 2), (1, 2)],
        ],
    ),
    shape(
        ShapeKind::L,
        [
            [(2, 0), (0, 1), (1, 1), (2, 1)],
            [(1, 0), (1, 1), (1, 2), (2, 2)],
            [(0, 1), (1, 1), (2, 1), (0, 2)],
            [(0, 0), (1, 0), (1, 1), (1, 2)],
        ],
    ),
];

/// Look up the static shape for a kind
pub fn shape_from_kind(kind: ShapeKind) -> &'static Shape {
    &CATALOG[kind.index()]
}
