//! Pieces module - tetromino catalog and in-place matrix rotation
//!
//! Every catalog shape is stored as an N×N matrix (N ≤ 4) of cell values, so a
//! transpose followed by a row or column reversal is an exact quarter turn.
//! The I piece is kept in a 4×4 box for that reason.

use arrayvec::ArrayVec;

use crate::error::{ShapeError, UnknownKindError};
use crate::types::{Cell, PieceKind, EMPTY, MAX_PIECE_SIZE};

/// One occupied cell of a shape: `(x, y, cell value)` relative to the shape's top-left.
pub type Mino = (i32, i32, Cell);

/// Top-left corner of the piece's bounding box in board coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

const T_SHAPE: [[Cell; 3]; 3] = [[0, 0, 0], [1, 1, 1], [0, 1, 0]];
const O_SHAPE: [[Cell; 2]; 2] = [[2, 2], [2, 2]];
const L_SHAPE: [[Cell; 3]; 3] = [[0, 3, 0], [0, 3, 0], [0, 3, 3]];
const J_SHAPE: [[Cell; 3]; 3] = [[0, 4, 0], [0, 4, 0], [4, 4, 0]];
const S_SHAPE: [[Cell; 3]; 3] = [[0, 5, 5], [5, 5, 0], [0, 0, 0]];
const Z_SHAPE: [[Cell; 3]; 3] = [[6, 6, 0], [0, 6, 6], [0, 0, 0]];
const I_SHAPE: [[Cell; 4]; 4] = [[0, 0, 0, 0], [7, 7, 7, 7], [0, 0, 0, 0], [0, 0, 0, 0]];

struct SquareSize<const N: usize>;

impl<const N: usize> SquareSize<N> {
    const CHECK: () = assert!(
        N > 0 && N <= MAX_PIECE_SIZE,
        "piece shapes must be between 1x1 and 4x4"
    );
}

/// A square piece matrix, stored in a fixed 4×4 buffer.
///
/// Only the top-left `size × size` region is meaningful; the rest stays zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceShape {
    size: usize,
    cells: [[Cell; MAX_PIECE_SIZE]; MAX_PIECE_SIZE],
}

impl PieceShape {
    /// Build from an N×N array. Squareness is guaranteed by the type and the
    /// size bound is checked when the constructor is instantiated.
    pub fn from_square<const N: usize>(rows: &[[Cell; N]; N]) -> Self {
        #[allow(clippy::let_unit_value)]
        let _size_ok = SquareSize::<N>::CHECK;

        let mut cells = [[EMPTY; MAX_PIECE_SIZE]; MAX_PIECE_SIZE];
        for (y, row) in rows.iter().enumerate() {
            cells[y][..N].copy_from_slice(row);
        }
        Self { size: N, cells }
    }

    /// Build from untyped rows, rejecting anything that is not N×N with N ≤ 4.
    pub fn try_from_rows<R: AsRef<[Cell]>>(rows: &[R]) -> Result<Self, ShapeError> {
        let size = rows.len();
        if size == 0 {
            return Err(ShapeError::Empty);
        }
        if let Some(row) = rows.iter().find(|r| r.as_ref().len() != size) {
            return Err(ShapeError::NotSquare {
                rows: size,
                cols: row.as_ref().len(),
            });
        }
        if size > MAX_PIECE_SIZE {
            return Err(ShapeError::TooLarge(size));
        }

        let mut cells = [[EMPTY; MAX_PIECE_SIZE]; MAX_PIECE_SIZE];
        for (y, row) in rows.iter().enumerate() {
            cells[y][..size].copy_from_slice(row.as_ref());
        }
        Ok(Self { size, cells })
    }

    /// Fresh working copy of the canonical shape for `kind`.
    pub fn of(kind: PieceKind) -> Self {
        match kind {
            PieceKind::T => Self::from_square(&T_SHAPE),
            PieceKind::O => Self::from_square(&O_SHAPE),
            PieceKind::L => Self::from_square(&L_SHAPE),
            PieceKind::J => Self::from_square(&J_SHAPE),
            PieceKind::S => Self::from_square(&S_SHAPE),
            PieceKind::Z => Self::from_square(&Z_SHAPE),
            PieceKind::I => Self::from_square(&I_SHAPE),
        }
    }

    /// Side length of the bounding square (also the shape's width).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Cell at `(x, y)`, or `EMPTY` outside the bounding square.
    pub fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.size && y < self.size {
            self.cells[y][x]
        } else {
            EMPTY
        }
    }

    /// Rows of the bounding square, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells[..self.size].iter().map(move |row| &row[..self.size])
    }

    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        self.rows().map(|row| row.to_vec()).collect()
    }

    /// Occupied cells in row-major order.
    pub fn minos(&self) -> ArrayVec<Mino, { MAX_PIECE_SIZE * MAX_PIECE_SIZE }> {
        let mut minos = ArrayVec::new();
        for (y, row) in self.rows().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                if cell != EMPTY {
                    minos.push((x as i32, y as i32, cell));
                }
            }
        }
        minos
    }

    /// Quarter turn in place: transpose, then reverse each row (clockwise) or
    /// the row order (counter-clockwise).
    pub fn rotate_in_place(&mut self, clockwise: bool) {
        let n = self.size;
        for y in 0..n {
            for x in 0..y {
                let tmp = self.cells[x][y];
                self.cells[x][y] = self.cells[y][x];
                self.cells[y][x] = tmp;
            }
        }

        if clockwise {
            for row in &mut self.cells[..n] {
                row[..n].reverse();
            }
        } else {
            self.cells[..n].reverse();
        }
    }
}

/// Create a piece by its letter name.
pub fn create_piece(name: &str) -> Result<PieceShape, UnknownKindError> {
    PieceKind::from_letter(name)
        .map(PieceShape::of)
        .ok_or_else(|| UnknownKindError(name.to_string()))
}
