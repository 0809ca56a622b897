//! Board module - manages the game grid
//!
//! The board is a W×H grid of cell codes (`0` empty, `1..=7` piece ids).
//! Uses a flat row-major vector; rows are shifted in place, never removed, so
//! the grid always keeps exactly `height` rows of `width` cells.
//! Coordinates: (x, y) where x grows to the right and y grows downward from row 0.

use std::fmt;

use crate::pieces::{PieceShape, Position};
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH, EMPTY};

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![EMPTY; width * height],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(cell) if cell != EMPTY)
    }

    /// Row `y`, or None past the bottom
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        Some(&self.cells[start..start + self.width])
    }

    /// Rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        (0..self.height).filter_map(move |y| self.row(y))
    }

    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        self.rows().map(|row| row.to_vec()).collect()
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        match self.row(y) {
            Some(row) => !row.is_empty() && row.iter().all(|&cell| cell != EMPTY),
            None => false,
        }
    }

    /// Remove row `y`, shift all rows above down by one and put an empty row on top
    pub fn clear_row(&mut self, y: usize) {
        if y >= self.height {
            return;
        }

        let width = self.width;

        // copy_within handles the overlapping ranges
        for row in (1..=y).rev() {
            let src_start = (row - 1) * width;
            let dst_start = row * width;
            self.cells.copy_within(src_start..src_start + width, dst_start);
        }

        self.cells[..width].fill(EMPTY);
    }

    /// Remove every full row and return how many were removed.
    ///
    /// Scans bottom to top. After a row is removed the same index is examined
    /// again, since the row that shifted down into it may be full as well.
    pub fn sweep_full_rows(&mut self) -> usize {
        let mut cleared = 0;
        let mut y = self.height;

        while y > 0 {
            if self.is_row_full(y - 1) {
                self.clear_row(y - 1);
                cleared += 1;
            } else {
                y -= 1;
            }
        }

        cleared
    }

    /// Write every occupied cell of `shape` at `pos` into the board.
    /// Cells that would fall outside the grid are dropped.
    pub fn merge(&mut self, shape: &PieceShape, pos: Position) {
        for (dx, dy, cell) in shape.minos() {
            self.set(pos.x + dx, pos.y + dy, cell);
        }
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BOARD_WIDTH, BOARD_HEIGHT)
    }
}

/// One character per cell: `.` when empty, the piece letter otherwise.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for &cell in row {
                let c = PieceKind::from_id(cell).map_or('.', |k| k.letter());
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
