//! Collision oracle.

use crate::board::Board;
use crate::pieces::{PieceShape, Position};
use crate::types::EMPTY;

/// True when any occupied cell of `shape` placed at `pos` lands on an occupied
/// board cell or outside the board. Cells outside the grid count as blocked.
pub fn collides(board: &Board, shape: &PieceShape, pos: Position) -> bool {
    shape
        .minos()
        .iter()
        .any(|&(dx, dy, _)| board.get(pos.x + dx, pos.y + dy) != Some(EMPTY))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;

    #[test]
    fn test_empty_board_inside_is_free() {
        let board = Board::new(10, 20);
        let shape = PieceShape::of(PieceKind::T);
        assert!(!collides(&board, &shape, Position::new(3, 0)));
        assert!(!collides(&board, &shape, Position::new(7, 17)));
    }

    #[test]
    fn test_padding_rows_may_hang_outside() {
        // T's top row is empty, so y = -1 keeps every mino on the board.
        let board = Board::new(10, 20);
        let shape = PieceShape::of(PieceKind::T);
        assert!(!collides(&board, &shape, Position::new(0, -1)));
        // I's bottom two rows are empty.
        let i = PieceShape::of(PieceKind::I);
        assert!(!collides(&board, &i, Position::new(6, 18)));
        assert!(collides(&board, &i, Position::new(7, 18)));
    }

    #[test]
    fn test_walls_and_floor_block() {
        let board = Board::new(10, 20);
        let shape = PieceShape::of(PieceKind::O);
        assert!(collides(&board, &shape, Position::new(-1, 0)));
        assert!(collides(&board, &shape, Position::new(9, 0)));
        assert!(collides(&board, &shape, Position::new(0, 19)));
        assert!(collides(&board, &shape, Position::new(0, -1)));
        assert!(!collides(&board, &shape, Position::new(8, 18)));
    }

    #[test]
    fn test_occupied_cell_blocks() {
        let mut board = Board::new(10, 20);
        board.set(4, 10, 3);
        let shape = PieceShape::of(PieceKind::O);
        assert!(collides(&board, &shape, Position::new(3, 9)));
        assert!(collides(&board, &shape, Position::new(4, 10)));
        assert!(!collides(&board, &shape, Position::new(5, 10)));
    }
}
