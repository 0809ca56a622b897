//! Owned, serializable-friendly view of a session at one instant.

use crate::pieces::Position;
use crate::types::{Cell, PieceKind, EMPTY};

/// Everything an observer needs to draw a frame or build a recommendation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub board: Vec<Vec<Cell>>,
    pub piece: Vec<Vec<Cell>>,
    pub kind: PieceKind,
    pub position: Position,
    pub score: u32,
    pub game_over: bool,
    pub games_played: u32,
}

impl GameSnapshot {
    /// Board with the active piece painted on top, clipped to the grid.
    pub fn composite(&self) -> Vec<Vec<Cell>> {
        let mut frame = self.board.clone();
        for (dy, row) in self.piece.iter().enumerate() {
            for (dx, &cell) in row.iter().enumerate() {
                if cell == EMPTY {
                    continue;
                }
                let x = self.position.x + dx as i32;
                let y = self.position.y + dy as i32;
                if x < 0 || y < 0 {
                    continue;
                }
                if let Some(slot) = frame
                    .get_mut(y as usize)
                    .and_then(|r| r.get_mut(x as usize))
                {
                    *slot = cell;
                }
            }
        }
        frame
    }
}
