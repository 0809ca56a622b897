//! Wire types exchanged with the recommendation source.

use serde::{Deserialize, Serialize};

use crate::core::GameSnapshot;
use crate::types::{Cell, GameAction, SOFT_DROP_PULSES};

/// Rotations beyond a full turn are refused.
pub const MAX_DIRECTIVE_ROTATIONS: u32 = 4;

/// Piece origin as sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePosition {
    pub x: i32,
    pub y: i32,
}

/// Snapshot sent to the recommender: `{board, piece, position, score}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub board: Vec<Vec<Cell>>,
    pub piece: Vec<Vec<Cell>>,
    pub position: WirePosition,
    pub score: u32,
}

impl From<&GameSnapshot> for RecommendationRequest {
    fn from(snapshot: &GameSnapshot) -> Self {
        Self {
            board: snapshot.board.clone(),
            piece: snapshot.piece.clone(),
            position: WirePosition {
                x: snapshot.position.x,
                y: snapshot.position.y,
            },
            score: snapshot.score,
        }
    }
}

impl From<GameSnapshot> for RecommendationRequest {
    fn from(snapshot: GameSnapshot) -> Self {
        Self {
            board: snapshot.board,
            piece: snapshot.piece,
            position: WirePosition {
                x: snapshot.position.x,
                y: snapshot.position.y,
            },
            score: snapshot.score,
        }
    }
}

/// A recommended move: `{rotate?, move?, soft_drop?, drop?}`.
///
/// Missing fields default to zero / false. A negative `rotate` does not decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveDirective {
    /// Clockwise quarter turns.
    #[serde(default)]
    pub rotate: u32,
    /// Signed horizontal steps; negative is left.
    #[serde(default, rename = "move")]
    pub shift: i32,
    #[serde(default)]
    pub soft_drop: bool,
    /// Finish with a hard drop.
    #[serde(default)]
    pub drop: bool,
}

impl MoveDirective {
    /// Expand into single engine steps, in replay order: rotations, then
    /// horizontal moves, then soft-drop pulses, then the hard drop.
    pub fn actions(&self) -> impl Iterator<Item = GameAction> {
        let rotations = std::iter::repeat(GameAction::RotateCw).take(self.rotate as usize);
        let steps = self.shift.unsigned_abs() as usize;
        let moves = GameAction::shift(self.shift)
            .into_iter()
            .flat_map(move |action| std::iter::repeat(action).take(steps));
        let pulses = std::iter::repeat(GameAction::SoftDrop).take(if self.soft_drop {
            SOFT_DROP_PULSES
        } else {
            0
        });
        let drop = self.drop.then_some(GameAction::HardDrop);

        rotations.chain(moves).chain(pulses).chain(drop)
    }

    /// Number of steps [`MoveDirective::actions`] yields.
    pub fn step_count(&self) -> usize {
        (self.rotate as usize)
            .saturating_add(self.shift.unsigned_abs() as usize)
            .saturating_add(if self.soft_drop { SOFT_DROP_PULSES } else { 0 })
            .saturating_add(usize::from(self.drop))
    }

    /// Whether the directive is playable on a board `board_width` wide:
    /// at most [`MAX_DIRECTIVE_ROTATIONS`] turns and no more horizontal
    /// steps than there are columns.
    pub fn is_within(&self, board_width: usize) -> bool {
        self.rotate <= MAX_DIRECTIVE_ROTATIONS && self.shift.unsigned_abs() as usize <= board_width
    }
}
