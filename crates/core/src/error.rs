//! Error types for piece construction.

use thiserror::Error;

use crate::types::MAX_PIECE_SIZE;

/// A piece was requested by a name outside the seven-letter alphabet.
///
/// Never produced in normal play: the random generator only draws valid kinds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown piece kind: {0:?}")]
pub struct UnknownKindError(pub String);

/// A shape matrix that cannot be rotated in place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("shape has no cells")]
    Empty,

    #[error("shape is {rows}x{cols}; piece shapes must be square")]
    NotSquare { rows: usize, cols: usize },

    #[error("shape size {0} exceeds the maximum of {max}", max = MAX_PIECE_SIZE)]
    TooLarge(usize),
}
