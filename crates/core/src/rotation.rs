//! Rotation with horizontal wall kicks.
//!
//! After an in-place quarter turn, the piece is nudged sideways until it fits,
//! trying cumulative offsets +1, -2, +3, -4, ... from the original column
//! (i.e. x+1, x-1, x+2, x-2, ...). Once the next offset's magnitude would
//! exceed the shape width the rotation is undone.

use crate::board::Board;
use crate::collision::collides;
use crate::pieces::{PieceShape, Position};

/// Rotate `shape` at `pos` with wall kicks.
///
/// On success `shape` and `pos` hold the rotated, collision-free placement.
/// On failure both are restored exactly and `false` is returned.
pub fn rotate_with_kicks(
    board: &Board,
    shape: &mut PieceShape,
    pos: &mut Position,
    clockwise: bool,
) -> bool {
    let original_x = pos.x;
    let width = shape.size() as u32;
    let mut offset: i32 = 1;

    shape.rotate_in_place(clockwise);

    while collides(board, shape, *pos) {
        pos.x += offset;
        offset = -(offset + offset.signum());
        if offset.unsigned_abs() > width {
            shape.rotate_in_place(!clockwise);
            pos.x = original_x;
            return false;
        }
    }

    true
}
