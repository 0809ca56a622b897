//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the board, the piece catalog, collision and rotation
//! rules, and the per-session state machine. It performs no I/O and never
//! sleeps, so everything here can be driven from tests, a headless runner or
//! the autoplay orchestrator alike.
//!
//! # Module Structure
//!
//! - [`board`]: W×H grid of cell codes with row sweeping
//! - [`pieces`]: the seven canonical shapes and in-place quarter turns
//! - [`collision`]: the single overlap / out-of-bounds predicate
//! - [`rotation`]: rotation with alternating horizontal wall kicks
//! - [`scoring`]: doubling line-clear points
//! - [`rng`]: seedable uniform piece draws
//! - [`game_state`]: spawn, move, drop, lock and the gravity clock
//! - [`snapshot`]: owned views for observers
//!
//! # Game Rules
//!
//! - **Uniform draws**: every spawn picks one of `TOLZSJI` independently
//! - **Wall kicks**: after a blocked turn, try x offsets +1, -2, +3, -4, ...
//! - **Instant lock**: a piece locks the moment a downward step collides
//! - **Scoring**: each cleared row is worth double the previous one in the
//!   same lock (1, 3, 7, 15 for one to four rows)
//! - **Auto-reset**: a spawn that collides ends the game; the board and score
//!   are cleared and play continues with the new piece
//!
//! # Example
//!
//! ```
//! use autotris_core::GameState;
//! use autotris_types::GameAction;
//!
//! let mut game = GameState::with_seed(12345);
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::RotateCw);
//! game.apply_action(GameAction::HardDrop);
//!
//! // A single piece on an empty board clears nothing.
//! assert_eq!(game.score(), 0);
//! assert!(game.board().cells().iter().any(|&c| c != 0));
//! ```
//!
//! # Timing
//!
//! Call [`GameState::tick`](game_state::GameState::tick) with elapsed
//! milliseconds, or [`GameState::update`](game_state::GameState::update) with
//! a monotonic timestamp. A gravity step happens once the accumulated time
//! strictly exceeds the drop interval (1000ms by default).

pub mod board;
pub mod collision;
pub mod error;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod rotation;
pub mod scoring;
pub mod snapshot;

pub use autotris_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use collision::collides;
pub use error::{ShapeError, UnknownKindError};
pub use game_state::{GameConfig, GameOverEvent, GameState, LockEvent};
pub use pieces::{create_piece, PieceShape, Position};
pub use rng::PieceGenerator;
pub use rotation::rotate_with_kicks;
pub use scoring::line_clear_points;
pub use snapshot::GameSnapshot;
