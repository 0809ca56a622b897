//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental vocabulary used throughout the workspace.
//! All types are plain data with no external dependencies, so they can be used
//! by the engine, the autoplay orchestrator, the recommendation transport and
//! input mapping alike.
//!
//! # Board Dimensions
//!
//! Default playfield dimensions (a session may be configured otherwise):
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 at the top)
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Gravity driver tick (~60 FPS) |
//! | `DEFAULT_DROP_INTERVAL_MS` | 1000 | Gravity: one row per second |
//! | `AUTOPLAY_STEP_DELAY_MS` | 100 | Pause before each replayed directive step |
//! | `AUTOPLAY_CYCLE_DELAY_MS` | 300 | Pause between autoplay cycles |
//!
//! # Examples
//!
//! ```
//! use autotris_types::{GameAction, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let piece = PieceKind::from_letter("t").unwrap();
//! assert_eq!(piece, PieceKind::T);
//! assert_eq!(piece.id(), 1);
//!
//! let action = GameAction::from_str("hardDrop").unwrap();
//! assert_eq!(action, GameAction::HardDrop);
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: usize = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: usize = 20;

/// Gravity driver tick in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Default gravity interval (1000ms = 1 second per row)
pub const DEFAULT_DROP_INTERVAL_MS: u32 = 1000;

/// Delay before every individual step of a replayed directive.
pub const AUTOPLAY_STEP_DELAY_MS: u64 = 100;

/// Delay between the end of one autoplay cycle and the start of the next.
pub const AUTOPLAY_CYCLE_DELAY_MS: u64 = 300;

/// Number of soft-drop pulses a directive's `soft_drop` flag expands into.
pub const SOFT_DROP_PULSES: usize = 5;

/// Largest bounding square of any catalog piece (the I piece is 4x4).
pub const MAX_PIECE_SIZE: usize = 4;

/// Letters the random piece generator draws from, uniformly.
pub const PIECE_ALPHABET: &str = "TOLZSJI";

/// A cell on the game board.
///
/// `0` is empty, `1..=7` is occupied by the piece kind with that id.
pub type Cell = u8;

/// Empty cell value.
pub const EMPTY: Cell = 0;

/// The seven tetromino piece kinds
///
/// The numeric id doubles as the cell value written to the board when a piece
/// of this kind locks, and therefore as its display color:
/// - **T** = 1, **O** = 2, **L** = 3, **J** = 4, **S** = 5, **Z** = 6, **I** = 7
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    T,
    O,
    L,
    J,
    S,
    Z,
    I,
}

impl PieceKind {
    /// All kinds in id order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::T,
        PieceKind::O,
        PieceKind::L,
        PieceKind::J,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::I,
    ];

    /// Parse piece kind from a single letter (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use autotris_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_letter("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_letter("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_letter("x"), None);
    /// assert_eq!(PieceKind::from_letter("TT"), None);
    /// ```
    pub fn from_letter(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Self::from_char(c)
    }

    /// Parse piece kind from a char (case-insensitive)
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'T' => Some(PieceKind::T),
            'O' => Some(PieceKind::O),
            'L' => Some(PieceKind::L),
            'J' => Some(PieceKind::J),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'I' => Some(PieceKind::I),
            _ => None,
        }
    }

    /// Uppercase letter for this kind
    pub fn letter(&self) -> char {
        match self {
            PieceKind::T => 'T',
            PieceKind::O => 'O',
            PieceKind::L => 'L',
            PieceKind::J => 'J',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::I => 'I',
        }
    }

    /// Cell value (and color id) written by this kind
    pub fn id(&self) -> Cell {
        match self {
            PieceKind::T => 1,
            PieceKind::O => 2,
            PieceKind::L => 3,
            PieceKind::J => 4,
            PieceKind::S => 5,
            PieceKind::Z => 6,
            PieceKind::I => 7,
        }
    }

    /// Inverse of [`PieceKind::id`]
    pub fn from_id(id: Cell) -> Option<Self> {
        Self::ALL.get(usize::from(id).checked_sub(1)?).copied()
    }
}

/// Game actions that can be applied to modify game state
///
/// These actions are used by both human input and the autoplay orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// One gravity step, resetting the drop timer
    SoftDrop,
    /// Drop to the lowest collision-free row and lock immediately
    HardDrop,
    /// Rotate piece 90° clockwise (with wall kicks)
    RotateCw,
    /// Rotate piece 90° counter-clockwise (with wall kicks)
    RotateCcw,
    /// Clear board and score and start over
    Restart,
}

impl GameAction {
    /// Parse action from its camelCase name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use autotris_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("rotatecw"), Some(GameAction::RotateCw));
    /// assert_eq!(GameAction::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "rotatecw" => Some(GameAction::RotateCw),
            "rotateccw" => Some(GameAction::RotateCcw),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    /// Convert to camelCase name
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::RotateCw => "rotateCw",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::Restart => "restart",
        }
    }

    /// Horizontal move in the direction of `sign` (`0` yields `None`)
    pub fn shift(sign: i32) -> Option<Self> {
        match sign.signum() {
            -1 => Some(GameAction::MoveLeft),
            1 => Some(GameAction::MoveRight),
            _ => None,
        }
    }
}
