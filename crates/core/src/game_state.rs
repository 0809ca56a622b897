//! Game state module - the per-session engine state machine
//!
//! Ties together the board, the active piece, collision, rotation and scoring.
//! A piece is `Falling` until a downward step collides; then it locks (merge,
//! sweep, score, spawn) in one synchronous step. If the freshly spawned piece
//! collides immediately the game is over: the final score is recorded, board
//! and score are cleared, and play continues with that same piece.
//!
//! Whenever an operation returns, the active piece does not overlap anything.

use tracing::{info, trace};

use crate::board::Board;
use crate::collision::collides;
use crate::pieces::{PieceShape, Position};
use crate::rng::PieceGenerator;
use crate::rotation::rotate_with_kicks;
use crate::scoring::line_clear_points;
use crate::snapshot::GameSnapshot;
use crate::types::*;

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub drop_interval_ms: u32,
    /// Fixed seed for the piece generator; random when `None`.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            drop_interval_ms: DEFAULT_DROP_INTERVAL_MS,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        use std::env;

        let drop_interval_ms = env::var("TETRIS_DROP_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_DROP_INTERVAL_MS);

        let seed = env::var("TETRIS_SEED").ok().and_then(|s| s.parse().ok());

        Self {
            drop_interval_ms,
            seed,
            ..Self::default()
        }
    }
}

/// Emitted every time a piece locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockEvent {
    pub rows_cleared: u32,
    pub points: u32,
}

/// Emitted when a spawn collides, before the board is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverEvent {
    pub final_score: u32,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    kind: PieceKind,
    piece: PieceShape,
    position: Position,
    score: u32,
    game_over: bool,
    drop_counter_ms: u64,
    drop_interval_ms: u32,
    last_time_ms: u64,
    generator: PieceGenerator,
    /// Last lock event (consumed by observers).
    last_event: Option<LockEvent>,
    /// Last game over (consumed by observers).
    last_game_over: Option<GameOverEvent>,
    games_played: u32,
}

impl GameState {
    /// Create a session and spawn its first piece.
    ///
    /// Boards smaller than the largest piece are widened/heightened to fit it.
    pub fn new(config: GameConfig) -> Self {
        let generator = match config.seed {
            Some(seed) => PieceGenerator::new(seed),
            None => PieceGenerator::from_entropy(),
        };
        let width = config.width.max(MAX_PIECE_SIZE);
        let height = config.height.max(MAX_PIECE_SIZE);

        let mut state = Self {
            board: Board::new(width, height),
            kind: PieceKind::T,
            piece: PieceShape::of(PieceKind::T),
            position: Position::default(),
            score: 0,
            game_over: false,
            drop_counter_ms: 0,
            drop_interval_ms: config.drop_interval_ms,
            last_time_ms: 0,
            generator,
            last_event: None,
            last_game_over: None,
            games_played: 0,
        };
        state.reset();
        state
    }

    /// Default 10x20 session with a fixed seed
    pub fn with_seed(seed: u64) -> Self {
        Self::new(GameConfig {
            seed: Some(seed),
            ..GameConfig::default()
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access for scenario setup and editors.
    ///
    /// The caller is responsible for leaving the active piece collision-free.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn piece(&self) -> &PieceShape {
        &self.piece
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    pub fn seed(&self) -> u64 {
        self.generator.seed()
    }

    pub fn drop_counter_ms(&self) -> u64 {
        self.drop_counter_ms
    }

    pub fn drop_interval_ms(&self) -> u32 {
        self.drop_interval_ms
    }

    pub fn set_drop_interval_ms(&mut self, interval_ms: u32) {
        self.drop_interval_ms = interval_ms;
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    /// Take and clear the last game-over notification.
    pub fn take_game_over(&mut self) -> Option<GameOverEvent> {
        self.last_game_over.take()
    }

    /// Pull-based view for renderers and recommendation requests.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.to_rows(),
            piece: self.piece.to_rows(),
            kind: self.kind,
            position: self.position,
            score: self.score,
            game_over: self.game_over,
            games_played: self.games_played,
        }
    }

    /// Spawn a uniformly random piece.
    ///
    /// Returns false if the spawn ended a game (board and score were reset).
    pub fn reset(&mut self) -> bool {
        let kind = self.generator.draw();
        self.spawn(kind)
    }

    /// Spawn `kind` centered at the top row.
    ///
    /// Returns false if the spawn ended a game (board and score were reset).
    pub fn spawn(&mut self, kind: PieceKind) -> bool {
        self.kind = kind;
        self.piece = PieceShape::of(kind);
        let spare = self.board.width() as i32 - self.piece.size() as i32;
        self.position = Position::new(spare.div_euclid(2), 0);

        if !collides(&self.board, &self.piece, self.position) {
            return true;
        }

        self.game_over = true;
        let event = GameOverEvent {
            final_score: self.score,
        };
        self.games_played = self.games_played.wrapping_add(1);
        info!(
            final_score = event.final_score,
            games_played = self.games_played,
            "game over"
        );
        self.last_game_over = Some(event);

        self.board.clear();
        self.score = 0;
        self.game_over = false;
        false
    }

    /// Start over: empty board, zero score, fresh random piece.
    pub fn restart(&mut self) {
        self.game_over = false;
        self.drop_counter_ms = 0;
        self.score = 0;
        self.board.clear();
        self.reset();
    }

    /// Shift the piece horizontally by `dx`; reverts and returns false on collision.
    pub fn try_move(&mut self, dx: i32) -> bool {
        self.position.x += dx;
        if collides(&self.board, &self.piece, self.position) {
            self.position.x -= dx;
            return false;
        }
        true
    }

    /// Rotate with wall kicks; on failure shape and position are untouched.
    pub fn rotate(&mut self, clockwise: bool) -> bool {
        rotate_with_kicks(&self.board, &mut self.piece, &mut self.position, clockwise)
    }

    /// One gravity step. Locks the piece if it cannot descend.
    ///
    /// Returns true if the piece moved down, false if it locked.
    pub fn drop(&mut self) -> bool {
        self.position.y += 1;
        let moved = if collides(&self.board, &self.piece, self.position) {
            self.position.y -= 1;
            self.lock_piece();
            false
        } else {
            true
        };
        self.drop_counter_ms = 0;
        moved
    }

    /// Same effect as a gravity step, used to accelerate descent.
    pub fn soft_drop(&mut self) -> bool {
        let moved = self.drop();
        self.drop_counter_ms = 0;
        moved
    }

    /// Drop to the lowest collision-free row and lock. Returns rows travelled.
    pub fn hard_drop(&mut self) -> u32 {
        let start_y = self.position.y;
        while !collides(&self.board, &self.piece, self.position) {
            self.position.y += 1;
        }
        self.position.y -= 1;
        let distance = (self.position.y - start_y).max(0) as u32;

        self.lock_piece();
        self.drop_counter_ms = 0;
        distance
    }

    /// Merge, sweep, score, spawn.
    fn lock_piece(&mut self) {
        self.board.merge(&self.piece, self.position);

        let rows_cleared = self.board.sweep_full_rows();
        let points = line_clear_points(rows_cleared);
        self.score = self.score.saturating_add(points);

        trace!(
            kind = ?self.kind,
            x = self.position.x,
            y = self.position.y,
            rows_cleared,
            points,
            "piece locked"
        );
        self.last_event = Some(LockEvent {
            rows_cleared: rows_cleared as u32,
            points,
        });

        self.reset();
    }

    /// Gravity clock: accumulate `elapsed_ms` and drop once the interval is exceeded.
    ///
    /// Returns true if a gravity step happened.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        self.drop_counter_ms = self.drop_counter_ms.saturating_add(u64::from(elapsed_ms));
        if self.drop_counter_ms > u64::from(self.drop_interval_ms) && !self.game_over {
            self.drop();
            return true;
        }
        false
    }

    /// Feed a monotonically increasing timestamp (ms); the delta since the
    /// previous call (initially since 0) advances the gravity clock.
    pub fn update(&mut self, now_ms: u64) -> bool {
        let elapsed = now_ms.saturating_sub(self.last_time_ms);
        self.last_time_ms = now_ms;
        self.tick(u32::try_from(elapsed).unwrap_or(u32::MAX))
    }

    /// Apply a game action
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.try_move(-1),
            GameAction::MoveRight => self.try_move(1),
            GameAction::SoftDrop => {
                self.soft_drop();
                true
            }
            GameAction::HardDrop => {
                self.hard_drop();
                true
            }
            GameAction::RotateCw => self.rotate(true),
            GameAction::RotateCcw => self.rotate(false),
            GameAction::Restart => {
                self.restart();
                true
            }
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
