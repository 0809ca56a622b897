//! Shared session state.
//!
//! A [`SharedSession`] owns one [`GameState`] plus its autoplay bookkeeping
//! behind a single mutex, so every engine operation (manual input, gravity,
//! replayed directive steps) is atomic with respect to the others. Guards are
//! never held across an `.await`.
//!
//! The autoplay lock is not a separate flag: a cycle is in progress exactly
//! when the phase is not [`AutoplayPhase::Idle`].

use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::watch;
use tracing::debug;

use crate::core::{GameSnapshot, GameState};
use crate::types::GameAction;

/// Where the autoplay cycle currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AutoplayPhase {
    #[default]
    Idle,
    /// Awaiting the external recommendation ("thinking").
    WaitingForDirective,
    /// Replaying a directive step by step.
    ApplyingSteps,
}

/// What observers see on the status channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoplayStatus {
    pub enabled: bool,
    pub phase: AutoplayPhase,
}

impl AutoplayStatus {
    pub fn thinking(&self) -> bool {
        self.phase == AutoplayPhase::WaitingForDirective
    }

    pub fn busy(&self) -> bool {
        self.phase != AutoplayPhase::Idle
    }
}

/// Why a cycle did not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Disabled,
    GameOver,
    Busy,
}

/// Why a manual action was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputRejected {
    #[error("manual input is disabled while autoplay is enabled")]
    AutoplayEnabled,
    #[error("the game is over")]
    GameOver,
}

/// A game plus its autoplay state.
#[derive(Debug)]
pub struct Session {
    pub game: GameState,
    pub autoplay: AutoplayStatus,
}

impl Session {
    pub fn new(game: GameState) -> Self {
        Self {
            game,
            autoplay: AutoplayStatus::default(),
        }
    }
}

/// Cheaply clonable handle to one live session.
#[derive(Debug, Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<Session>>,
    status: Arc<watch::Sender<AutoplayStatus>>,
}

impl SharedSession {
    pub fn new(game: GameState) -> Self {
        let (status, _) = watch::channel(AutoplayStatus::default());
        Self {
            inner: Arc::new(Mutex::new(Session::new(game))),
            status: Arc::new(status),
        }
    }

    /// Run `f` against the game under the session lock.
    pub fn with_game<R>(&self, f: impl FnOnce(&mut GameState) -> R) -> R {
        let mut session = self.inner.lock();
        f(&mut session.game)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.inner.lock().game.snapshot()
    }

    pub fn score(&self) -> u32 {
        self.inner.lock().game.score()
    }

    pub fn status(&self) -> AutoplayStatus {
        self.inner.lock().autoplay
    }

    /// Status updates, starting from the current value.
    pub fn subscribe(&self) -> watch::Receiver<AutoplayStatus> {
        self.status.subscribe()
    }

    pub fn autoplay_enabled(&self) -> bool {
        self.inner.lock().autoplay.enabled
    }

    pub fn set_autoplay(&self, enabled: bool) -> AutoplayStatus {
        let mut session = self.inner.lock();
        session.autoplay.enabled = enabled;
        self.publish(session.autoplay)
    }

    /// Flip autoplay and return the new status.
    pub fn toggle_autoplay(&self) -> AutoplayStatus {
        let mut session = self.inner.lock();
        session.autoplay.enabled = !session.autoplay.enabled;
        debug!(enabled = session.autoplay.enabled, "autoplay toggled");
        self.publish(session.autoplay)
    }

    /// True when a new cycle may start right now.
    pub fn ready_for_cycle(&self) -> bool {
        let session = self.inner.lock();
        session.autoplay.enabled && !session.autoplay.busy() && !session.game.game_over()
    }

    /// True when a finished cycle should be followed by another one.
    pub fn should_continue(&self) -> bool {
        let session = self.inner.lock();
        session.autoplay.enabled && !session.game.game_over()
    }

    /// Apply a player action, honoring the manual input policy: nothing goes
    /// through while autoplay is enabled, and only `Restart` while the game
    /// is over.
    pub fn apply_manual(&self, action: GameAction) -> Result<bool, InputRejected> {
        let mut session = self.inner.lock();
        if session.autoplay.enabled {
            return Err(InputRejected::AutoplayEnabled);
        }
        if session.game.game_over() && action != GameAction::Restart {
            return Err(InputRejected::GameOver);
        }
        Ok(session.game.apply_action(action))
    }

    /// Advance the gravity clock to `now_ms`.
    pub fn update(&self, now_ms: u64) -> bool {
        self.inner.lock().game.update(now_ms)
    }

    /// Atomically check the cycle preconditions and take the autoplay lock.
    pub(crate) fn begin_cycle(&self) -> Result<CycleGuard, SkipReason> {
        let mut session = self.inner.lock();
        if !session.autoplay.enabled {
            return Err(SkipReason::Disabled);
        }
        if session.game.game_over() {
            return Err(SkipReason::GameOver);
        }
        if session.autoplay.busy() {
            return Err(SkipReason::Busy);
        }
        session.autoplay.phase = AutoplayPhase::WaitingForDirective;
        self.publish(session.autoplay);
        Ok(CycleGuard {
            session: self.clone(),
        })
    }

    fn set_phase(&self, phase: AutoplayPhase) {
        let mut session = self.inner.lock();
        session.autoplay.phase = phase;
        self.publish(session.autoplay);
    }

    fn publish(&self, status: AutoplayStatus) -> AutoplayStatus {
        self.status.send_replace(status);
        status
    }
}

/// Holds the autoplay lock; dropping it returns the phase to `Idle` on every
/// exit path, including early returns and cancelled futures.
#[derive(Debug)]
pub(crate) struct CycleGuard {
    session: SharedSession,
}

impl CycleGuard {
    pub(crate) fn advance(&self, phase: AutoplayPhase) {
        self.session.set_phase(phase);
    }
}

impl Drop for CycleGuard {
    fn drop(&mut self) {
        self.session.set_phase(AutoplayPhase::Idle);
    }
}
