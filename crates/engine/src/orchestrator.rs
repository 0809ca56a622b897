//! Move orchestrator - replays recommended directives against a live session
//!
//! One cycle:
//!
//! 1. Skip unless autoplay is enabled, the game is live and no cycle is in
//!    progress. The check and the lock acquisition are one atomic step.
//! 2. Enter `WaitingForDirective` (observers see "thinking").
//! 3. Ask the [`Recommender`] with a snapshot of board, piece, position and score.
//!    Directives that do not fit the board count as failures.
//! 4. If a directive arrived and autoplay is still enabled, enter
//!    `ApplyingSteps` and replay it through a [`StepQueue`], one delay before
//!    every single step.
//! 5. Return to `Idle`, on every exit path.
//!
//! [`Orchestrator::run`] repeats cycles with a pause in between for as long
//! as autoplay stays enabled and the game is live.
//!
//! Turning autoplay off while steps are being replayed does not stop them;
//! the current directive finishes and no further cycle is started. Only
//! [`Orchestrator::shutdown`] cancels pending steps.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::directive::RecommendationRequest;
use crate::recommender::{RecommendError, Recommender};
use crate::schedule::{CancelHandle, Clock, StepQueue, TokioClock};
use crate::session::{AutoplayPhase, SharedSession, SkipReason};
use crate::types::{AUTOPLAY_CYCLE_DELAY_MS, AUTOPLAY_STEP_DELAY_MS};

/// Autoplay pacing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoplayConfig {
    /// Pause before every replayed step.
    pub step_delay: Duration,
    /// Pause between two cycles.
    pub cycle_delay: Duration,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            step_delay: Duration::from_millis(AUTOPLAY_STEP_DELAY_MS),
            cycle_delay: Duration::from_millis(AUTOPLAY_CYCLE_DELAY_MS),
        }
    }
}

impl AutoplayConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        use std::env;

        let step_ms = env::var("TETRIS_AI_STEP_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(AUTOPLAY_STEP_DELAY_MS);
        let cycle_ms = env::var("TETRIS_AI_CYCLE_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(AUTOPLAY_CYCLE_DELAY_MS);

        Self {
            step_delay: Duration::from_millis(step_ms),
            cycle_delay: Duration::from_millis(cycle_ms),
        }
    }
}

/// How a single cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Preconditions failed; nothing happened.
    Skipped(SkipReason),
    /// The recommender failed.
    NoDirective,
    /// Autoplay was turned off while waiting; the directive was dropped.
    Discarded,
    /// The directive was replayed; `steps` counts the steps applied.
    Applied { steps: usize },
}

/// Drives autoplay for one session.
pub struct Orchestrator<R, C = TokioClock> {
    session: SharedSession,
    recommender: Arc<R>,
    clock: Arc<C>,
    config: AutoplayConfig,
    in_flight: Arc<Mutex<Option<CancelHandle>>>,
}

impl<R, C> Clone for Orchestrator<R, C> {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
            recommender: Arc::clone(&self.recommender),
            clock: Arc::clone(&self.clock),
            config: self.config,
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<R: Recommender> Orchestrator<R, TokioClock> {
    pub fn new(session: SharedSession, recommender: R, config: AutoplayConfig) -> Self {
        Self::with_clock(session, recommender, TokioClock, config)
    }
}

impl<R: Recommender, C: Clock> Orchestrator<R, C> {
    pub fn with_clock(session: SharedSession, recommender: R, clock: C, config: AutoplayConfig) -> Self {
        Self {
            session,
            recommender: Arc::new(recommender),
            clock: Arc::new(clock),
            config,
            in_flight: Arc::new(Mutex::new(None)),
        }
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    pub fn config(&self) -> AutoplayConfig {
        self.config
    }

    /// Run one request-and-replay cycle.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let guard = match self.session.begin_cycle() {
            Ok(guard) => guard,
            Err(reason) => {
                debug!(?reason, "autoplay cycle skipped");
                return CycleOutcome::Skipped(reason);
            }
        };

        let snapshot = self.session.snapshot();
        let board_width = snapshot.board.first().map_or(0, Vec::len);
        let request = RecommendationRequest::from(snapshot);
        let started = Instant::now();
        let result = self.recommender.recommend(request).await.and_then(|directive| {
            if directive.is_within(board_width) {
                Ok(directive)
            } else {
                Err(RecommendError::OutOfRange(directive))
            }
        });
        debug!(
            latency_ms = started.elapsed().as_secs_f64() * 1000.0,
            ok = result.is_ok(),
            "recommendation finished"
        );

        let directive = match result {
            Ok(directive) => directive,
            Err(err) => {
                warn!(error = %err, "recommendation failed");
                return CycleOutcome::NoDirective;
            }
        };

        // Installed before the re-check so a concurrent shutdown either
        // disables autoplay first or finds the handle.
        let queue = StepQueue::from_directive(&directive, self.config.step_delay);
        *self.in_flight.lock() = Some(queue.cancel_handle());

        if !self.session.autoplay_enabled() {
            self.in_flight.lock().take();
            debug!("autoplay disabled while waiting; directive discarded");
            return CycleOutcome::Discarded;
        }

        guard.advance(AutoplayPhase::ApplyingSteps);

        let session = &self.session;
        let steps = queue
            .run(&*self.clock, |action| {
                session.with_game(|game| game.apply_action(action));
            })
            .await;

        self.in_flight.lock().take();
        debug!(steps, ?directive, "directive applied");
        drop(guard);

        CycleOutcome::Applied { steps }
    }

    /// Run cycles until one is skipped or autoplay stops.
    ///
    /// Returns the outcome of the last cycle.
    pub async fn run(&self) -> CycleOutcome {
        loop {
            let outcome = self.run_cycle().await;
            if matches!(outcome, CycleOutcome::Skipped(_)) || !self.session.should_continue() {
                return outcome;
            }
            self.clock.sleep(self.config.cycle_delay).await;
        }
    }

    /// Flip autoplay. When it turns on with an idle, live session, the cycle
    /// loop is started and its handle returned.
    pub fn toggle_autoplay(&self) -> Option<JoinHandle<CycleOutcome>>
    where
        R: 'static,
        C: 'static,
    {
        let status = self.session.toggle_autoplay();
        if status.enabled && self.session.ready_for_cycle() {
            return Some(self.spawn());
        }
        None
    }

    /// Restart the game; with autoplay on and idle, kick off the cycle loop.
    pub fn restart(&self) -> Option<JoinHandle<CycleOutcome>>
    where
        R: 'static,
        C: 'static,
    {
        self.session.with_game(|game| game.restart());
        if self.session.ready_for_cycle() {
            return Some(self.spawn());
        }
        None
    }

    /// Run [`Orchestrator::run`] on the tokio runtime.
    pub fn spawn(&self) -> JoinHandle<CycleOutcome>
    where
        R: 'static,
        C: 'static,
    {
        let this = self.clone();
        tokio::spawn(async move { this.run().await })
    }

    /// Disable autoplay and cancel any steps still waiting to be replayed.
    pub fn shutdown(&self) {
        self.session.set_autoplay(false);
        if let Some(handle) = self.in_flight.lock().take() {
            handle.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::Notify;

    use crate::core::GameState;
    use crate::directive::MoveDirective;
    use crate::recommender::FixedRecommender;
    use crate::schedule::ImmediateClock;
    use crate::types::PieceKind;

    struct GatedRecommender {
        gate: Arc<Notify>,
        calls: Arc<AtomicUsize>,
        directive: MoveDirective,
    }

    impl Recommender for GatedRecommender {
        async fn recommend(
            &self,
            _request: RecommendationRequest,
        ) -> Result<MoveDirective, RecommendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.gate.notified().await;
            Ok(self.directive)
        }
    }

    struct FailingRecommender;

    impl Recommender for FailingRecommender {
        async fn recommend(
            &self,
            _request: RecommendationRequest,
        ) -> Result<MoveDirective, RecommendError> {
            Err(RecommendError::Unavailable("offline".to_string()))
        }
    }

    fn session_with(kind: PieceKind) -> SharedSession {
        let mut game = GameState::with_seed(42);
        game.spawn(kind);
        let session = SharedSession::new(game);
        session.set_autoplay(true);
        session
    }

    fn shift_right(n: i32) -> MoveDirective {
        MoveDirective {
            shift: n,
            ..MoveDirective::default()
        }
    }

    #[test]
    fn replay_with_immediate_clock() {
        let session = session_with(PieceKind::O);
        let directive = MoveDirective {
            rotate: 1,
            shift: -4,
            soft_drop: false,
            drop: true,
        };
        let orchestrator = Orchestrator::with_clock(
            session.clone(),
            FixedRecommender(directive),
            ImmediateClock,
            AutoplayConfig::default(),
        );

        let outcome = tokio_test::block_on(orchestrator.run_cycle());

        assert_eq!(outcome, CycleOutcome::Applied { steps: 6 });
        let board = session.snapshot().board;
        assert_eq!(&board[18][..3], &[2, 2, 0]);
        assert_eq!(&board[19][..3], &[2, 2, 0]);
        assert!(!session.status().busy());
    }

    #[test]
    fn disabled_session_is_skipped() {
        let session = session_with(PieceKind::T);
        session.set_autoplay(false);
        let orchestrator = Orchestrator::with_clock(
            session.clone(),
            FixedRecommender(shift_right(1)),
            ImmediateClock,
            AutoplayConfig::default(),
        );
        let before = session.snapshot();

        let outcome = tokio_test::block_on(orchestrator.run_cycle());

        assert_eq!(outcome, CycleOutcome::Skipped(SkipReason::Disabled));
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn failure_releases_lock() {
        let session = session_with(PieceKind::T);
        let orchestrator = Orchestrator::with_clock(
            session.clone(),
            FailingRecommender,
            ImmediateClock,
            AutoplayConfig::default(),
        );

        assert_eq!(
            tokio_test::block_on(orchestrator.run_cycle()),
            CycleOutcome::NoDirective
        );
        assert_eq!(session.status().phase, AutoplayPhase::Idle);
        assert!(session.ready_for_cycle());
    }

    #[tokio::test(start_paused = true)]
    async fn second_cycle_is_noop_while_first_waits() {
        let session = session_with(PieceKind::T);
        let gate = Arc::new(Notify::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let orchestrator = Orchestrator::new(
            session.clone(),
            GatedRecommender {
                gate: Arc::clone(&gate),
                calls: Arc::clone(&calls),
                directive: shift_right(2),
            },
            AutoplayConfig::default(),
        );

        let first = {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move { orchestrator.run_cycle().await })
        };
        let mut status = session.subscribe();
        status.wait_for(|s| s.thinking()).await.unwrap();

        let x_before = session.snapshot().position.x;
        let second = orchestrator.run_cycle().await;
        assert_eq!(second, CycleOutcome::Skipped(SkipReason::Busy));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.snapshot().position.x, x_before);

        gate.notify_one();
        assert_eq!(first.await.unwrap(), CycleOutcome::Applied { steps: 2 });
        assert_eq!(session.snapshot().position.x, x_before + 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn directive_discarded_when_disabled_while_waiting() {
        let session = session_with(PieceKind::T);
        let gate = Arc::new(Notify::new());
        let orchestrator = Orchestrator::new(
            session.clone(),
            GatedRecommender {
                gate: Arc::clone(&gate),
                calls: Arc::new(AtomicUsize::new(0)),
                directive: shift_right(3),
            },
            AutoplayConfig::default(),
        );

        let cycle = {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move { orchestrator.run_cycle().await })
        };
        session.subscribe().wait_for(|s| s.thinking()).await.unwrap();
        let before = session.snapshot();

        session.toggle_autoplay();
        gate.notify_one();

        assert_eq!(cycle.await.unwrap(), CycleOutcome::Discarded);
        assert_eq!(session.snapshot(), before);
        assert!(!session.status().busy());
    }

    #[tokio::test(start_paused = true)]
    async fn toggling_off_mid_replay_finishes_directive() {
        let session = session_with(PieceKind::T);
        let orchestrator = Orchestrator::new(
            session.clone(),
            FixedRecommender(shift_right(3)),
            AutoplayConfig::default(),
        );
        let x_before = session.snapshot().position.x;

        let handle = orchestrator.spawn();
        session
            .subscribe()
            .wait_for(|s| s.phase == AutoplayPhase::ApplyingSteps)
            .await
            .unwrap();
        session.toggle_autoplay();

        assert_eq!(handle.await.unwrap(), CycleOutcome::Applied { steps: 3 });
        assert_eq!(session.snapshot().position.x, x_before + 3);
    }

    #[tokio::test(start_paused = true)]
    async fn steps_are_paced_by_step_delay() {
        let session = session_with(PieceKind::T);
        let orchestrator = Orchestrator::new(
            session.clone(),
            FixedRecommender(shift_right(2)),
            AutoplayConfig::default(),
        );
        let x_before = session.snapshot().position.x;

        let cycle = {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move { orchestrator.run_cycle().await })
        };

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(session.snapshot().position.x, x_before + 1);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(session.snapshot().position.x, x_before + 2);
        assert_eq!(cycle.await.unwrap(), CycleOutcome::Applied { steps: 2 });
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_pending_steps() {
        let session = session_with(PieceKind::T);
        let orchestrator = Orchestrator::new(
            session.clone(),
            FixedRecommender(shift_right(3)),
            AutoplayConfig::default(),
        );
        let x_before = session.snapshot().position.x;

        let handle = orchestrator.spawn();
        tokio::time::sleep(Duration::from_millis(150)).await;
        orchestrator.shutdown();

        assert_eq!(handle.await.unwrap(), CycleOutcome::Applied { steps: 1 });
        assert_eq!(session.snapshot().position.x, x_before + 1);
        assert!(!session.autoplay_enabled());
    }

    #[tokio::test(start_paused = true)]
    async fn run_loop_keeps_cycling_until_disabled() {
        let session = session_with(PieceKind::T);
        let orchestrator = Orchestrator::new(
            session.clone(),
            FixedRecommender(MoveDirective {
                drop: true,
                ..MoveDirective::default()
            }),
            AutoplayConfig::default(),
        );

        let handle = orchestrator.spawn();
        // Each cycle is one 100ms step followed by a 300ms pause.
        tokio::time::sleep(Duration::from_millis(850)).await;
        session.toggle_autoplay();

        let last = handle.await.unwrap();
        assert_eq!(last, CycleOutcome::Applied { steps: 1 });
        // Hard drops at 100, 500 and 900ms; the third was already in flight.
        let cells = session
            .snapshot()
            .board
            .iter()
            .flatten()
            .filter(|&&c| c != 0)
            .count();
        assert_eq!(cells, 3 * 4);
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_starts_loop_only_when_enabling() {
        let mut game = GameState::with_seed(3);
        game.spawn(PieceKind::O);
        let session = SharedSession::new(game);
        let gate = Arc::new(Notify::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let orchestrator = Orchestrator::new(
            session.clone(),
            GatedRecommender {
                gate: Arc::clone(&gate),
                calls: Arc::clone(&calls),
                directive: shift_right(1),
            },
            AutoplayConfig::default(),
        );
        let before = session.snapshot();

        let handle = orchestrator.toggle_autoplay().expect("enabling starts the loop");
        session.subscribe().wait_for(|s| s.thinking()).await.unwrap();
        assert!(orchestrator.toggle_autoplay().is_none());
        gate.notify_one();

        assert_eq!(handle.await.unwrap(), CycleOutcome::Discarded);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn oversized_directive_is_refused() {
        let session = session_with(PieceKind::T);
        let before = session.snapshot();
        let orchestrator = Orchestrator::with_clock(
            session.clone(),
            FixedRecommender(MoveDirective {
                rotate: u32::MAX,
                shift: i32::MIN,
                soft_drop: true,
                drop: true,
            }),
            ImmediateClock,
            AutoplayConfig::default(),
        );

        assert_eq!(
            tokio_test::block_on(orchestrator.run_cycle()),
            CycleOutcome::NoDirective
        );
        assert_eq!(session.snapshot(), before);
        assert!(session.ready_for_cycle());
        assert!(orchestrator.in_flight.lock().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_while_waiting_discards_directive() {
        let session = session_with(PieceKind::T);
        let gate = Arc::new(Notify::new());
        let orchestrator = Orchestrator::new(
            session.clone(),
            GatedRecommender {
                gate: Arc::clone(&gate),
                calls: Arc::new(AtomicUsize::new(0)),
                directive: shift_right(3),
            },
            AutoplayConfig::default(),
        );
        let before = session.snapshot();

        let cycle = {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move { orchestrator.run_cycle().await })
        };
        session.subscribe().wait_for(|s| s.thinking()).await.unwrap();
        orchestrator.shutdown();
        gate.notify_one();

        assert_eq!(cycle.await.unwrap(), CycleOutcome::Discarded);
        assert_eq!(session.snapshot(), before);
        assert!(orchestrator.in_flight.lock().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_clears_and_resumes_autoplay() {
        let session = session_with(PieceKind::T);
        session.with_game(|game| {
            game.board_mut().set(0, 19, 3);
        });
        session.set_autoplay(false);
        let orchestrator = Orchestrator::new(
            session.clone(),
            FixedRecommender(MoveDirective::default()),
            AutoplayConfig::default(),
        );

        assert!(orchestrator.restart().is_none());
        assert!(session.snapshot().board.iter().flatten().all(|&c| c == 0));

        session.set_autoplay(true);
        let handle = orchestrator.restart();
        assert!(handle.is_some());
        orchestrator.shutdown();
    }
}
