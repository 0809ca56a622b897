//! Timed replay of directive steps.
//!
//! A directive becomes a [`StepQueue`] of `(action, delay)` pairs, produced
//! lazily as the queue is drained. The queue is drained against a [`Clock`]: [`TokioClock`] sleeps for real (or paused
//! test time), [`ImmediateClock`] only yields, so a whole directive can be
//! replayed deterministically inside `tokio_test::block_on`.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::directive::MoveDirective;
use crate::types::GameAction;

/// Source of delays.
pub trait Clock: Send + Sync {
    fn sleep(&self, delay: Duration) -> impl Future<Output = ()> + Send;
}

/// Real timer backed by `tokio::time`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn sleep(&self, delay: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(delay)
    }
}

/// Zero-delay clock; only yields to the scheduler.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateClock;

impl Clock for ImmediateClock {
    fn sleep(&self, _delay: Duration) -> impl Future<Output = ()> + Send {
        tokio::task::yield_now()
    }
}

/// One replayed step: wait `delay`, then apply `action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledStep {
    pub action: GameAction,
    pub delay: Duration,
}

/// Cancels the queue it was taken from, from any task.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Ordered, cancellable sequence of timed steps.
pub struct StepQueue {
    steps: Box<dyn Iterator<Item = ScheduledStep> + Send>,
    remaining: usize,
    cancel: CancelHandle,
}

impl fmt::Debug for StepQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepQueue")
            .field("remaining", &self.remaining)
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl Default for StepQueue {
    fn default() -> Self {
        Self::from_steps(Vec::new())
    }
}

impl StepQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_steps<I>(steps: I) -> Self
    where
        I: IntoIterator<Item = ScheduledStep>,
        I::IntoIter: ExactSizeIterator + Send + 'static,
    {
        let steps = steps.into_iter();
        Self {
            remaining: steps.len(),
            steps: Box::new(steps),
            cancel: CancelHandle::default(),
        }
    }

    /// Every step of `directive`, each preceded by `delay`. Steps are
    /// expanded one at a time, never up front.
    pub fn from_directive(directive: &MoveDirective, delay: Duration) -> Self {
        Self {
            remaining: directive.step_count(),
            steps: Box::new(
                directive
                    .actions()
                    .map(move |action| ScheduledStep { action, delay }),
            ),
            cancel: CancelHandle::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.remaining
    }

    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Drop every pending step. Steps already applied stay applied.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Next pending step, or `None` once drained or cancelled.
    pub fn next_step(&mut self) -> Option<ScheduledStep> {
        if self.is_cancelled() {
            return None;
        }
        let step = self.steps.next()?;
        self.remaining = self.remaining.saturating_sub(1);
        Some(step)
    }

    /// Drain the queue: sleep, then `apply`, for each step. A cancel that
    /// lands during a sleep suppresses that step. Returns steps applied.
    pub async fn run<C: Clock>(mut self, clock: &C, mut apply: impl FnMut(GameAction)) -> usize {
        let mut applied = 0;
        while let Some(step) = self.next_step() {
            clock.sleep(step.delay).await;
            if self.is_cancelled() {
                break;
            }
            apply(step.action);
            applied += 1;
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directive() -> MoveDirective {
        MoveDirective {
            rotate: 2,
            shift: 1,
            soft_drop: false,
            drop: true,
        }
    }

    #[test]
    fn from_directive_uses_uniform_delay() {
        let mut queue = StepQueue::from_directive(&directive(), Duration::from_millis(100));
        assert_eq!(queue.len(), 4);
        let mut delays = Vec::new();
        while let Some(step) = queue.next_step() {
            delays.push(step.delay);
        }
        assert_eq!(delays, vec![Duration::from_millis(100); 4]);
        assert!(queue.is_empty());
    }

    #[test]
    fn huge_directive_is_expanded_lazily() {
        let huge = MoveDirective {
            rotate: u32::MAX,
            shift: i32::MIN,
            soft_drop: true,
            drop: true,
        };
        let mut queue = StepQueue::from_directive(&huge, Duration::ZERO);
        assert_eq!(queue.len(), huge.step_count());

        let first = queue.next_step().map(|s| s.action);
        assert_eq!(first, Some(GameAction::RotateCw));
        assert_eq!(queue.len(), huge.step_count() - 1);
    }

    #[test]
    fn from_steps_keeps_order() {
        let steps = vec![
            ScheduledStep {
                action: GameAction::MoveLeft,
                delay: Duration::ZERO,
            },
            ScheduledStep {
                action: GameAction::HardDrop,
                delay: Duration::from_millis(5),
            },
        ];
        let mut queue = StepQueue::from_steps(steps.clone());
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.next_step(), Some(steps[0]));
        assert_eq!(queue.next_step(), Some(steps[1]));
        assert_eq!(queue.next_step(), None);
        assert!(StepQueue::new().is_empty());
    }

    #[test]
    fn immediate_clock_drains_in_order() {
        let queue = StepQueue::from_directive(&directive(), Duration::from_millis(100));
        let mut seen = Vec::new();
        let applied = tokio_test::block_on(queue.run(&ImmediateClock, |a| seen.push(a)));
        assert_eq!(applied, 4);
        assert_eq!(
            seen,
            vec![
                GameAction::RotateCw,
                GameAction::RotateCw,
                GameAction::MoveRight,
                GameAction::HardDrop
            ]
        );
    }

    #[test]
    fn cancelled_queue_yields_nothing() {
        let mut queue = StepQueue::from_directive(&directive(), Duration::ZERO);
        queue.cancel_handle().cancel();
        assert!(queue.is_cancelled());
        assert_eq!(queue.next_step(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_clock_paces_steps() {
        let queue = StepQueue::from_directive(&directive(), Duration::from_millis(100));
        let start = tokio::time::Instant::now();
        let applied = queue.run(&TokioClock, |_| {}).await;
        assert_eq!(applied, 4);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(400), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(450), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_mid_replay_stops_remaining_steps() {
        let queue = StepQueue::from_directive(&directive(), Duration::from_millis(100));
        let handle = queue.cancel_handle();
        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            handle.cancel();
        });

        let applied = queue.run(&TokioClock, |_| {}).await;
        assert_eq!(applied, 1);
        canceller.await.unwrap();
    }
}
