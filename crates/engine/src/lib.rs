//! Engine runtime - shared sessions, autoplay orchestration and gravity
//!
//! The core crate is synchronous and owns no clock. This crate wraps a
//! [`GameState`](autotris_core::GameState) for concurrent use and adds the
//! time-driven parts:
//!
//! - [`session`]: [`SharedSession`], the autoplay phase machine and the
//!   status channel observers subscribe to
//! - [`directive`]: recommendation request/response wire types
//! - [`recommender`]: the [`Recommender`] seam and its error type
//! - [`schedule`]: [`StepQueue`] replay over a [`Clock`]
//! - [`orchestrator`]: the request-and-replay cycle loop
//! - [`driver`]: the gravity ticker
//!
//! # Example
//!
//! ```
//! use autotris_core::GameState;
//! use autotris_engine::{
//!     AutoplayConfig, CycleOutcome, FixedRecommender, ImmediateClock, MoveDirective,
//!     Orchestrator, SharedSession,
//! };
//!
//! let session = SharedSession::new(GameState::with_seed(1));
//! session.set_autoplay(true);
//!
//! let directive = MoveDirective { drop: true, ..MoveDirective::default() };
//! let orchestrator = Orchestrator::with_clock(
//!     session.clone(),
//!     FixedRecommender(directive),
//!     ImmediateClock,
//!     AutoplayConfig::default(),
//! );
//!
//! let outcome = tokio_test::block_on(orchestrator.run_cycle());
//! assert_eq!(outcome, CycleOutcome::Applied { steps: 1 });
//! ```

pub mod directive;
pub mod driver;
pub mod orchestrator;
pub mod recommender;
pub mod schedule;
pub mod session;

pub use autotris_core as core;
pub use autotris_types as types;

pub use directive::{MoveDirective, RecommendationRequest, WirePosition, MAX_DIRECTIVE_ROTATIONS};
pub use driver::drive_gravity;
pub use orchestrator::{AutoplayConfig, CycleOutcome, Orchestrator};
pub use recommender::{FixedRecommender, RecommendError, Recommender};
pub use schedule::{CancelHandle, Clock, ImmediateClock, ScheduledStep, StepQueue, TokioClock};
pub use session::{
    AutoplayPhase, AutoplayStatus, InputRejected, Session, SharedSession, SkipReason,
};
