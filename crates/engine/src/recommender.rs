//! The recommendation seam.
//!
//! The orchestrator only needs `request(state) -> directive or failure`; how
//! the directive is produced (remote service, scripted test double) lives
//! behind [`Recommender`].

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::directive::{MoveDirective, RecommendationRequest};

/// Every way fetching a directive can fail. All of them are recovered by the
/// orchestrator as "no directive".
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("failed to connect to recommender at {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("recommender I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("recommender did not answer within {0:?}")]
    Timeout(Duration),
    #[error("recommender closed the connection without a reply")]
    Closed,
    #[error("malformed recommendation: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("recommendation exceeds {limit} bytes")]
    TooLong { limit: usize },
    #[error("directive out of range: {0:?}")]
    OutOfRange(MoveDirective),
    #[error("recommender unavailable: {0}")]
    Unavailable(String),
}

/// Source of move directives.
pub trait Recommender: Send + Sync {
    fn recommend(
        &self,
        request: RecommendationRequest,
    ) -> impl Future<Output = Result<MoveDirective, RecommendError>> + Send;
}

/// Always answers with the same directive. Handy for demos and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedRecommender(pub MoveDirective);

impl Recommender for FixedRecommender {
    async fn recommend(
        &self,
        _request: RecommendationRequest,
    ) -> Result<MoveDirective, RecommendError> {
        Ok(self.0)
    }
}
