//! TCP client for the recommendation service
//!
//! One connection per request: write the request as a single JSON line, read
//! a single JSON line back. The whole exchange is bounded by a timeout and
//! the reply by [`MAX_REPLY_BYTES`].

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::{timeout, Instant};
use tracing::{debug, trace};

use crate::engine::{MoveDirective, RecommendError, RecommendationRequest, Recommender};

/// Default service port.
pub const DEFAULT_PORT: u16 = 7070;

/// Longest reply line accepted, newline included.
pub const MAX_REPLY_BYTES: usize = 64 * 1024;

/// Recommender endpoint configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommenderConfig {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            timeout: Duration::from_millis(2000),
        }
    }
}

impl RecommenderConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        use std::env;

        let host = env::var("TETRIS_AI_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("TETRIS_AI_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let timeout_ms = env::var("TETRIS_AI_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(2000);

        Self {
            host,
            port,
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    /// Check if autoplay is disabled via environment
    pub fn is_disabled() -> bool {
        std::env::var("TETRIS_AI_DISABLED")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Line-delimited JSON recommender over TCP.
#[derive(Debug, Clone)]
pub struct TcpRecommender {
    config: RecommenderConfig,
}

impl TcpRecommender {
    pub fn new(config: RecommenderConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Self {
        Self::new(RecommenderConfig::from_env())
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    async fn exchange(&self, request: &RecommendationRequest) -> Result<MoveDirective, RecommendError> {
        let addr = self.config.addr();
        let stream = TcpStream::connect(&addr)
            .await
            .map_err(|source| RecommendError::Connect {
                addr: addr.clone(),
                source,
            })?;
        let (reader, mut writer) = stream.into_split();

        let mut buf = serde_json::to_vec(request)?;
        buf.push(b'\n');
        writer.write_all(&buf).await?;
        writer.flush().await?;

        let mut reader = BufReader::new(reader.take(MAX_REPLY_BYTES as u64));
        let mut line = String::new();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            return Err(RecommendError::Closed);
        }
        if bytes_read >= MAX_REPLY_BYTES && !line.ends_with('\n') {
            return Err(RecommendError::TooLong {
                limit: MAX_REPLY_BYTES,
            });
        }

        let raw = line.trim_end_matches(['\n', '\r']);
        trace!(%addr, response = raw, "recommendation received");
        Ok(serde_json::from_str(raw.trim())?)
    }
}

impl Recommender for TcpRecommender {
    async fn recommend(
        &self,
        request: RecommendationRequest,
    ) -> Result<MoveDirective, RecommendError> {
        let started = Instant::now();
        let result = match timeout(self.config.timeout, self.exchange(&request)).await {
            Ok(result) => result,
            Err(_) => Err(RecommendError::Timeout(self.config.timeout)),
        };
        debug!(
            addr = %self.config.addr(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "recommendation round trip"
        );
        result
    }
}
