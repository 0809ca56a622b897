//! Adapter module - remote move recommendations over TCP
//!
//! Connects the autoplay orchestrator to an external recommendation service.
//! The service decides moves; this crate only carries requests and answers.
//!
//! # Protocol
//!
//! A **line-delimited JSON** exchange, one connection per request:
//!
//! 1. **Connect** to the service (default: 127.0.0.1:7070)
//! 2. **Request**: one line with the current board, piece, position and score
//! 3. **Reply**: one line with the directive; missing fields default to 0/false.
//!    Replies longer than 64 KiB are refused.
//!
//! This is raw JSON over the socket, not HTTP. A recommender that only
//! accepts `POST` requests needs a small bridge in front of it.
//!
//! ```text
//! Client -> Service: {"board":[[0,0,...],...],"piece":[[0,1,0],[1,1,1],[0,0,0]],"position":{"x":3,"y":0},"score":0}
//! Service -> Client: {"rotate":1,"move":-2,"soft_drop":false,"drop":true}
//! ```
//!
//! # Environment Variables
//!
//! - `TETRIS_AI_HOST`: Service address (default: "127.0.0.1")
//! - `TETRIS_AI_PORT`: Port number (default: 7070)
//! - `TETRIS_AI_TIMEOUT_MS`: Upper bound for one exchange (default: 2000)
//! - `TETRIS_AI_DISABLED`: Set to "1" or "true" to run without autoplay
//!
//! # Failure Handling
//!
//! Connect failures, I/O errors, timeouts, a hang-up before the reply,
//! oversized and undecodable replies all surface as
//! [`RecommendError`](autotris_engine::RecommendError). The orchestrator logs
//! them and treats the cycle as "no directive".
//!
//! # Testing
//!
//! A stand-in service can be as small as netcat:
//!
//! ```bash
//! while true; do echo '{"move":-1,"drop":true}' | nc -l 127.0.0.1 7070; done
//! ```

pub mod client;

pub use autotris_core as core;
pub use autotris_engine as engine;
pub use autotris_engine::types;

pub use client::{RecommenderConfig, TcpRecommender, DEFAULT_PORT, MAX_REPLY_BYTES};
