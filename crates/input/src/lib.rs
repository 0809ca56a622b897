//! Terminal input module.
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`]s and the few
//! session-level commands (autoplay toggle, quit). Whether an action is then
//! allowed through is the session's manual input policy, not this crate's.

pub mod map;

pub use autotris_types as types;

pub use map::{handle_key_event, is_autoplay_toggle, map_key, should_quit, KeyCommand};
