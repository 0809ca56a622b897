//! Autotris (workspace facade crate).
//!
//! Re-exports the workspace crates as `autotris::{core,engine,adapter,input,types}`
//! so binaries, tests and benches depend on a single package.

pub use autotris_adapter as adapter;
pub use autotris_core as core;
pub use autotris_engine as engine;
pub use autotris_input as input;
pub use autotris_types as types;
