//! Public session API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration, workers, or infrastructure.

pub mod client;
pub mod errors;
pub mod handle;

pub use client::ClientHandle;
pub use errors::{Result, SessionError};
pub use handle::HostHandle;
