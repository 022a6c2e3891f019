//! Worker tasks that back the session orchestration.
//!
//! The store worker serializes every mutation of the authoritative contents,
//! while the release worker offloads the paced re-materialization of
//! withdrawn records.

mod release;
mod store;

pub use release::{ReleaseBatch, ReleaseWorker};
pub use store::{Command, HoldView, RoundOutcome, StoreWorker};
