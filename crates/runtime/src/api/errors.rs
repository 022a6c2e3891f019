//! Unified error types surfaced by the session API.
//!
//! Wraps failures from worker coordination and wire framing so callers can
//! bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

pub use crate::protocol::ProtocolError;

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("store worker command channel closed")]
    CommandChannelClosed,

    #[error("store worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("event channel closed")]
    EventChannelClosed,

    #[error("worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("session requires an item catalog before building")]
    MissingCatalog,

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
