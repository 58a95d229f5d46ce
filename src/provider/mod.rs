//! Transport provider for the orchestration service.
//!
//! Two read operations, one request each: fetch the current status record,
//! and fetch the next log chunk at a cursor. The provider owns no state and
//! performs no retries or caching; resilience lives in the tail view's
//! polling cadence, not in the transport.

mod http;
mod mock;

pub use http::HttpTransport;
pub use mock::ScriptedTransport;

use runtail_protocol::{Cursor, EntityRef, LogChunk, ProtocolError, StatusRecord};

/// Read interface against the orchestration service.
pub trait Transport: Send + Sync {
    /// Fetch the current status record for the entity.
    fn fetch_status(&self, entity: &EntityRef) -> Result<StatusRecord, TransportError>;

    /// Fetch the next log chunk starting at `cursor`.
    ///
    /// `None` means the start of the log. `limit` bounds the returned text;
    /// the server returns an unchanged cursor when there is nothing new past
    /// the given position.
    fn fetch_log_chunk(
        &self,
        entity: &EntityRef,
        cursor: Option<&Cursor>,
        limit: Option<usize>,
    ) -> Result<LogChunk, TransportError>;
}

/// Transport failures.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Non-success HTTP outcome.
    #[error("HTTP error: {status_text} ({status_code})")]
    Http {
        status_code: u16,
        status_text: String,
    },

    /// The request could not be performed at all.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),

    /// The response violated the chunk protocol contract.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}
