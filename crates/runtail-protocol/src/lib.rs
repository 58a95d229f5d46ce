//! Wire types for the orchestration service's run and step endpoints.
//!
//! Shared by any client that polls entity status or tails execution logs
//! through the cursor-based chunk protocol.

pub mod chunk;
pub mod entity;
pub mod error;
pub mod status;

pub use chunk::{Cursor, LogChunk};
pub use entity::EntityRef;
pub use error::ProtocolError;
pub use status::{Status, StatusRecord};

/// Response header carrying the cursor to resume the next chunk request from.
pub const CURSOR_HEADER: &str = "X-Orchestra-Cursor";

/// Query parameter carrying the request cursor.
pub const CURSOR_PARAM: &str = "cursor";

/// Query parameter bounding the size of a returned chunk.
pub const LIMIT_PARAM: &str = "limit";
