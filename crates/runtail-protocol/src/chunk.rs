//! Log chunk and cursor types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque read-position token issued by the server.
///
/// The client never interprets the value; it is threaded back into the next
/// chunk request unmodified. An unchanged cursor means the server had nothing
/// new past the previous read position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Wrap a server-issued cursor value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw cursor value, for transmission back to the server.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One bounded unit of log text plus the cursor to resume from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogChunk {
    /// UTF-8 log text. May be empty when the reader has caught up.
    pub text: String,
    /// Read position after this chunk.
    pub cursor: Cursor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_is_transparent_in_json() {
        let cursor = Cursor::new("pos-4096");
        assert_eq!(serde_json::to_string(&cursor).unwrap(), "\"pos-4096\"");

        let parsed: Cursor = serde_json::from_str("\"pos-8192\"").unwrap();
        assert_eq!(parsed.as_str(), "pos-8192");
    }

    #[test]
    fn test_cursor_equality() {
        assert_eq!(Cursor::new("a"), Cursor::new("a"));
        assert_ne!(Cursor::new("a"), Cursor::new("b"));
    }
}
