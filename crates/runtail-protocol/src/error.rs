//! Protocol violation errors.

use crate::CURSOR_HEADER;

/// Violations of the chunk protocol contract.
///
/// These are client-side guards, not confirmed server behavior: a well-behaved
/// server never triggers them.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// A chunk response arrived without the next-cursor header.
    #[error("log chunk response is missing the {} header", CURSOR_HEADER)]
    MissingCursor,

    /// The server returned new text without advancing the cursor.
    ///
    /// Re-fetching at the same cursor would return the same bytes forever.
    #[error("cursor {cursor:?} did not advance despite {bytes} new bytes")]
    StalledCursor {
        /// The cursor the server failed to move.
        cursor: String,
        /// Length of the text returned alongside it.
        bytes: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_cursor_names_the_header() {
        let message = ProtocolError::MissingCursor.to_string();
        assert!(message.contains(CURSOR_HEADER));
    }

    #[test]
    fn test_stalled_cursor_message() {
        let error = ProtocolError::StalledCursor {
            cursor: "pos-100".to_string(),
            bytes: 42,
        };
        let message = error.to_string();
        assert!(message.contains("pos-100"));
        assert!(message.contains("42"));
    }
}
