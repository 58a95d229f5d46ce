//! Display-text derivation for capped rendering.
//!
//! The retained buffer and the rendered text are deliberately decoupled: the
//! buffer keeps every byte received (it drives the stop conditions), while
//! the rendered text is cut at the cap and never ends mid-line.

/// Marker shown while more of the log is still being fetched.
pub const LOADING_MARKER: &str = "[...] (Loading)";

/// Marker shown when the display cap cut the log short.
pub const TRUNCATED_MARKER: &str = "[...] (Truncated)";

/// Render the buffer cut at the cap, with the truncation marker.
pub(crate) fn truncated_text(buffer: &str, cap: usize) -> String {
    with_marker(trim_to_last_line(buffer, cap), TRUNCATED_MARKER)
}

/// Render the buffer with the loading marker, hiding any partial final line.
pub(crate) fn loading_text(buffer: &str, cap: usize) -> String {
    with_marker(trim_to_last_line(buffer, cap), LOADING_MARKER)
}

/// Cut `text` at `max_len` bytes, then back to the end of the last complete
/// line inside that window. The cut lands on a newline, so it can never split
/// a UTF-8 sequence. Returns the empty string when the window holds no
/// complete line.
fn trim_to_last_line(text: &str, max_len: usize) -> &str {
    let window = &text.as_bytes()[..text.len().min(max_len)];
    match window.iter().rposition(|&byte| byte == b'\n') {
        Some(position) => &text[..position],
        None => "",
    }
}

fn with_marker(body: &str, marker: &str) -> String {
    format!("{}\n\n{}", body, marker).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncated_cuts_at_line_boundary() {
        let buffer = "line1\nline2\nline3 with a tail";
        let rendered = truncated_text(buffer, 8);
        assert_eq!(rendered, "line1\n\n[...] (Truncated)");
    }

    #[test]
    fn test_loading_hides_partial_final_line() {
        let buffer = "line1\nline2\npartial";
        let rendered = loading_text(buffer, buffer.len());
        assert_eq!(rendered, "line1\nline2\n\n[...] (Loading)");
    }

    #[test]
    fn test_no_complete_line_renders_marker_only() {
        assert_eq!(truncated_text("no newline here", 10), TRUNCATED_MARKER);
        assert_eq!(loading_text("", 100), LOADING_MARKER);
    }

    #[test]
    fn test_cap_inside_multibyte_sequence_is_safe() {
        // 'é' is two bytes; a cap of 8 lands inside the second word's 'é'.
        let buffer = "été\nlété";
        assert!(!buffer.is_char_boundary(8));
        let rendered = truncated_text(buffer, 8);
        assert_eq!(rendered, "été\n\n[...] (Truncated)");
    }

    #[test]
    fn test_cap_larger_than_buffer() {
        let rendered = loading_text("line1\n", 1_000_000);
        assert_eq!(rendered, "line1\n\n[...] (Loading)");
    }

    #[test]
    fn test_leading_whitespace_is_trimmed_with_marker() {
        let rendered = truncated_text("\n\nline\nrest", 7);
        assert_eq!(rendered, "line\n\n[...] (Truncated)");
    }
}
