// src/util.rs — Helpers for putting user-supplied text into log lines

/// Collapse `text` onto one line and cap it at `max_chars` characters,
/// marking a cut with an ellipsis.
///
/// Scenario prompts and coaching transcripts are multi-line; log lines
/// should not be.
pub fn log_preview(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match flat.char_indices().nth(max_chars) {
        None => flat,
        Some((cut, _)) => format!("{}…", flat[..cut].trim_end()),
    }
}
