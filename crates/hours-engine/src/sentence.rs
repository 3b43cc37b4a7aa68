//! Locating the hours sentence inside a longer venue description.

/// The marker that introduces an hours sentence, e.g. `"Open Mon-Fri 8am-5pm."`.
pub const DEFAULT_OPEN_MARKER: &str = "Open ";

/// Return the text after `marker` in the description's last sentence, or
/// `None` if the last sentence does not start with `marker`.
///
/// Sentences end at a period followed by whitespace, so the period in
/// `9.30pm` or inside `I.e` does not split a sentence.
pub fn extract_time_sentence(description: &str, marker: &str) -> Option<String> {
    let trimmed = description.trim();
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
    last_sentence(trimmed)
        .trim()
        .strip_prefix(marker)
        .map(str::to_string)
}

fn last_sentence(text: &str) -> &str {
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c == '.' && chars.peek().is_some_and(|&(_, next)| next.is_whitespace()) {
            start = i + 1;
        }
    }
    &text[start..]
}
