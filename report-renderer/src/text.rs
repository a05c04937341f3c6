//! Text fitting helpers.

/// Marker appended to truncated text.
pub const ELLIPSIS: char = '…';

/// Truncate `text` to at most `budget` characters, ending with an ellipsis
/// when shortened.
#[must_use]
pub fn truncate_chars(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }
    if budget == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(budget - 1).collect();
    out.push(ELLIPSIS);
    out
}

/// Greedy word wrap to lines of at most `max_chars` characters.
///
/// Explicit newlines start a new line. Words longer than a line are split.
#[must_use]
pub fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        let mut len = 0;
        for word in paragraph.split_whitespace() {
            let mut chars: Vec<char> = word.chars().collect();
            while chars.len() > max_chars {
                if len > 0 {
                    lines.push(std::mem::take(&mut line));
                    len = 0;
                }
                let rest = chars.split_off(max_chars);
                lines.push(chars.into_iter().collect());
                chars = rest;
            }
            let word_len = chars.len();
            if word_len == 0 {
                continue;
            }
            if len > 0 && len + 1 + word_len > max_chars {
                lines.push(std::mem::take(&mut line));
                len = 0;
            }
            if len > 0 {
                line.push(' ');
                len += 1;
            }
            line.extend(chars);
            len += word_len;
        }
        lines.push(line);
    }
    lines
}
