use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncates a string by display width without splitting multi-byte
/// characters, appending an ellipsis when anything was cut.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(1);
        // Reserve room for the trailing "..."
        if current_width + char_width + 3 > max_width {
            break;
        }
        result.push(c);
        current_width += char_width;
    }

    result.push_str("...");
    result
}

/// Greedy word wrap for log cards; continuation lines are indented by two
/// spaces.
pub(crate) fn wrap_text(text: &str, width: usize) -> String {
    let mut wrapped = String::new();
    let mut line_length = 0;

    for word in text.split_whitespace() {
        if line_length + word.len() + 1 > width && line_length > 0 {
            wrapped.push('\n');
            wrapped.push_str("  ");
            wrapped.push_str(word);
            line_length = word.len() + 2;
        } else {
            if line_length > 0 {
                wrapped.push(' ');
                line_length += 1;
            }
            wrapped.push_str(word);
            line_length += word.len();
        }
    }
    wrapped
}
