//! Greedy word wrapping.

/// Characters per line for a full-width box at the default text size.
pub const CHARS_PER_FULL_WIDTH: f64 = 25.0;

/// Narrowest wrap width used for any box.
pub const MIN_CHARS_PER_LINE: usize = 10;

/// Wrap `text` to at most `max_chars` characters per line.
///
/// Text that already fits is returned unchanged. Otherwise runs of
/// whitespace collapse to single breaks or spaces, and words longer than
/// `max_chars` are split.
pub fn wrap_text(text: &str, max_chars: usize) -> String {
    let max_chars = max_chars.max(1);
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();

        // Overlong words fill the remainder of the current line, then whole lines
        while chars.len() > max_chars {
            let room = if current_len == 0 {
                max_chars
            } else {
                max_chars.saturating_sub(current_len + 1)
            };
            if room == 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
                continue;
            }
            if current_len > 0 {
                current.push(' ');
            }
            current.extend(chars.drain(..room));
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }

        let word_len = chars.len();
        if word_len == 0 {
            continue;
        }
        if current_len > 0 && current_len + 1 + word_len > max_chars {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(chars);
        current_len += word_len;
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines.join("\n")
}

/// Wrap width for a box `box_width` image-widths wide.
pub fn chars_per_line(box_width: f64, chars_per_full_width: f64, min_chars: usize) -> usize {
    let estimate = (box_width * chars_per_full_width).floor();
    if estimate.is_finite() && estimate > 0.0 {
        (estimate as usize).max(min_chars)
    } else {
        min_chars
    }
}

/// Wrap `text` for a box `box_width` image-widths wide.
///
/// Text with explicit line breaks is left as is.
pub fn smart_wrap(text: &str, box_width: f64) -> String {
    smart_wrap_with(text, box_width, CHARS_PER_FULL_WIDTH, MIN_CHARS_PER_LINE)
}

pub(crate) fn smart_wrap_with(
    text: &str,
    box_width: f64,
    chars_per_full_width: f64,
    min_chars: usize,
) -> String {
    if text.contains('\n') {
        return text.to_string();
    }
    wrap_text(text, chars_per_line(box_width, chars_per_full_width, min_chars))
}
