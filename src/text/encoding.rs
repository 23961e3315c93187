//! Text styling and memegen URL text encoding.
//!
//! memegen URLs escape characters that are meaningful in a path:
//!
//! | text | encoded |
//! |------|---------|
//! | `_`  | `__`    |
//! | `-`  | `--`    |
//! | space | `_`    |
//! | `?` `&` `%` `#` `/` `\` `<` `>` | `~q` `~a` `~p` `~h` `~s` `~b` `~l` `~g` |
//! | `"`  | `''`    |
//! | newline | `~n` |

use crate::registry::TextStyle;

const TILDE_ESCAPES: &[(char, char)] = &[
    ('?', 'q'),
    ('&', 'a'),
    ('%', 'p'),
    ('#', 'h'),
    ('/', 's'),
    ('\\', 'b'),
    ('<', 'l'),
    ('>', 'g'),
    ('\n', 'n'),
];

/// Apply a text transform.
pub fn apply_style(text: &str, style: TextStyle) -> String {
    match style {
        TextStyle::Upper => text.to_uppercase(),
        TextStyle::Lower => text.to_lowercase(),
        TextStyle::None => text.to_string(),
    }
}

/// Encode text for a memegen image URL path segment.
pub fn encode_text_for_url(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '_' => out.push_str("__"),
            '-' => out.push_str("--"),
            ' ' => out.push('_'),
            '"' => out.push_str("''"),
            c => match TILDE_ESCAPES.iter().find(|(plain, _)| *plain == c) {
                Some((_, code)) => {
                    out.push('~');
                    out.push(*code);
                }
                None => out.push(c),
            },
        }
    }
    out
}

/// Reverse [`encode_text_for_url`].
///
/// Doubled sequences are read first, so `__` is an underscore and a lone
/// `_` is a space. Unknown `~` escapes are kept verbatim.
pub fn decode_text_from_url(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '_' if chars.peek() == Some(&'_') => {
                chars.next();
                out.push('_');
            }
            '_' => out.push(' '),
            '-' if chars.peek() == Some(&'-') => {
                chars.next();
                out.push('-');
            }
            '\'' if chars.peek() == Some(&'\'') => {
                chars.next();
                out.push('"');
            }
            '~' => {
                let decoded = chars
                    .peek()
                    .and_then(|code| TILDE_ESCAPES.iter().find(|(_, c)| c == code))
                    .map(|(plain, _)| *plain);
                match decoded {
                    Some(plain) => {
                        chars.next();
                        out.push(plain);
                    }
                    None => out.push('~'),
                }
            }
            c => out.push(c),
        }
    }
    out
}
