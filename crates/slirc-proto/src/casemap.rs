//! RFC 1459 case-folding.
//!
//! Nicknames and channel names compare case-insensitively, where the
//! Scandinavian heritage of IRC makes `[]\~` the upper-case forms of `{}|^`.
//! The display form is kept separately by callers; only folded forms are
//! used as map keys.

/// Fold a single character.
#[inline]
pub const fn irc_lower_char(c: char) -> char {
    match c {
        'A'..='Z' => c.to_ascii_lowercase(),
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        '~' => '^',
        _ => c,
    }
}

/// Fold a whole string.
pub fn irc_to_lower(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    out.extend(s.chars().map(irc_lower_char));
    out
}

/// Case-insensitive equality under RFC 1459 folding.
pub fn irc_eq(a: &str, b: &str) -> bool {
    a.len() == b.len()
        && a
            .chars()
            .map(irc_lower_char)
            .eq(b.chars().map(irc_lower_char))
}
