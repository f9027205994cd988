//! Nickname validation.

/// Longest nickname accepted (advertised as `NICKLEN`).
pub const MAX_NICK_LEN: usize = 32;

/// Extension trait for checking if a string is a valid IRC nickname.
pub trait NickExt {
    /// Whether this is an acceptable nickname.
    ///
    /// - First character: letter or one of `[]\`_^{|}`
    /// - Following characters: letter, digit, special, or `-`
    /// - At most [`MAX_NICK_LEN`] bytes
    ///
    /// ```
    /// use slirc_proto::NickExt;
    ///
    /// assert!("alice".is_valid_nick());
    /// assert!("[away]".is_valid_nick());
    /// assert!(!"1up".is_valid_nick());
    /// assert!(!"two words".is_valid_nick());
    /// ```
    fn is_valid_nick(&self) -> bool;
}

#[inline]
fn is_special(c: char) -> bool {
    matches!(c, '[' | ']' | '\\' | '`' | '_' | '^' | '{' | '|' | '}')
}

impl NickExt for str {
    fn is_valid_nick(&self) -> bool {
        if self.is_empty() || self.len() > MAX_NICK_LEN {
            return false;
        }
        let mut chars = self.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || is_special(c) => {}
            _ => return false,
        }
        chars.all(|c| c.is_ascii_alphanumeric() || is_special(c) || c == '-')
    }
}

impl NickExt for String {
    fn is_valid_nick(&self) -> bool {
        self.as_str().is_valid_nick()
    }
}
