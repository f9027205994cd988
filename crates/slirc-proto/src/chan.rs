//! Channel name validation.

/// Longest channel name accepted, including the leading `#` (advertised as
/// `CHANNELLEN`).
pub const MAX_CHANNEL_LEN: usize = 32;

/// Extension trait for checking if a string is a valid channel name.
pub trait ChannelExt {
    /// Whether this string looks like a channel target at all (starts with `#`).
    fn is_channel_name(&self) -> bool;

    /// Whether this is a channel name that may be created.
    ///
    /// Only `#` channels exist on this network. Names must contain at least
    /// one character after the `#`, be at most [`MAX_CHANNEL_LEN`] bytes and
    /// contain no space, comma, BEL, NUL or other control characters.
    fn is_valid_channel(&self) -> bool;
}

impl ChannelExt for str {
    fn is_channel_name(&self) -> bool {
        self.starts_with('#')
    }

    fn is_valid_channel(&self) -> bool {
        self.len() > 1
            && self.len() <= MAX_CHANNEL_LEN
            && self.is_channel_name()
            && !self.chars().any(|c| c == ' ' || c == ',' || c.is_control())
    }
}

impl ChannelExt for String {
    fn is_channel_name(&self) -> bool {
        self.as_str().is_channel_name()
    }

    fn is_valid_channel(&self) -> bool {
        self.as_str().is_valid_channel()
    }
}
