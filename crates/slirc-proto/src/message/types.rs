use crate::prefix::Prefix;

/// An owned IRC message: optional origin, a verb, and ordered parameters.
///
/// The last parameter doubles as the "trailing" parameter; the serializer
/// decides whether it needs the `:` marker, so callers never track it.
///
/// # Example
///
/// ```
/// use slirc_proto::{Message, Prefix};
///
/// let msg: Message = "JOIN #rust".parse().unwrap();
/// assert_eq!(msg.param(0), Some("#rust"));
///
/// let msg = Message::new("PRIVMSG", ["#rust", "hello world"])
///     .with_prefix(Prefix::user("alice", "al", "host"));
/// assert_eq!(msg.to_string(), ":alice!al@host PRIVMSG #rust :hello world");
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Message {
    /// Message origin, e.g. `nick!user@host` or a server name.
    pub prefix: Option<Prefix>,
    /// The verb or three-digit numeric.
    pub command: String,
    /// Parameters in order, trailing included.
    pub params: Vec<String>,
}

impl Message {
    /// Create a message without a prefix.
    #[must_use]
    pub fn new<C, I, P>(command: C, params: I) -> Self
    where
        C: Into<String>,
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Message {
            prefix: None,
            command: command.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// Set the origin prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: Prefix) -> Self {
        self.prefix = Some(prefix);
        self
    }

    /// Parameter at `index`, if present.
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }

    /// The final parameter, or `""` when there are none.
    pub fn trailing(&self) -> &str {
        self.params.last().map(String::as_str).unwrap_or("")
    }

    /// Nickname of the origin, if the prefix names a user.
    pub fn source_nickname(&self) -> Option<&str> {
        self.prefix.as_ref().and_then(Prefix::nick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_collects_params() {
        let msg = Message::new("KICK", vec!["#c".to_string(), "bob".to_string()]);
        assert_eq!(msg.params, vec!["#c", "bob"]);
        assert!(msg.prefix.is_none());
    }

    #[test]
    fn test_trailing_defaults_to_empty() {
        let msg = Message::new("MOTD", Vec::<String>::new());
        assert_eq!(msg.trailing(), "");
        assert_eq!(msg.param(0), None);
    }

    #[test]
    fn test_source_nickname() {
        let msg = Message::new("QUIT", ["bye"]).with_prefix(Prefix::user("n", "u", "h"));
        assert_eq!(msg.source_nickname(), Some("n"));
        let msg = msg.with_prefix(Prefix::server("irc.example.net"));
        assert_eq!(msg.source_nickname(), None);
    }
}
