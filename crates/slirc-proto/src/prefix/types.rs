//! The origin of a message: a server name or a `nick!user@host` mask.

use crate::error::MessageParseError;

/// Identifies who a message comes from.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum Prefix {
    /// Server name, e.g. `robustirc.net`.
    ServerName(String),
    /// User origin: (nickname, username, hostname). Parts may be empty.
    Nickname(String, String, String),
}

impl Prefix {
    /// A server-name prefix.
    pub fn server(name: impl Into<String>) -> Self {
        Prefix::ServerName(name.into())
    }

    /// A full `nick!user@host` prefix.
    ///
    /// ```
    /// use slirc_proto::Prefix;
    ///
    /// let p = Prefix::user("alice", "al", "robust/0x13b5aa0a2bcfb8ad");
    /// assert_eq!(p.to_string(), "alice!al@robust/0x13b5aa0a2bcfb8ad");
    /// assert_eq!(p.nick(), Some("alice"));
    /// ```
    pub fn user(nick: impl Into<String>, user: impl Into<String>, host: impl Into<String>) -> Self {
        Prefix::Nickname(nick.into(), user.into(), host.into())
    }

    /// Lenient parse. A name containing a dot and no `!`/`@` is a server.
    pub fn parse_lenient(s: &str) -> Self {
        let (before_at, host) = match s.split_once('@') {
            Some((b, h)) => (b, Some(h)),
            None => (s, None),
        };
        let (nick, user) = match before_at.split_once('!') {
            Some((n, u)) => (n, Some(u)),
            None => (before_at, None),
        };
        if user.is_none() && host.is_none() && nick.contains('.') {
            return Prefix::ServerName(nick.to_owned());
        }
        Prefix::Nickname(
            nick.to_owned(),
            user.unwrap_or_default().to_owned(),
            host.unwrap_or_default().to_owned(),
        )
    }

    /// Parse, rejecting empty prefixes or ones with spaces or control bytes.
    pub fn try_from_str(s: &str) -> Result<Self, MessageParseError> {
        if s.is_empty() || s.chars().any(|c| c == ' ' || c.is_control()) {
            return Err(MessageParseError::InvalidPrefix(s.to_owned()));
        }
        Ok(Self::parse_lenient(s))
    }

    /// The nickname, if this is a user prefix with one.
    pub fn nick(&self) -> Option<&str> {
        match self {
            Prefix::Nickname(nick, _, _) if !nick.is_empty() => Some(nick),
            _ => None,
        }
    }

    /// The username, if present.
    pub fn username(&self) -> Option<&str> {
        match self {
            Prefix::Nickname(_, user, _) if !user.is_empty() => Some(user),
            _ => None,
        }
    }

    /// The hostname, or the server name for server prefixes.
    pub fn host(&self) -> Option<&str> {
        match self {
            Prefix::ServerName(name) => Some(name),
            Prefix::Nickname(_, _, host) if !host.is_empty() => Some(host),
            _ => None,
        }
    }
}

impl From<&str> for Prefix {
    fn from(s: &str) -> Self {
        Prefix::parse_lenient(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_server_name() {
        assert_eq!(
            Prefix::parse_lenient("irc.example.com"),
            Prefix::ServerName("irc.example.com".into())
        );
    }

    #[test]
    fn test_parse_nick_user_host() {
        let p = Prefix::parse_lenient("nick!user@host.com");
        assert_eq!(p, Prefix::user("nick", "user", "host.com"));
        assert_eq!(p.username(), Some("user"));
        assert_eq!(p.host(), Some("host.com"));
    }

    #[test]
    fn test_parse_bare_nick() {
        let p = Prefix::parse_lenient("NickServ");
        assert_eq!(p.nick(), Some("NickServ"));
        assert_eq!(p.to_string(), "NickServ");
    }

    #[test]
    fn test_rejects_spaces() {
        assert!(Prefix::try_from_str("a b").is_err());
        assert!(Prefix::try_from_str("").is_err());
        assert!(Prefix::try_from_str("nick!u@h").is_ok());
    }

    #[test]
    fn test_display_partial() {
        assert_eq!(Prefix::user("n", "", "h").to_string(), "n@h");
        assert_eq!(Prefix::user("n", "u", "").to_string(), "n!u");
    }
}
