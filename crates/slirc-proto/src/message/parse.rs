//! `FromStr` for [`Message`] on top of the nom parser.

use std::str::FromStr;

use crate::error::{MessageParseError, ProtocolError};
use crate::prefix::Prefix;

use super::nom_parser::ParsedMessage;
use super::types::Message;

impl Message {
    /// Parse a line given as raw bytes (as it arrives in a log entry).
    pub fn from_bytes(bytes: &[u8]) -> Result<Message, ProtocolError> {
        std::str::from_utf8(bytes)?.parse()
    }
}

impl FromStr for Message {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Message, Self::Err> {
        let invalid = |cause| ProtocolError::InvalidMessage {
            string: s.to_owned(),
            cause,
        };

        if s.trim_end_matches(['\r', '\n']).trim().is_empty() {
            return Err(invalid(MessageParseError::EmptyMessage));
        }

        let parsed = ParsedMessage::parse(s).map_err(|(position, kind)| {
            invalid(MessageParseError::ParseContext {
                position,
                context: format!("{:?}", kind),
            })
        })?;

        let prefix = match parsed.prefix {
            Some(p) => Some(Prefix::try_from_str(p).map_err(invalid)?),
            None => None,
        };

        Ok(Message {
            prefix,
            command: parsed.command.to_owned(),
            params: parsed.params.iter().map(|p| (*p).to_owned()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_ping() {
        let msg: Message = "PING :server\r\n".parse().unwrap();
        assert_eq!(msg.command, "PING");
        assert_eq!(msg.trailing(), "server");
    }

    #[test]
    fn test_parse_keeps_verb_case() {
        let msg: Message = "privmsg #c :x".parse().unwrap();
        assert_eq!(msg.command, "privmsg");
    }

    #[test]
    fn test_empty_line_is_rejected() {
        let err = "\r\n".parse::<Message>().unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::InvalidMessage {
                cause: MessageParseError::EmptyMessage,
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_utf8() {
        assert!(matches!(
            Message::from_bytes(b"PRIVMSG #c :\xff"),
            Err(ProtocolError::Decode(_))
        ));
    }

    #[test]
    fn test_reparse_serialized() {
        let line = ":alice!al@host KICK #rust bob :go away";
        let msg: Message = line.parse().unwrap();
        assert_eq!(msg.to_string(), line);
    }
}
