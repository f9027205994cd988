//! Nom-based IRC message parser.
//!
//! Produces borrowed slices into the input; [`super::parse`] turns them into
//! an owned [`super::Message`].

use nom::{
    bytes::complete::{take_until, take_while1},
    character::complete::{char, space0},
    combinator::opt,
    error::ErrorKind,
    sequence::preceded,
    IResult,
};
use smallvec::SmallVec;

/// Most parameters a single message may carry.
pub(crate) const MAX_PARAMS: usize = 15;

/// Tags are accepted for compatibility and dropped.
fn parse_tags(input: &str) -> IResult<&str, &str> {
    preceded(char('@'), take_until(" "))(input)
}

fn parse_prefix(input: &str) -> IResult<&str, &str> {
    preceded(char(':'), take_while1(|c| c != ' '))(input)
}

/// `1*letter / 3digit`
fn parse_command(input: &str) -> IResult<&str, &str> {
    let (rest, cmd) = take_while1(|c: char| c.is_alphanumeric())(input)?;

    let is_all_letters = cmd.chars().all(|c| c.is_ascii_alphabetic());
    let is_three_digits = cmd.len() == 3 && cmd.chars().all(|c| c.is_ascii_digit());

    if is_all_letters || is_three_digits {
        Ok((rest, cmd))
    } else {
        Err(nom::Err::Error(nom::error::Error::new(
            input,
            ErrorKind::AlphaNumeric,
        )))
    }
}

/// Middle parameters are space separated (runs of spaces collapse); a `:`
/// starts the trailing parameter, which runs to the end of the line.
fn parse_params(input: &str) -> (&str, SmallVec<[&str; MAX_PARAMS]>) {
    let mut params: SmallVec<[&str; MAX_PARAMS]> = SmallVec::new();
    let mut rest = input;

    while rest.starts_with(' ') {
        if params.len() >= MAX_PARAMS {
            break;
        }
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() || rest.starts_with(['\r', '\n']) {
            break;
        }

        if let Some(after_colon) = rest.strip_prefix(':') {
            let end = after_colon.find(['\r', '\n']).unwrap_or(after_colon.len());
            params.push(&after_colon[..end]);
            rest = &after_colon[end..];
            break;
        }

        let end = rest.find([' ', '\r', '\n']).unwrap_or(rest.len());
        params.push(&rest[..end]);
        rest = &rest[end..];
    }

    (rest, params)
}

/// `[@tags] [:prefix] <command> [params...] [:trailing]`
pub(crate) fn parse_message(input: &str) -> IResult<&str, ParsedMessage<'_>> {
    let (input, _tags) = opt(parse_tags)(input)?;
    let (input, _) = space0(input)?;
    let (input, prefix) = opt(parse_prefix)(input)?;
    let (input, _) = space0(input)?;
    let (input, command) = parse_command(input)?;
    let (rest, params) = parse_params(input);

    Ok((
        rest,
        ParsedMessage {
            prefix,
            command,
            params,
        },
    ))
}

/// A parsed message borrowing from its input line.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedMessage<'a> {
    pub prefix: Option<&'a str>,
    pub command: &'a str,
    pub params: SmallVec<[&'a str; MAX_PARAMS]>,
}

impl<'a> ParsedMessage<'a> {
    /// Parse, reporting the byte offset of the failure.
    pub fn parse(input: &'a str) -> Result<Self, (usize, ErrorKind)> {
        match parse_message(input) {
            Ok((_remaining, msg)) => Ok(msg),
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
                Err((input.len() - e.input.len(), e.code))
            }
            Err(nom::Err::Incomplete(_)) => Err((input.len(), ErrorKind::Eof)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_command() {
        let msg = ParsedMessage::parse("PING").unwrap();
        assert_eq!(msg.command, "PING");
        assert!(msg.prefix.is_none());
        assert!(msg.params.is_empty());
    }

    #[test]
    fn test_parse_with_prefix() {
        let msg = ParsedMessage::parse(":nick!user@host PRIVMSG #channel :Hello").unwrap();
        assert_eq!(msg.prefix, Some("nick!user@host"));
        assert_eq!(msg.params.as_slice(), &["#channel", "Hello"]);
    }

    #[test]
    fn test_tags_are_skipped() {
        let msg = ParsedMessage::parse("@time=2023-01-01T00:00:00Z :nick PRIVMSG #ch :Hi").unwrap();
        assert_eq!(msg.prefix, Some("nick"));
        assert_eq!(msg.params.as_slice(), &["#ch", "Hi"]);
    }

    #[test]
    fn test_parse_with_crlf() {
        let msg = ParsedMessage::parse("PING :server\r\n").unwrap();
        assert_eq!(msg.params.as_slice(), &["server"]);
    }

    #[test]
    fn test_parse_user() {
        let msg = ParsedMessage::parse("USER guest 0 * :Real Name").unwrap();
        assert_eq!(msg.params.as_slice(), &["guest", "0", "*", "Real Name"]);
    }

    #[test]
    fn test_collapses_repeated_spaces() {
        let msg = ParsedMessage::parse("MODE  #chan   +o  bob").unwrap();
        assert_eq!(msg.params.as_slice(), &["#chan", "+o", "bob"]);
    }

    #[test]
    fn test_parse_empty_trailing() {
        let msg = ParsedMessage::parse("TOPIC #channel :").unwrap();
        assert_eq!(msg.params.as_slice(), &["#channel", ""]);
    }

    #[test]
    fn test_parse_command_validation() {
        assert!(ParsedMessage::parse("PING").is_ok());
        assert!(ParsedMessage::parse("433").is_ok());
        assert!(ParsedMessage::parse("PING123").is_err());
        assert!(ParsedMessage::parse("12").is_err());
        assert_eq!(ParsedMessage::parse(":only.prefix").unwrap_err().0, 12);
    }

    #[test]
    fn test_parse_params_limit() {
        let raw = "CMD p1 p2 p3 p4 p5 p6 p7 p8 p9 p10 p11 p12 p13 p14 p15 p16";
        let msg = ParsedMessage::parse(raw).unwrap();
        assert_eq!(msg.params.len(), MAX_PARAMS);
        assert_eq!(msg.params[14], "p15");
    }
}
