//! Error types for the IRC protocol library.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// The input bytes were not valid UTF-8.
    #[error("invalid utf-8 in line: {0}")]
    Decode(#[from] std::str::Utf8Error),

    /// A line failed to parse as an IRC message.
    #[error("invalid message {string:?}: {cause}")]
    InvalidMessage {
        /// The offending line.
        string: String,
        /// What was wrong with it.
        #[source]
        cause: MessageParseError,
    },
}

/// Errors encountered while parsing a single message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MessageParseError {
    /// Nothing but whitespace or line terminators.
    #[error("empty message")]
    EmptyMessage,

    /// The verb is neither alphabetic nor a three-digit numeric.
    #[error("invalid command")]
    InvalidCommand,

    /// The origin prefix contains characters that cannot appear in one.
    #[error("invalid prefix: {0}")]
    InvalidPrefix(String),

    /// Parser failure with position context.
    #[error("parse error at byte {position}: {context}")]
    ParseContext {
        /// Byte offset into the line.
        position: usize,
        /// Human readable parser state.
        context: String,
    },
}
