//! # slirc-proto
//!
//! The line protocol spoken by the replicated slircd engine.
//!
//! ## Features
//!
//! - Message parsing and serialization (origin, verb, parameters, trailing)
//! - Origin prefixes (`nick!user@host` or a bare server name)
//! - Numeric reply codes
//! - RFC 1459 case-folding for nicknames and channel names
//! - Nickname and channel-name validation
//! - The compact mode grammar (`+nt-o nick`)
//!
//! ## Quick Start
//!
//! ```rust
//! use slirc_proto::{Message, Prefix};
//!
//! let msg: Message = ":alice!al@host PRIVMSG #rust :hello there".parse().unwrap();
//! assert_eq!(msg.command, "PRIVMSG");
//! assert_eq!(msg.trailing(), "hello there");
//!
//! let reply = Message::new("NOTICE", ["bob", "hi"]).with_prefix(Prefix::server("irc.example.net"));
//! assert_eq!(reply.to_string(), ":irc.example.net NOTICE bob hi");
//! ```
//!
//! ## Acknowledgments
//!
//! This project was inspired by the architectural patterns established by
//! [Aaron Weiss (aatxe)](https://github.com/aatxe) in the
//! [irc](https://github.com/aatxe/irc) crate.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod casemap;
pub mod chan;
pub mod error;
pub mod message;
pub mod mode;
pub mod nick;
pub mod prefix;
pub mod response;

pub use self::casemap::{irc_eq, irc_lower_char, irc_to_lower};
pub use self::chan::{ChannelExt, MAX_CHANNEL_LEN};
pub use self::error::{MessageParseError, ProtocolError};
pub use self::message::Message;
pub use self::mode::{ModeChange, ModeContext, ModeSign};
pub use self::nick::{NickExt, MAX_NICK_LEN};
pub use self::prefix::Prefix;
pub use self::response::Response;
