//! Messaging command handlers (PRIVMSG, NOTICE).
//!
//! Handles message routing to users and channels:
//! - Channel mode `+n` (no external messages)
//! - User mode `+i` (invisible users only hear from people they share a
//!   channel with)
//! - Away replies

mod common;
mod notice;
mod privmsg;

pub use notice::NoticeHandler;
pub use privmsg::PrivmsgHandler;
