//! Channel command handlers.
//!
//! Handles JOIN, PART, KICK, TOPIC, NAMES, LIST, INVITE and KNOCK.

mod invite;
mod join;
mod kick;
mod knock;
mod list;
mod names;
mod part;
mod topic;

pub use invite::InviteHandler;
pub use join::{JoinHandler, send_join_burst};
pub use kick::KickHandler;
pub use knock::KnockHandler;
pub use list::ListHandler;
pub use names::{NamesHandler, send_names};
pub use part::PartHandler;
pub use topic::{TopicHandler, send_topic};

use super::{Context, HandlerError};
use crate::error::ChannelError;
use crate::state::Channel;

/// The channel named `name`, or `ERR_NOSUCHCHANNEL`.
pub(super) fn existing<'c>(ctx: &'c Context<'_>, name: &str) -> Result<&'c Channel, HandlerError> {
    ctx.dir
        .channel(name)
        .ok_or_else(|| HandlerError::NoSuchChannel(name.to_string()))
}

/// The channel named `name` with the caller a member of it.
pub(super) fn joined<'c>(
    ctx: &'c Context<'_>,
    name: &str,
    nick: &str,
) -> Result<&'c Channel, HandlerError> {
    let chan = existing(ctx, name)?;
    if chan.is_member(nick) {
        Ok(chan)
    } else {
        Err(ChannelError::NotOnChannel(chan.name.clone()).into())
    }
}
