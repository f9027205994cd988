//! Services link handlers.
//!
//! A session becomes a services link by sending `SERVER` with the services
//! password in its PASS. From then on its messages are dispatched as
//! `server_<VERB>`. Links are fully trusted: they act on any session or
//! channel without ownership checks. Users the link introduces with `NICK`
//! live on as subsessions of the link's connection.
//!
//! Errors go back to the link, addressed to the nick in the message origin.

mod invite;
mod join;
mod kick;
mod kill;
mod link;
mod mode;
mod nick;
mod privmsg;
mod quit;
mod svs;
mod topic;

pub use invite::ServerInviteHandler;
pub use join::{ServerJoinHandler, ServerPartHandler};
pub use kick::ServerKickHandler;
pub use kill::ServerKillHandler;
pub use link::ServerHandler;
pub use mode::ServerModeHandler;
pub use nick::ServerNickHandler;
pub use privmsg::ServerPrivmsgHandler;
pub use quit::ServerQuitHandler;
pub use svs::{SvsHoldHandler, SvsJoinHandler, SvsModeHandler, SvsNickHandler, SvsPartHandler};
pub use topic::ServerTopicHandler;

use super::Context;
use super::helpers::services_prefix;
use crate::state::SessionId;
use slirc_proto::{Message, Prefix, irc_eq};

/// Name in the message origin, nick or server, `""` when there is none.
pub(super) fn origin_name(msg: &Message) -> &str {
    match &msg.prefix {
        Some(Prefix::Nickname(nick, _, _)) => nick,
        Some(Prefix::ServerName(name)) => name,
        None => "",
    }
}

/// Origin for relayed messages: the services bot as `name!services@services`.
pub(super) fn services_origin(msg: &Message) -> Prefix {
    services_prefix(origin_name(msg))
}

/// The subsession of the calling link that goes by `nick`.
pub(super) fn link_subsession(ctx: &Context<'_>, nick: &str) -> Option<SessionId> {
    ctx.dir
        .subsessions(ctx.session.primary)
        .into_iter()
        .find(|id| ctx.dir.session(*id).is_some_and(|s| irc_eq(&s.nick, nick)))
}
