//! JOIN and PART on behalf of a services bot.

use super::super::helpers::split_list;
use super::super::{Audience, Context, Handler, HandlerError, HandlerResult};
use super::{origin_name, services_origin};
use crate::error::ChannelError;
use crate::state::JoinOutcome;
use slirc_proto::{ChannelExt, Message};

/// Handler for `server_JOIN`.
///
/// `:<bot> JOIN <channel>[,<channel>...]`, e.g. ChanServ entering a channel
/// before enforcing an AKICK. No mode checks apply.
pub struct ServerJoinHandler;

impl Handler for ServerJoinHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let list = msg.param(0).ok_or(HandlerError::NeedMoreParams)?;
        let bot = origin_name(msg);
        let origin = services_origin(msg);

        for name in split_list(list) {
            if !name.is_valid_channel() {
                ctx.report(&HandlerError::NoSuchChannel(name.to_string()), "JOIN");
                continue;
            }
            let Some(id) = ctx.dir.find_nick(bot) else {
                ctx.report(&HandlerError::NoSuchNick(bot.to_string()), "JOIN");
                continue;
            };
            if matches!(ctx.dir.join(id, name), None | Some(JoinOutcome::AlreadyMember)) {
                continue;
            }
            let audience = Audience::new().common_channels(ctx.dir, id);
            ctx.send(audience, Message::new("JOIN", [name]).with_prefix(origin.clone()));
        }
        Ok(())
    }
}

/// Handler for `server_PART`.
///
/// `:<bot> PART <channel>[,<channel>...]`
pub struct ServerPartHandler;

impl Handler for ServerPartHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let list = msg.param(0).ok_or(HandlerError::NeedMoreParams)?;
        let bot = origin_name(msg);
        let origin = services_origin(msg);

        for name in split_list(list) {
            let err = match ctx.dir.channel(name) {
                None => Some(HandlerError::NoSuchChannel(name.to_string())),
                Some(chan) if !chan.is_member(bot) => {
                    Some(ChannelError::NotOnChannel(chan.name.clone()).into())
                }
                Some(_) => None,
            };
            if let Some(err) = err {
                ctx.report(&err, "PART");
                continue;
            }
            let Some(id) = ctx.dir.find_nick(bot) else {
                continue;
            };
            let audience = Audience::new().common_channels(ctx.dir, id);
            ctx.send(audience, Message::new("PART", [name]).with_prefix(origin.clone()));
            ctx.dir.part(id, name);
        }
        Ok(())
    }
}
