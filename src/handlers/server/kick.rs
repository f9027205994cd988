//! KICK from a services link.

use super::super::{Audience, Context, Handler, HandlerError, HandlerResult};
use super::services_origin;
use crate::error::ChannelError;
use slirc_proto::Message;

/// Handler for `server_KICK`.
///
/// `:<bot> KICK <channel> <nick> :<reason>`. The bot need not be a channel
/// operator, or even a member.
pub struct ServerKickHandler;

impl Handler for ServerKickHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let (name, target) = (&msg.params[0], &msg.params[1]);
        let chan = ctx
            .dir
            .channel(name)
            .ok_or_else(|| HandlerError::NoSuchChannel(name.clone()))?;
        if !chan.is_member(target) {
            return Err(ChannelError::UserNotInChannel {
                nick: target.clone(),
                channel: name.clone(),
            }
            .into());
        }
        let victim = ctx
            .dir
            .find_nick(target)
            .ok_or_else(|| HandlerError::NoSuchNick(target.clone()))?;

        let kick = Message::new("KICK", [name.as_str(), target.as_str(), msg.trailing()])
            .with_prefix(services_origin(msg));
        let audience = Audience::new().channel(ctx.dir, name).services(ctx.dir);
        ctx.send(audience, kick);
        ctx.dir.part(victim, name);
        Ok(())
    }
}
