//! KICK handler.

use super::super::{Audience, Context, Handler, HandlerError, HandlerResult};
use super::joined;
use crate::error::ChannelError;
use slirc_proto::Message;

/// Handler for KICK command.
///
/// `KICK <channel> <nick> [:<reason>]`
pub struct KickHandler;

impl Handler for KickHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let (name, target) = (&msg.params[0], &msg.params[1]);
        let caller = ctx.caller()?;
        let nick = caller.nick.clone();
        let prefix = caller.prefix();

        let chan = joined(ctx, name, &nick)?;
        let display = chan.name.clone();
        if !chan.is_op(&nick) {
            return Err(ChannelError::ChanOpPrivsNeeded(display).into());
        }
        if !chan.is_member(target) {
            return Err(ChannelError::UserNotInChannel {
                nick: target.clone(),
                channel: display,
            }
            .into());
        }
        let victim = ctx
            .dir
            .find_nick(target)
            .ok_or_else(|| HandlerError::NoSuchNick(target.clone()))?;

        let audience = Audience::new().channel(ctx.dir, name).services(ctx.dir);
        ctx.send(
            audience,
            Message::new("KICK", [display, target.clone(), msg.trailing().to_string()])
                .with_prefix(prefix),
        );
        ctx.dir.part(victim, name);
        Ok(())
    }
}
