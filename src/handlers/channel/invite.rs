//! INVITE handler.

use super::super::{Audience, Context, Handler, HandlerError, HandlerResult};
use crate::error::ChannelError;
use crate::state::ChanKey;
use slirc_proto::{Message, Response};

/// Handler for INVITE command.
///
/// `INVITE <nick> <channel>`
///
/// On `+i` channels only operators may invite. The invitation lets the
/// target past `+i` and `+x` once.
pub struct InviteHandler;

impl Handler for InviteHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let (target, name) = (&msg.params[0], &msg.params[1]);
        let caller = ctx.caller()?;
        let nick = caller.nick.clone();
        let prefix = caller.prefix();

        let chan = ctx
            .dir
            .channel(name)
            .filter(|c| c.is_member(&nick))
            .ok_or_else(|| ChannelError::NotOnChannel(name.clone()))?;
        let display = chan.name.clone();
        let needs_op = chan.has_mode('i') && !chan.is_op(&nick);

        let target_id = ctx
            .dir
            .find_nick(target)
            .ok_or_else(|| HandlerError::NoSuchNick(target.clone()))?;
        if chan.is_member(target) {
            return Err(ChannelError::UserOnChannel {
                nick: target.clone(),
                channel: display,
            }
            .into());
        }
        if needs_op {
            return Err(ChannelError::ChanOpPrivsNeeded(display).into());
        }

        let Some(invitee) = ctx.dir.session_mut(target_id) else {
            return Err(HandlerError::NoSuchNick(target.clone()));
        };
        invitee.invited_to.insert(ChanKey::new(name));
        let target_nick = invitee.nick.clone();
        let away = invitee.away.clone();

        ctx.reply(
            Response::RPL_INVITING,
            vec![target_nick.clone(), display.clone()],
        );
        let audience = Audience::new().session(target_id).services(ctx.dir);
        ctx.send(
            audience,
            Message::new("INVITE", [target_nick.as_str(), display.as_str()]).with_prefix(prefix),
        );
        let members = Audience::new().channel(ctx.dir, name);
        ctx.send(
            members,
            Message::new(
                "NOTICE",
                [
                    display.clone(),
                    format!("{nick} invited {target_nick} into the channel."),
                ],
            )
            .with_prefix(ctx.server_prefix()),
        );
        if !away.is_empty() {
            ctx.reply(Response::RPL_AWAY, vec![target_nick, away]);
        }
        Ok(())
    }
}
