//! INVITE from a services link.

use super::super::{Audience, Context, Handler, HandlerError, HandlerResult};
use super::{origin_name, services_origin};
use crate::error::ChannelError;
use crate::state::ChanKey;
use slirc_proto::{Message, Response};

/// Handler for `server_INVITE`.
///
/// `:<bot> INVITE <nick> <channel>`, e.g. ChanServ honouring an access
/// list. The bot need not be on the channel.
pub struct ServerInviteHandler;

impl Handler for ServerInviteHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let (target, name) = (&msg.params[0], &msg.params[1]);
        let invitee = ctx
            .dir
            .find_nick(target)
            .ok_or_else(|| HandlerError::NoSuchNick(target.clone()))?;
        let chan = ctx
            .dir
            .channel(name)
            .ok_or_else(|| HandlerError::NoSuchChannel(name.clone()))?;
        let display = chan.name.clone();
        if chan.is_member(target) {
            return Err(ChannelError::UserOnChannel {
                nick: target.clone(),
                channel: display,
            }
            .into());
        }

        let Some(session) = ctx.dir.session_mut(invitee) else {
            return Err(HandlerError::NoSuchNick(target.clone()));
        };
        session.invited_to.insert(ChanKey::new(name));
        let nick = session.nick.clone();

        ctx.reply(Response::RPL_INVITING, vec![target.clone(), display.clone()]);
        ctx.send(
            Audience::new().session(invitee),
            Message::new("INVITE", [nick.as_str(), display.as_str()])
                .with_prefix(services_origin(msg)),
        );
        let members = Audience::new().channel(ctx.dir, name);
        ctx.send(
            members,
            Message::new(
                "NOTICE",
                [
                    display.clone(),
                    format!("{} invited {target} into the channel.", origin_name(msg)),
                ],
            )
            .with_prefix(ctx.server_prefix()),
        );
        Ok(())
    }
}
