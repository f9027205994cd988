//! Routing shared by PRIVMSG and NOTICE.

use super::super::{Audience, Context, HandlerError, HandlerResult};
use slirc_proto::{ChannelExt, Message, Response};

/// Route a PRIVMSG or NOTICE from the caller.
///
/// `away_reply` controls whether the sender learns that the recipient is
/// away; NOTICE never triggers automatic replies.
pub(super) fn route_message(
    ctx: &mut Context<'_>,
    msg: &Message,
    away_reply: bool,
) -> HandlerResult {
    let Some(target) = msg.param(0) else {
        return Err(HandlerError::NoRecipient);
    };
    if msg.params.len() < 2 {
        return Err(HandlerError::NoTextToSend);
    }
    let text = msg.trailing();
    let caller = ctx.caller()?;
    let prefix = caller.prefix();
    let nick = caller.nick.clone();
    let out = Message::new(msg.command.as_str(), [target, text]).with_prefix(prefix);

    if target.is_channel_name() {
        let chan = ctx
            .dir
            .channel(target)
            .ok_or_else(|| HandlerError::NoSuchChannel(target.to_string()))?;
        if chan.has_mode('n') && !chan.is_member(&nick) {
            return Err(HandlerError::CannotSendToChan(chan.name.clone()));
        }
        let audience = Audience::new().channel_but_one(ctx.dir, target, ctx.session);
        ctx.send(audience, out);
        return Ok(());
    }

    let recipient = ctx
        .dir
        .session_by_nick(target)
        .ok_or_else(|| HandlerError::NoSuchNick(target.to_string()))?;
    let recipient_id = recipient.id;
    let away = recipient.away.clone();
    if recipient.is_invisible() && !ctx.dir.shares_channel(ctx.session, recipient_id) {
        return Ok(());
    }

    ctx.send(Audience::new().session(recipient_id), out);
    if away_reply && !away.is_empty() {
        ctx.reply(Response::RPL_AWAY, vec![target.to_string(), away]);
    }
    Ok(())
}
