//! PRIVMSG and NOTICE from a services bot.

use super::super::{Audience, Context, Handler, HandlerError, HandlerResult};
use super::services_origin;
use slirc_proto::{ChannelExt, Message};

/// Handler for `server_PRIVMSG` and `server_NOTICE`.
///
/// Unlike user messages, channel messages reach every member (there is no
/// sender among them to skip) and neither `+n` nor `+i` apply.
pub struct ServerPrivmsgHandler {
    command: &'static str,
}

impl ServerPrivmsgHandler {
    pub fn privmsg() -> Self {
        Self { command: "PRIVMSG" }
    }

    pub fn notice() -> Self {
        Self { command: "NOTICE" }
    }
}

impl Handler for ServerPrivmsgHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let Some(target) = msg.param(0) else {
            return Err(HandlerError::NoRecipient);
        };
        let text = msg.trailing();
        if msg.params.len() < 2 || text.is_empty() {
            return Err(HandlerError::NoTextToSend);
        }
        let out = Message::new(self.command, [target, text]).with_prefix(services_origin(msg));

        let audience = if target.is_channel_name() {
            if ctx.dir.channel(target).is_none() {
                return Err(HandlerError::NoSuchChannel(target.to_string()));
            }
            Audience::new().channel(ctx.dir, target)
        } else {
            let id = ctx
                .dir
                .find_nick(target)
                .ok_or_else(|| HandlerError::NoSuchNick(target.to_string()))?;
            Audience::new().session(id)
        };
        ctx.send(audience, out);
        Ok(())
    }
}
