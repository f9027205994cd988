//! KNOCK handler.

use super::super::{Audience, Context, Handler, HandlerError, HandlerResult};
use slirc_proto::Message;

/// Handler for KNOCK command.
///
/// `KNOCK <channel> [<reason>]`
///
/// Asks the members of an invite-only channel for an invitation.
pub struct KnockHandler;

impl Handler for KnockHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let name = &msg.params[0];
        let prefix = ctx.caller()?.prefix();

        let chan = ctx.dir.channel(name).ok_or_else(|| HandlerError::CannotKnock {
            channel: name.clone(),
            reason: "Channel does not exist".to_string(),
        })?;
        if !chan.has_mode('i') {
            return Err(HandlerError::CannotKnock {
                channel: chan.name.clone(),
                reason: "Channel is not invite only".to_string(),
            });
        }
        let display = chan.name.clone();

        let reason = if msg.params.len() > 1 {
            msg.params[1..].join(" ")
        } else {
            "no reason specified".to_string()
        };

        let members = Audience::new().channel(ctx.dir, name);
        ctx.send(
            members,
            Message::new("NOTICE", [display.clone(), format!("[Knock] by {prefix} ({reason})")])
                .with_prefix(ctx.server_prefix()),
        );
        ctx.notice(format!("Knocked on {display}"));
        Ok(())
    }
}
