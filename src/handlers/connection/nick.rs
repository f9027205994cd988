//! NICK handler.

use super::super::helpers::is_services_nick;
use super::super::{Audience, Context, Handler, HandlerError, HandlerResult};
use super::welcome::maybe_login;
use slirc_proto::{Message, NickExt, irc_eq};
use tracing::info;

/// Handler for NICK command.
///
/// A change that only alters letter case is a rename in place. Anything
/// else must be a valid nickname, free, not reserved for services, and not
/// under an unexpired hold. An expired hold is dropped on the way.
pub struct NickHandler;

impl Handler for NickHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let nick = match msg.param(0) {
            Some(n) if !n.is_empty() => n,
            _ => return Err(HandlerError::NoNicknameGiven),
        };

        let caller = ctx.caller()?;
        let old_prefix = caller.prefix();
        let had_nick = !caller.nick.is_empty();
        let logged_in = caller.logged_in;
        let only_case = irc_eq(&caller.nick, nick);

        if !nick.is_valid_nick() {
            return Err(HandlerError::ErroneousNickname {
                nick: nick.to_string(),
                hold_reason: None,
            });
        }
        if (!only_case && ctx.dir.find_nick(nick).is_some()) || is_services_nick(nick) {
            return Err(HandlerError::NicknameInUse(nick.to_string()));
        }
        if let Some(hold) = ctx.dir.hold(nick) {
            if !hold.expired_at(ctx.now) {
                return Err(HandlerError::ErroneousNickname {
                    nick: nick.to_string(),
                    hold_reason: Some(hold.reason.clone()),
                });
            }
            ctx.dir.remove_hold(nick);
        }

        ctx.dir.set_nick(ctx.session, nick);

        if had_nick && logged_in {
            let audience = Audience::new()
                .common_channels(ctx.dir, ctx.session)
                .services(ctx.dir);
            let change = Message::new("NICK", [nick]).with_prefix(old_prefix);
            ctx.send(audience, change);
            info!(session = %ctx.session, nick = %nick, "Nick changed");
            Ok(())
        } else {
            maybe_login(ctx)
        }
    }
}
