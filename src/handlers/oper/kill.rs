//! KILL handler.

use super::super::connection::{broadcast_quit, closing_link, remove_session};
use super::super::{Audience, Context, Handler, HandlerError, HandlerResult};
use crate::state::SessionId;
use slirc_proto::{Message, Prefix};
use tracing::info;

/// Handler for KILL command.
///
/// `KILL nickname :reason`
///
/// Disconnects a user from the network. Requires operator privileges.
pub struct KillHandler;

impl Handler for KillHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        if msg.params.len() < 2 {
            return Err(HandlerError::NeedMoreParams);
        }
        let target_nick = &msg.params[0];
        let reason = msg.trailing();

        let killer = ctx.caller()?;
        if !killer.operator {
            return Err(HandlerError::NoPrivileges);
        }
        let killer_nick = killer.nick.clone();
        let killer_prefix = killer.prefix();
        let path = format!("ircd!{}!{}", killer.host, killer.nick);

        let victim = ctx
            .dir
            .find_nick(target_nick)
            .ok_or_else(|| HandlerError::NoSuchNick(target_nick.clone()))?;

        broadcast_quit(ctx, victim, &format!("Killed by {killer_nick}: {reason}"), true);
        kill_session(ctx, victim, killer_prefix, &path, &killer_nick, reason);
        Ok(())
    }
}

/// Tell `victim` it was killed, then remove it. Peers must already have
/// been told.
pub fn kill_session(
    ctx: &mut Context<'_>,
    victim: SessionId,
    killer: Prefix,
    path: &str,
    killer_name: &str,
    reason: &str,
) {
    let Some(session) = ctx.dir.session(victim) else {
        return;
    };
    let kill = Message::new("KILL", [session.nick.clone(), format!("{path} ({reason})")])
        .with_prefix(killer);
    let error = closing_link(session, &format!("Killed ({killer_name} ({reason}))"));
    let audience = Audience::new().session(victim);
    ctx.send(audience.clone(), kill);
    ctx.send(audience, error);

    info!(session = %victim, killer = %killer_name, reason = %reason, "Session killed");
    remove_session(ctx, victim, reason);
}
