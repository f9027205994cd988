//! User modes.

use super::super::{Audience, Context, HandlerError, HandlerResult};
use crate::state::SessionId;
use slirc_proto::mode::{parse_modes, render_modes};
use slirc_proto::{Message, ModeContext};

/// `MODE <nick> [<modes>]`. Users may only change themselves (operators
/// may change anybody), and only `i` is settable this way.
pub(super) fn user_mode(ctx: &mut Context<'_>, msg: &Message, target: SessionId) -> HandlerResult {
    let caller = ctx.caller()?;
    if target != ctx.session && !caller.operator {
        return Err(HandlerError::UsersDontMatch);
    }
    let prefix = caller.prefix();

    let Some(modestr) = msg.param(1) else {
        let Some(session) = ctx.dir.session(target) else {
            return Ok(());
        };
        let reply = Message::new("MODE", [session.nick.clone(), session.mode_string()])
            .with_prefix(prefix);
        let audience = ctx.to_caller().services(ctx.dir);
        ctx.send(audience, reply);
        return Ok(());
    };

    let Some(session) = ctx.dir.session_mut(target) else {
        return Ok(());
    };
    let mut applied = Vec::new();
    for change in parse_modes(ModeContext::User, modestr, &msg.params[2..]) {
        if change.letter == 'i' {
            if change.sign.is_plus() {
                session.modes.insert('i');
            } else {
                session.modes.remove(&'i');
            }
            applied.push(change);
        }
    }
    let nick = session.nick.clone();

    if !applied.is_empty() {
        let (modes, _) = render_modes(&applied);
        let audience = Audience::new().session(target).services(ctx.dir);
        ctx.send(audience, Message::new("MODE", [nick, modes]).with_prefix(prefix));
    }
    Ok(())
}
