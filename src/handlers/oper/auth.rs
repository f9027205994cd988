//! OPER handler.

use super::super::{Context, Handler, HandlerError, HandlerResult};
use slirc_proto::{Message, Response};
use tracing::info;

/// Handler for OPER command.
///
/// `OPER <name> <password>`
pub struct OperHandler;

impl Handler for OperHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        oper_up(ctx, &msg.params[0], &msg.params[1])
    }
}

/// Grant operator status if `name`/`password` match an oper block.
pub fn oper_up(ctx: &mut Context<'_>, name: &str, password: &str) -> HandlerResult {
    if ctx.config.find_oper(name, password).is_none() {
        return Err(HandlerError::PasswdMismatch);
    }

    let session = ctx.caller_mut()?;
    session.operator = true;
    session.modes.insert('o');
    let nick = session.nick.clone();
    let modes = session.mode_string();

    ctx.reply(
        Response::RPL_YOUREOPER,
        vec!["You are now an IRC operator".to_string()],
    );
    let audience = ctx.to_caller().services(ctx.dir);
    let mode = Message::new("MODE", [nick.as_str(), modes.as_str()]).with_prefix(ctx.server_prefix());
    ctx.send(audience, mode);

    info!(session = %ctx.session, nick = %nick, oper = %name, "Operator authenticated");
    Ok(())
}
