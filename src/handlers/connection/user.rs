//! USER handler.

use super::super::{Context, Handler, HandlerResult};
use super::welcome::maybe_login;
use slirc_proto::Message;

/// Handler for USER command.
///
/// `USER <username> <mode> <unused> :<realname>`. Username and realname are
/// kept even after login.
pub struct UserHandler;

impl Handler for UserHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let session = ctx.caller_mut()?;
        session.username = msg.params[0].clone();
        session.realname = msg.trailing().to_string();
        maybe_login(ctx)
    }
}
