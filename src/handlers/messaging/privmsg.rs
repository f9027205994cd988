//! PRIVMSG command handler.

use super::super::{Context, Handler, HandlerResult};
use super::common::route_message;
use slirc_proto::Message;

/// Handler for PRIVMSG command.
///
/// `PRIVMSG <target> <text>`
pub struct PrivmsgHandler;

impl Handler for PrivmsgHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        route_message(ctx, msg, true)
    }
}
