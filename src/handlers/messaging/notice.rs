//! NOTICE command handler.

use super::super::{Context, Handler, HandlerResult};
use super::common::route_message;
use slirc_proto::Message;

/// Handler for NOTICE command.
///
/// Like PRIVMSG, but never answered with `RPL_AWAY`.
pub struct NoticeHandler;

impl Handler for NoticeHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        route_message(ctx, msg, false)
    }
}
