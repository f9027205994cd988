//! ISON handler.

use super::super::{Context, Handler, HandlerResult};
use slirc_proto::{Message, Response};

/// Handler for ISON command.
///
/// Replies with the current spelling of every given nick that is in use.
pub struct IsonHandler;

impl Handler for IsonHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let online: Vec<&str> = msg
            .params
            .iter()
            .filter_map(|nick| ctx.dir.session_by_nick(nick))
            .map(|s| s.nick.as_str())
            .collect();
        let online = online.join(" ");
        ctx.reply(Response::RPL_ISON, vec![online]);
        Ok(())
    }
}
