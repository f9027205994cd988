//! PING handler.

use super::super::{Context, Handler, HandlerError, HandlerResult};
use slirc_proto::Message;

/// Handler for PING command. Also answers PING from services links.
pub struct PingHandler;

impl Handler for PingHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        // PING <token>
        let token = msg.param(0).ok_or(HandlerError::NoOrigin)?;
        let pong = Message::new("PONG", [token]).with_prefix(ctx.server_prefix());
        ctx.send_caller(pong);
        Ok(())
    }
}
