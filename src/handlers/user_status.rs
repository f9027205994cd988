//! User status handlers: AWAY

use super::{Context, Handler, HandlerResult};
use slirc_proto::{Message, Response};

/// Handler for AWAY command.
///
/// `AWAY [message]`
///
/// A message that is empty after trimming clears the away status.
pub struct AwayHandler;

impl Handler for AwayHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let away = msg.trailing().trim().to_string();
        let now_away = !away.is_empty();
        ctx.caller_mut()?.away = away;

        if now_away {
            ctx.reply(
                Response::RPL_NOWAWAY,
                vec!["You have been marked as being away".to_string()],
            );
        } else {
            ctx.reply(
                Response::RPL_UNAWAY,
                vec!["You are no longer marked as being away".to_string()],
            );
        }
        Ok(())
    }
}
