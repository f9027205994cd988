//! USERHOST handler.

use super::super::{Context, Handler, HandlerResult};
use slirc_proto::{Message, Response};

/// Handler for USERHOST command.
///
/// `USERHOST <nick> [<nick> ...]`
///
/// Each known nick yields `nick[*]=<+|->nick!user@host`, where `*` marks an
/// operator and `-` an away user. Unknown nicks are skipped.
pub struct UserhostHandler;

impl Handler for UserhostHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let entries: Vec<String> = msg
            .params
            .iter()
            .filter_map(|nick| ctx.dir.session_by_nick(nick))
            .map(|s| {
                let oper = if s.operator { "*" } else { "" };
                let away = if s.is_away() { "-" } else { "+" };
                format!("{}{oper}={away}{}", s.nick, s.prefix())
            })
            .collect();
        ctx.reply(Response::RPL_USERHOST, vec![entries.join(" ")]);
        Ok(())
    }
}
