//! LIST handler.

use super::super::{Context, Handler, HandlerResult};
use slirc_proto::{Message, Response};

/// Handler for LIST command.
///
/// `LIST [<channel>{,<channel>}]`
///
/// Secret channels are only listed for their members and for operators.
pub struct ListHandler;

impl Handler for ListHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let caller = ctx.caller()?;
        let nick = caller.nick.clone();
        let is_oper = caller.operator;

        let selected: Vec<_> = match msg.param(0) {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter_map(|name| ctx.dir.channel(name))
                .collect(),
            None => ctx.dir.channels().collect(),
        };

        let rows: Vec<Vec<String>> = selected
            .into_iter()
            .filter(|chan| !chan.is_secret() || is_oper || chan.is_member(&nick))
            .map(|chan| {
                vec![
                    chan.name.clone(),
                    chan.members.len().to_string(),
                    chan.topic.clone(),
                ]
            })
            .collect();

        for row in rows {
            ctx.reply(Response::RPL_LIST, row);
        }
        ctx.reply(Response::RPL_LISTEND, vec!["End of LIST".to_string()]);
        Ok(())
    }
}
