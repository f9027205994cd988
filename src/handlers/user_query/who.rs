//! WHO handler.

use super::super::{Context, Handler, HandlerResult};
use slirc_proto::{Message, Response};

/// Handler for WHO command.
///
/// `WHO [channel]`
///
/// Lists the members of a channel. Secret channels are only listed for
/// their own members; WHO on nicknames is not supported and yields just the
/// end marker.
pub struct WhoHandler;

impl Handler for WhoHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let Some(mask) = msg.param(0) else {
            ctx.reply(Response::RPL_ENDOFWHO, vec!["End of /WHO list".to_string()]);
            return Ok(());
        };
        let nick = ctx.caller()?.nick.clone();
        let server = ctx.server_name().to_string();

        let mut rows = Vec::new();
        if let Some(chan) = ctx.dir.channel(mask)
            && (!chan.is_secret() || chan.is_member(&nick))
        {
            for key in chan.members.keys() {
                let Some(member) = ctx.dir.session_by_nick(key.as_str()) else {
                    continue;
                };
                let status = if member.is_away() { "G" } else { "H" };
                rows.push(vec![
                    mask.to_string(),
                    member.username.clone(),
                    member.host.clone(),
                    server.clone(),
                    member.nick.clone(),
                    status.to_string(),
                    format!("0 {}", member.realname),
                ]);
            }
        }
        rows.sort_by(|a, b| a[4].cmp(&b[4]));

        for row in rows {
            ctx.reply(Response::RPL_WHOREPLY, row);
        }
        ctx.reply(
            Response::RPL_ENDOFWHO,
            vec![mask.to_string(), "End of /WHO list".to_string()],
        );
        Ok(())
    }
}
