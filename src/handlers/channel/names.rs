//! NAMES handler.

use super::super::helpers::split_list;
use super::super::{Context, Handler, HandlerResult};
use slirc_proto::{Message, Response};

/// Handler for NAMES command.
///
/// `NAMES [<channel>{,<channel>}]`
pub struct NamesHandler;

impl Handler for NamesHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        match msg.param(0) {
            Some(list) => {
                for name in split_list(list) {
                    send_names(ctx, name);
                }
            }
            None => ctx.reply(
                Response::RPL_ENDOFNAMES,
                vec!["*".to_string(), "End of /NAMES list.".to_string()],
            ),
        }
        Ok(())
    }
}

/// RPL_NAMREPLY and RPL_ENDOFNAMES for one channel.
pub fn send_names(ctx: &mut Context<'_>, name: &str) {
    let Some(chan) = ctx.dir.channel(name) else {
        ctx.reply(
            Response::RPL_ENDOFNAMES,
            vec![name.to_string(), "End of /NAMES list.".to_string()],
        );
        return;
    };
    let display = chan.name.clone();
    let mut names: Vec<String> = chan
        .members
        .iter()
        .filter_map(|(key, perms)| {
            ctx.dir
                .session_by_nick(key.as_str())
                .map(|s| format!("{}{}", perms.prefix(), s.nick))
        })
        .collect();
    names.sort();

    ctx.reply(
        Response::RPL_NAMREPLY,
        vec!["=".to_string(), display.clone(), names.join(" ")],
    );
    ctx.reply(
        Response::RPL_ENDOFNAMES,
        vec![display, "End of /NAMES list.".to_string()],
    );
}
