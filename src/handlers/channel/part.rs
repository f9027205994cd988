//! PART handler.

use super::super::helpers::split_list;
use super::super::{Audience, Context, Handler, HandlerResult};
use super::joined;
use slirc_proto::Message;

/// Handler for PART command.
///
/// `PART <channel>{,<channel>}`
pub struct PartHandler;

impl Handler for PartHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        for name in split_list(&msg.params[0]) {
            if let Err(e) = part_one(ctx, name) {
                ctx.report(&e, "PART");
            }
        }
        Ok(())
    }
}

fn part_one(ctx: &mut Context<'_>, name: &str) -> HandlerResult {
    let caller = ctx.caller()?;
    let nick = caller.nick.clone();
    let prefix = caller.prefix();
    let display = joined(ctx, name, &nick)?.name.clone();

    let audience = Audience::new().channel(ctx.dir, name).services(ctx.dir);
    ctx.send(
        audience,
        Message::new("PART", [display]).with_prefix(prefix),
    );
    ctx.dir.part(ctx.session, name);
    Ok(())
}
