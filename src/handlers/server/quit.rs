//! QUIT from a services link.

use super::super::connection::{broadcast_quit, remove_session};
use super::super::{Context, Handler, HandlerResult};
use super::{link_subsession, origin_name};
use slirc_proto::Message;
use tracing::info;

/// Handler for `server_QUIT`.
///
/// Without an origin the whole link goes away, taking every subsession
/// with it. With one, only the named subsession (e.g. a nickname enforcer)
/// quits.
pub struct ServerQuitHandler;

impl Handler for ServerQuitHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let reason = msg.trailing();
        if msg.prefix.is_none() {
            let link = ctx.session;
            for sub in ctx.dir.subsessions(link.primary) {
                broadcast_quit(ctx, sub, reason, false);
                remove_session(ctx, sub, reason);
            }
            info!(session = %link, reason = %reason, "Services link closed");
            remove_session(ctx, link, reason);
            return Ok(());
        }

        if let Some(sub) = link_subsession(ctx, origin_name(msg)) {
            broadcast_quit(ctx, sub, reason, false);
            remove_session(ctx, sub, reason);
        }
        Ok(())
    }
}
