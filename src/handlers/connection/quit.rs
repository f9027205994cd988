//! QUIT handler and session teardown shared by QUIT, KILL and services.

use super::super::{Audience, Context, Handler, HandlerResult};
use crate::state::{Session, SessionId};
use slirc_proto::Message;
use tracing::info;

/// Handler for QUIT command.
pub struct QuitHandler;

impl Handler for QuitHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let id = ctx.session;
        let reason = msg.trailing();
        let caller = ctx.caller()?;
        if caller.logged_in {
            let error = closing_link(caller, reason);
            broadcast_quit(ctx, id, reason, true);
            ctx.send_caller(error);
        }
        remove_session(ctx, id, reason);
        Ok(())
    }
}

/// Tell everybody sharing a channel with `id` (and services, when
/// `to_services`) that it quit. Must run before the session is removed.
pub fn broadcast_quit(ctx: &mut Context<'_>, id: SessionId, reason: &str, to_services: bool) {
    let Some(session) = ctx.dir.session(id) else {
        return;
    };
    if !session.logged_in {
        return;
    }
    let quit = Message::new("QUIT", [reason]).with_prefix(session.prefix());
    let mut audience = Audience::new().peers(ctx.dir, id);
    if to_services {
        audience = audience.services(ctx.dir);
    }
    ctx.send(audience, quit);
}

/// `ERROR :Closing Link: nick[host] (reason)`
pub fn closing_link(session: &Session, reason: &str) -> Message {
    Message::new(
        "ERROR",
        [format!(
            "Closing Link: {}[{}] ({})",
            session.nick, session.host, reason
        )],
    )
}

/// Remove a session and everything hanging off it.
pub fn remove_session(ctx: &mut Context<'_>, id: SessionId, reason: &str) {
    if let Some(session) = ctx.dir.delete_session(id) {
        crate::metrics::record_session_deleted();
        info!(session = %id, nick = %session.nick, reason = %reason, "Session deleted");
    }
}
