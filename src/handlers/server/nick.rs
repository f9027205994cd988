//! NICK from a services link: introduce a services user.

use super::super::helpers::visible_host;
use super::super::{Context, Handler, HandlerError, HandlerResult};
use crate::state::{CompositeId, Session};
use slirc_proto::Message;
use tracing::info;

/// Handler for `server_NICK`.
///
/// `NICK <nick> <hopcount> <timestamp> <username> <host> <server> <svid> <modes> :<realname>`
///
/// Creates a logged-in subsession of the link whose id is derived from the
/// nickname. The single-parameter form (a rename) is ignored.
pub struct ServerNickHandler;

impl Handler for ServerNickHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        if msg.params.len() == 1 {
            return Ok(());
        }
        if msg.params.len() < 4 {
            return Err(HandlerError::NeedMoreParams);
        }
        let nick = &msg.params[0];
        let id = CompositeId::subsession(ctx.session.primary, nick);
        if ctx.dir.find_nick(nick).is_some() || ctx.dir.contains_session(id) {
            return Err(HandlerError::NicknameInUse(nick.clone()));
        }

        let host = visible_host(&ctx.config.server.host_prefix, ctx.session.primary);
        let mut session = Session::new(id, host, ctx.now);
        session.nick = nick.clone();
        session.username = msg.params[3].clone();
        session.realname = msg.trailing().to_string();
        session.logged_in = true;
        ctx.dir.create_session(session);
        crate::metrics::record_session_created();
        info!(session = %id, nick = %nick, "Services user introduced");
        Ok(())
    }
}
