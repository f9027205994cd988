//! KILL from a services link.

use super::super::connection::broadcast_quit;
use super::super::oper::kill_session;
use super::super::{Context, Handler, HandlerError, HandlerResult};
use super::{link_subsession, origin_name};
use slirc_proto::{Message, Prefix};

/// Handler for `server_KILL`.
///
/// `:<bot> KILL <nick> :<reason>`
///
/// The kill is attributed to the services user named in the origin when the
/// link introduced one by that name, and to the raw origin otherwise.
pub struct ServerKillHandler;

impl Handler for ServerKillHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        if msg.params.len() < 2 {
            return Err(HandlerError::NeedMoreParams);
        }
        let reason = msg.trailing();

        let killer = match link_subsession(ctx, origin_name(msg)) {
            Some(id) => ctx.dir.session(id).map(|s| s.prefix()),
            None => None,
        }
        .or_else(|| msg.prefix.clone())
        .unwrap_or_else(|| ctx.caller().map_or_else(|_| ctx.server_prefix(), |s| s.prefix()));

        let victim = ctx
            .dir
            .find_nick(&msg.params[0])
            .ok_or_else(|| HandlerError::NoSuchNick(msg.params[0].clone()))?;

        let (name, host) = match &killer {
            Prefix::Nickname(nick, _, host) => (nick.clone(), host.clone()),
            Prefix::ServerName(name) => (name.clone(), String::new()),
        };
        let path = format!("ircd!{host}!{name}").replace("!!", "!");

        broadcast_quit(ctx, victim, &format!("Killed: {reason}"), true);
        kill_session(ctx, victim, killer, &path, &name, reason);
        Ok(())
    }
}
