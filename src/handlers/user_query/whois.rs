//! WHOIS handler for detailed user information queries.

use super::super::{Context, Handler, HandlerError, HandlerResult};
use crate::state::ChanKey;
use slirc_proto::{Message, Response};

/// Handler for WHOIS command.
///
/// `WHOIS <nick>`
///
/// Secret channels only show up in `RPL_WHOISCHANNELS` when the asker is an
/// operator or shares them.
pub struct WhoisHandler;

impl Handler for WhoisHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let target = &msg.params[0];
        let caller = ctx.caller()?;
        let asker_is_oper = caller.operator;
        let asker_channels = caller.channels.clone();

        let session = ctx
            .dir
            .session_by_nick(target)
            .ok_or_else(|| HandlerError::NoSuchNick(target.clone()))?;

        let mut channels: Vec<String> = session
            .channels
            .iter()
            .filter_map(|key: &ChanKey| ctx.dir.channel(key.as_str()))
            .filter(|c| !c.is_secret() || asker_is_oper || asker_channels.contains(&ChanKey::new(&c.name)))
            .map(|c| {
                let prefix = c.member(&session.nick).map(|p| p.prefix()).unwrap_or("");
                format!("{prefix}{}", c.name)
            })
            .collect();
        channels.sort();

        let nick = session.nick.clone();
        let user = (
            session.username.clone(),
            session.host.clone(),
            session.realname.clone(),
        );
        let operator = session.operator;
        let away = session.away.clone();
        let registered = session.modes.contains(&'r');
        let idle = (ctx.now - session.last_non_ping).num_seconds();
        let signon = session.created_at.timestamp();
        let server = ctx.server_name().to_string();

        ctx.reply(
            Response::RPL_WHOISUSER,
            vec![nick.clone(), user.0, user.1, "*".to_string(), user.2],
        );
        if !channels.is_empty() {
            ctx.reply(
                Response::RPL_WHOISCHANNELS,
                vec![nick.clone(), channels.join(" ")],
            );
        }
        ctx.reply(
            Response::RPL_WHOISSERVER,
            vec![nick.clone(), server, "RobustIRC".to_string()],
        );
        if operator {
            ctx.reply(
                Response::RPL_WHOISOPERATOR,
                vec![nick.clone(), "is an IRC operator".to_string()],
            );
        }
        if !away.is_empty() {
            ctx.reply(Response::RPL_AWAY, vec![nick.clone(), away]);
        }
        ctx.reply(
            Response::RPL_WHOISIDLE,
            vec![
                nick.clone(),
                idle.to_string(),
                signon.to_string(),
                "seconds idle, signon time".to_string(),
            ],
        );
        if registered {
            ctx.reply(
                Response::RPL_WHOISREGNICK,
                vec![nick.clone(), "user has identified to services".to_string()],
            );
        }
        ctx.reply(
            Response::RPL_ENDOFWHOIS,
            vec![nick, "End of /WHOIS list".to_string()],
        );
        Ok(())
    }
}
