//! Login sequence and MOTD.

use super::super::{Context, Handler, HandlerResult};
use super::pass::extract_credential;
use crate::handlers::oper::oper_up;
use crate::state::Session;
use crate::verify::Purpose;
use slirc_proto::{MAX_CHANNEL_LEN, MAX_NICK_LEN, Message, Response};
use tracing::info;

/// Handler for MOTD command.
pub struct MotdHandler;

impl Handler for MotdHandler {
    fn handle(&self, ctx: &mut Context<'_>, _msg: &Message) -> HandlerResult {
        send_motd(ctx);
        Ok(())
    }
}

pub fn send_motd(ctx: &mut Context<'_>) {
    let name = ctx.server_name().to_string();
    ctx.reply(
        Response::RPL_MOTDSTART,
        vec![format!("- {name} Message of the day -")],
    );
    for line in ctx.config.server.motd.clone() {
        ctx.reply(Response::RPL_MOTD, vec![format!("- {line}")]);
    }
    ctx.reply(Response::RPL_ENDOFMOTD, vec!["End of MOTD command".to_string()]);
}

/// The line introducing `session` to services.
pub fn services_nick_line(server_name: &str, session: &Session, modes: &str) -> Message {
    Message::new(
        "NICK",
        [
            session.nick.as_str(),
            "1",
            "1",
            session.username.as_str(),
            session.host.as_str(),
            server_name,
            session.svid.as_str(),
            modes,
            session.realname.as_str(),
        ],
    )
}

/// Log the caller in once it has both a nickname and a username.
///
/// When login challenges are required, an unverified caller is sent the
/// challenge URL instead and stays unregistered.
pub fn maybe_login(ctx: &mut Context<'_>) -> HandlerResult {
    let caller = ctx.caller()?;
    if caller.logged_in || caller.nick.is_empty() || caller.username.is_empty() {
        return Ok(());
    }
    let pass = caller.pass.clone();
    let nick = caller.nick.clone();
    let last_activity = caller.last_activity;

    let challenge_required = ctx
        .config
        .captcha
        .as_ref()
        .is_some_and(|c| c.required_for_login);
    if challenge_required && let Some(verifier) = ctx.verifier {
        let proof = extract_credential(&pass, "captcha").unwrap_or_default();
        if verifier
            .verify(ctx.session, proof, &Purpose::login(ctx.now), ctx.now)
            .is_err()
        {
            let url = verifier.challenge_url(ctx.session, &Purpose::login(last_activity));
            ctx.reply_nick = nick;
            ctx.notice(format!("To login, please go to {url}"));
            crate::metrics::record_challenge("login");
            return Ok(());
        }
    }

    let session = ctx.caller_mut()?;
    session.logged_in = true;
    ctx.reply_nick = nick.clone();

    let server = ctx.config.server.clone();
    ctx.reply(Response::RPL_WELCOME, vec!["Welcome to RobustIRC!".to_string()]);
    ctx.reply(
        Response::RPL_YOURHOST,
        vec![format!("Your host is {}", server.name)],
    );
    ctx.reply(
        Response::RPL_CREATED,
        vec![format!("This server was created {}", server.created)],
    );
    ctx.reply(
        Response::RPL_MYINFO,
        vec![server.name.clone(), "v1".into(), "i".into(), "nstix".into()],
    );
    ctx.reply(
        Response::RPL_ISUPPORT,
        vec![
            "CHANTYPES=#".to_string(),
            format!("CHANNELLEN={MAX_CHANNEL_LEN}"),
            format!("NICKLEN={MAX_NICK_LEN}"),
            "MODES=1".to_string(),
            "PREFIX=(o)@".to_string(),
            "KNOCK".to_string(),
            format!("NETWORK={}", server.network),
            "are supported by this server".to_string(),
        ],
    );

    let caller = ctx.caller()?;
    let intro = services_nick_line(&server.name, caller, "+");
    let prefix = caller.prefix();
    let services = ctx.to_services();
    ctx.send(services.clone(), intro);

    if let Some(password) = extract_credential(&pass, "nickserv").filter(|p| !p.is_empty()) {
        let identify = Message::new("PRIVMSG", ["NickServ".to_string(), format!("IDENTIFY {password}")])
            .with_prefix(prefix);
        ctx.send(services, identify);
    }

    if let Some(oper) = extract_credential(&pass, "oper")
        && let Ok(line) = format!("OPER {oper}").parse::<Message>()
        && line.params.len() > 1
        && let Err(e) = oper_up(ctx, &line.params[0], &line.params[1])
        && let Some(reply) = e.to_irc_reply(&server.name, &nick, "OPER")
    {
        ctx.send_caller(reply);
    }

    ctx.caller_mut()?.pass.clear();
    send_motd(ctx);

    crate::metrics::record_login();
    info!(session = %ctx.session, nick = %nick, "Session logged in");
    Ok(())
}
