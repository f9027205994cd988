//! SERVER handshake.

use super::super::connection::{extract_credential, services_nick_line};
use super::super::{Context, Handler, HandlerResult};
use slirc_proto::{Message, Prefix};
use tracing::{info, warn};

/// Handler for SERVER command.
///
/// `SERVER <name> <hopcount> [...]`
///
/// Requires `PASS services=<password>` beforehand. On success the session
/// becomes a link and receives the burst: every logged-in user as a `NICK`
/// line followed by one `SJOIN` per channel it is in, ordered by nickname
/// and then channel name.
pub struct ServerHandler;

impl Handler for ServerHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let name = msg.params[0].clone();
        let caller = ctx.caller()?;
        if caller.is_server() {
            return Ok(());
        }
        let authenticated = extract_credential(&caller.pass, "services")
            .is_some_and(|pw| ctx.config.services_password_ok(pw));
        if !authenticated {
            warn!(session = %ctx.session, server = %name, "Services link rejected");
            ctx.send_caller(Message::new("ERROR", ["Invalid password"]));
            return Ok(());
        }

        let link = ctx.caller_mut()?;
        link.server_name = Some(name.clone());
        link.pass.clear();
        info!(session = %ctx.session, server = %name, "Services link established");

        let server = ctx.server_name().to_string();
        let mut burst = vec![Message::new("SERVER", [server.as_str(), "1", "23"])];
        let mut users: Vec<_> = ctx
            .dir
            .sessions()
            .filter(|s| s.logged_in && !s.is_server() && s.id.is_main())
            .collect();
        users.sort_by_key(|s| slirc_proto::irc_to_lower(&s.nick));
        for user in users {
            burst.push(services_nick_line(&server, user, &user.mode_string()));
            for key in &user.channels {
                let Some(chan) = ctx.dir.channel(key.as_str()) else {
                    continue;
                };
                let prefix = chan.member(&user.nick).map(|p| p.prefix()).unwrap_or("");
                burst.push(
                    Message::new(
                        "SJOIN",
                        ["1".to_string(), chan.name.clone(), format!("{prefix}{}", user.nick)],
                    )
                    .with_prefix(Prefix::server(server.as_str())),
                );
            }
        }

        let audience = ctx.to_services();
        for line in burst {
            ctx.send(audience.clone(), line);
        }
        Ok(())
    }
}
