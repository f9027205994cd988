//! Command handler registry and dispatch.
//!
//! The table is closed: it is built once in [`Registry::new`] and maps each
//! verb to a handler plus the minimum number of parameters it needs.
//! Messages arriving on a services link are looked up as `server_<VERB>`.

use super::context::{Context, Handler};
use crate::error::HandlerError;
use crate::handlers::{
    channel::{
        InviteHandler, JoinHandler, KickHandler, KnockHandler, ListHandler, NamesHandler,
        PartHandler, TopicHandler,
    },
    connection::{
        MotdHandler, NickHandler, PassHandler, PingHandler, QuitHandler, UserHandler,
    },
    messaging::{NoticeHandler, PrivmsgHandler},
    mode::ModeHandler,
    oper::{KillHandler, OperHandler},
    server::{
        ServerHandler, ServerInviteHandler, ServerJoinHandler, ServerKickHandler,
        ServerKillHandler, ServerModeHandler, ServerNickHandler, ServerPartHandler,
        ServerPrivmsgHandler, ServerQuitHandler, ServerTopicHandler, SvsHoldHandler,
        SvsJoinHandler, SvsModeHandler, SvsNickHandler, SvsPartHandler,
    },
    service_aliases::ServiceAliasHandler,
    user_query::{IsonHandler, UserhostHandler, WhoHandler, WhoisHandler},
    user_status::AwayHandler,
};
use crate::telemetry::{CommandTimer, spans};
use slirc_proto::Message;
use std::collections::HashMap;
use tracing::trace;

/// Verbs an unregistered client may use.
const PRE_REGISTRATION: &[&str] = &["PASS", "NICK", "USER", "SERVER", "PING", "QUIT"];

struct Entry {
    handler: Box<dyn Handler>,
    min_params: usize,
}

/// Registry of command handlers.
pub struct Registry {
    handlers: HashMap<&'static str, Entry>,
}

impl Registry {
    /// Create a new registry with all handlers registered.
    pub fn new() -> Self {
        let mut registry = Self {
            handlers: HashMap::new(),
        };

        // Connection/registration handlers
        registry.insert("PING", 0, PingHandler);
        registry.insert("PASS", 0, PassHandler);
        registry.insert("NICK", 0, NickHandler);
        registry.insert("USER", 3, UserHandler);
        registry.insert("QUIT", 0, QuitHandler);
        registry.insert("MOTD", 0, MotdHandler);

        // Channel handlers
        registry.insert("JOIN", 1, JoinHandler);
        registry.insert("PART", 1, PartHandler);
        registry.insert("KICK", 2, KickHandler);
        registry.insert("TOPIC", 1, TopicHandler);
        registry.insert("NAMES", 0, NamesHandler);
        registry.insert("LIST", 0, ListHandler);
        registry.insert("INVITE", 2, InviteHandler);
        registry.insert("KNOCK", 1, KnockHandler);
        registry.insert("MODE", 1, ModeHandler);

        // Messaging handlers
        registry.insert("PRIVMSG", 0, PrivmsgHandler);
        registry.insert("NOTICE", 0, NoticeHandler);

        // User query handlers
        registry.insert("WHO", 0, WhoHandler);
        registry.insert("WHOIS", 1, WhoisHandler);
        registry.insert("USERHOST", 1, UserhostHandler);
        registry.insert("ISON", 1, IsonHandler);
        registry.insert("AWAY", 0, AwayHandler);

        // Operator handlers
        registry.insert("OPER", 2, OperHandler);
        registry.insert("KILL", 1, KillHandler);

        // Service aliases
        for (verbs, service) in [
            (["NICKSERV", "NS"], "NickServ"),
            (["CHANSERV", "CS"], "ChanServ"),
            (["OPERSERV", "OS"], "OperServ"),
            (["MEMOSERV", "MS"], "MemoServ"),
            (["HOSTSERV", "HS"], "HostServ"),
            (["BOTSERV", "BS"], "BotServ"),
        ] {
            for verb in verbs {
                registry.insert(verb, 0, ServiceAliasHandler::new(service));
            }
        }

        // Services link
        registry.insert("SERVER", 2, ServerHandler);
        registry.insert("server_PING", 0, PingHandler);
        registry.insert("server_QUIT", 0, ServerQuitHandler);
        registry.insert("server_NICK", 0, ServerNickHandler);
        registry.insert("server_MODE", 0, ServerModeHandler);
        registry.insert("server_JOIN", 0, ServerJoinHandler);
        registry.insert("server_PART", 0, ServerPartHandler);
        registry.insert("server_PRIVMSG", 0, ServerPrivmsgHandler::privmsg());
        registry.insert("server_NOTICE", 0, ServerPrivmsgHandler::notice());
        registry.insert("server_TOPIC", 3, ServerTopicHandler);
        registry.insert("server_SVSNICK", 2, SvsNickHandler);
        registry.insert("server_SVSMODE", 2, SvsModeHandler);
        registry.insert("server_SVSHOLD", 1, SvsHoldHandler);
        registry.insert("server_SVSJOIN", 2, SvsJoinHandler);
        registry.insert("server_SVSPART", 2, SvsPartHandler);
        registry.insert("server_KILL", 1, ServerKillHandler);
        registry.insert("server_KICK", 2, ServerKickHandler);
        registry.insert("server_INVITE", 2, ServerInviteHandler);

        registry
    }

    fn insert(&mut self, verb: &'static str, min_params: usize, handler: impl Handler + 'static) {
        self.handlers.insert(
            verb,
            Entry {
                handler: Box::new(handler),
                min_params,
            },
        );
    }

    /// Minimum parameter count of a registered verb.
    pub fn min_params(&self, verb: &str) -> Option<usize> {
        self.handlers.get(verb).map(|e| e.min_params)
    }

    /// Every registered verb, sorted.
    pub fn verbs(&self) -> Vec<&'static str> {
        let mut verbs: Vec<_> = self.handlers.keys().copied().collect();
        verbs.sort_unstable();
        verbs
    }

    /// Dispatch a message to the appropriate handler.
    ///
    /// Unknown verbs are ignored. A handler error is turned into a reply to
    /// the caller; nothing here fails.
    pub fn dispatch(&self, ctx: &mut Context<'_>, msg: &Message) {
        let Ok(caller) = ctx.caller() else {
            return;
        };
        let is_server = caller.is_server();
        let logged_in = caller.logged_in;
        ctx.reply_nick = if is_server {
            msg.source_nickname().unwrap_or("*").to_string()
        } else if logged_in {
            caller.reply_nick().to_string()
        } else {
            "*".to_string()
        };

        let cmd_name = if is_server {
            format!("server_{}", msg.command)
        } else {
            msg.command.clone()
        };

        let Some(entry) = self.handlers.get(cmd_name.as_str()) else {
            trace!(command = %cmd_name, session = %ctx.session, "Ignoring unknown command");
            return;
        };

        let span = spans::command(&cmd_name, ctx.session, msg.param(0));
        let _enter = span.enter();
        let _timer = CommandTimer::new(&cmd_name);

        let result = if !is_server && !logged_in && !PRE_REGISTRATION.contains(&cmd_name.as_str())
        {
            Err(HandlerError::NotRegistered)
        } else if msg.params.len() < entry.min_params {
            Err(HandlerError::NeedMoreParams)
        } else {
            entry.handler.handle(ctx, msg)
        };

        if let Err(e) = result {
            ctx.report(&e, &msg.command);
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
