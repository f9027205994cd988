//! Command handler context and the handler trait.

use super::outbox::{Audience, Outbox};
use crate::config::Config;
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::helpers::{server_notice, server_reply};
use crate::state::{Directory, Session, SessionId};
use crate::verify::Verifier;
use chrono::{DateTime, Utc};
use slirc_proto::{Message, Prefix, Response};
use tracing::debug;

/// A command handler.
///
/// Handlers run on the serialized apply path. They read and mutate the
/// Directory through `ctx.dir` and push output through `ctx`; they never
/// block and never look at wall-clock time.
pub trait Handler: Send + Sync {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult;
}

/// Handler context passed to each command handler.
pub struct Context<'a> {
    /// Replicated state.
    pub dir: &'a mut Directory,
    pub config: &'a Config,
    /// Challenge verifier, when one is configured.
    pub verifier: Option<&'a dyn Verifier>,
    /// The session the command arrived on.
    pub session: SessionId,
    /// Replicated timestamp of the command.
    pub now: DateTime<Utc>,
    /// Caller as named in numeric replies. Set by the dispatcher.
    pub reply_nick: String,
    pub out: Outbox,
}

impl<'a> Context<'a> {
    pub fn new(
        dir: &'a mut Directory,
        config: &'a Config,
        verifier: Option<&'a dyn Verifier>,
        session: SessionId,
        now: DateTime<Utc>,
        replay: bool,
    ) -> Self {
        Self {
            dir,
            config,
            verifier,
            session,
            now,
            reply_nick: "*".to_string(),
            out: Outbox::new(session, replay),
        }
    }

    pub fn server_name(&self) -> &str {
        &self.config.server.name
    }

    pub fn server_prefix(&self) -> Prefix {
        Prefix::server(&self.config.server.name)
    }

    /// The calling session.
    pub fn caller(&self) -> Result<&Session, HandlerError> {
        self.dir
            .session(self.session)
            .ok_or_else(|| HandlerError::Internal(format!("session {} vanished", self.session)))
    }

    pub fn caller_mut(&mut self) -> Result<&mut Session, HandlerError> {
        let id = self.session;
        self.dir
            .session_mut(id)
            .ok_or_else(|| HandlerError::Internal(format!("session {id} vanished")))
    }

    /// Audience containing only the caller.
    pub fn to_caller(&self) -> Audience {
        Audience::new().session(self.session)
    }

    /// Audience containing every services link.
    pub fn to_services(&self) -> Audience {
        Audience::new().services(self.dir)
    }

    pub fn send(&mut self, audience: Audience, msg: Message) {
        self.out.push(audience, msg);
    }

    pub fn send_caller(&mut self, msg: Message) {
        let audience = self.to_caller();
        self.out.push(audience, msg);
    }

    /// Numeric reply to the caller. `params` follow the caller's nick.
    pub fn reply(&mut self, response: Response, params: Vec<String>) {
        let mut full = Vec::with_capacity(params.len() + 1);
        full.push(self.reply_nick.clone());
        full.extend(params);
        let msg = server_reply(self.server_name(), response, full);
        self.send_caller(msg);
    }

    /// Server NOTICE to the caller.
    pub fn notice(&mut self, text: impl Into<String>) {
        let msg = server_notice(self.server_name(), &self.reply_nick, text);
        self.send_caller(msg);
    }

    /// Turn a handler error into a reply to the caller and count it.
    ///
    /// Used by the dispatcher, and by handlers working through a list of
    /// targets where one failure must not stop the rest.
    pub fn report(&mut self, err: &HandlerError, cmd_name: &str) {
        crate::metrics::record_command_error(cmd_name, err.error_code());
        debug!(command = %cmd_name, session = %self.session, error = %err, "Command error");
        if let Some(reply) = err.to_irc_reply(self.server_name(), &self.reply_nick, cmd_name) {
            self.send_caller(reply);
        }
    }

    /// Run `f` with `id` standing in as the caller, so numeric replies it
    /// produces go to `id` under its own nick. Used when services act on a
    /// user's behalf.
    pub fn acting_as<R>(&mut self, id: SessionId, f: impl FnOnce(&mut Self) -> R) -> R {
        let nick = match self.dir.session(id) {
            Some(s) => s.reply_nick().to_string(),
            None => "*".to_string(),
        };
        let session = std::mem::replace(&mut self.session, id);
        let reply_nick = std::mem::replace(&mut self.reply_nick, nick);
        let result = f(self);
        self.session = session;
        self.reply_nick = reply_nick;
        result
    }
}
