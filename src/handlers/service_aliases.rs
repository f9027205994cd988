//! Service command aliases: NS (NickServ), CS (ChanServ) and friends.
//!
//! Provides shortcut commands for talking to services bots.

use super::messaging::PrivmsgHandler;
use super::{Context, Handler, HandlerResult};
use slirc_proto::Message;

/// Handler for service aliases.
///
/// `NICKSERV <text>` and `NS <text>` are rewritten to
/// `PRIVMSG NickServ :<text>` and routed like any private message, so the
/// bot must have been introduced by a services link.
pub struct ServiceAliasHandler {
    service: &'static str,
}

impl ServiceAliasHandler {
    pub fn new(service: &'static str) -> Self {
        Self { service }
    }

    fn expand(&self, msg: &Message) -> Message {
        let text = msg.params.join(" ");
        Message::new("PRIVMSG", [self.service.to_string(), text])
    }
}

impl Handler for ServiceAliasHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        PrivmsgHandler.handle(ctx, &self.expand(msg))
    }
}
