//! TOPIC from a services link.

use super::super::{Audience, Context, Handler, HandlerError, HandlerResult};
use super::services_origin;
use chrono::DateTime;
use slirc_proto::{Message, Response};

/// Handler for `server_TOPIC`.
///
/// `:<bot> TOPIC <channel> <setter> <timestamp> :<topic>`
///
/// An empty topic clears it. The setter and timestamp are taken as given,
/// so services can restore a topic kept across restarts.
pub struct ServerTopicHandler;

impl Handler for ServerTopicHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let name = &msg.params[0];
        if ctx.dir.channel(name).is_none() {
            return Err(HandlerError::NoSuchChannel(name.clone()));
        }
        let topic = msg.trailing().to_string();

        let (setter, time) = if topic.is_empty() {
            (String::new(), None)
        } else {
            match msg.params[2].parse::<i64>() {
                Ok(ts) => (msg.params[1].clone(), DateTime::from_timestamp(ts, 0)),
                Err(e) => {
                    ctx.reply(
                        Response::ERR_NEEDMOREPARAMS,
                        vec![name.clone(), format!("Could not parse timestamp: {e}")],
                    );
                    return Ok(());
                }
            }
        };

        if let Some(chan) = ctx.dir.channel_mut(name) {
            chan.topic = topic.clone();
            chan.topic_nick = setter;
            chan.topic_time = time;
        }
        let audience = Audience::new().channel(ctx.dir, name);
        ctx.send(
            audience,
            Message::new("TOPIC", [name.as_str(), topic.as_str()]).with_prefix(services_origin(msg)),
        );
        Ok(())
    }
}
