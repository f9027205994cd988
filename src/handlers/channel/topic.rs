//! TOPIC handler.

use super::super::{Audience, Context, Handler, HandlerResult};
use super::joined;
use crate::error::ChannelError;
use slirc_proto::{Message, Response};

/// Handler for TOPIC command.
///
/// `TOPIC <channel> [<topic>]`
///
/// Without a topic this is a query. An empty topic clears it. On `+t`
/// channels only operators may change it.
pub struct TopicHandler;

impl Handler for TopicHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let name = &msg.params[0];
        let caller = ctx.caller()?;
        let nick = caller.nick.clone();
        let prefix = caller.prefix();

        let chan = joined(ctx, name, &nick)?;
        let display = chan.name.clone();
        let locked = chan.has_mode('t') && !chan.is_op(&nick);

        let Some(topic) = msg.param(1) else {
            send_topic(ctx, name);
            return Ok(());
        };
        if locked {
            return Err(ChannelError::ChanOpPrivsNeeded(display).into());
        }

        let now = ctx.now;
        if let Some(chan) = ctx.dir.channel_mut(name) {
            chan.topic = topic.to_string();
            chan.topic_nick = nick.clone();
            chan.topic_time = Some(now);
        }

        let members = Audience::new().channel(ctx.dir, name);
        ctx.send(
            members,
            Message::new("TOPIC", [display.as_str(), topic]).with_prefix(prefix.clone()),
        );

        let timestamp = if topic.is_empty() { 0 } else { now.timestamp() };
        let services = ctx.to_services();
        ctx.send(
            services,
            Message::new(
                "TOPIC",
                [display, nick, timestamp.to_string(), topic.to_string()],
            )
            .with_prefix(prefix),
        );
        Ok(())
    }
}

/// RPL_NOTOPIC, or RPL_TOPIC plus RPL_TOPICWHOTIME.
pub fn send_topic(ctx: &mut Context<'_>, name: &str) {
    let Some(chan) = ctx.dir.channel(name) else {
        return;
    };
    let display = chan.name.clone();
    if chan.topic.is_empty() {
        ctx.reply(
            Response::RPL_NOTOPIC,
            vec![display, "No topic is set".to_string()],
        );
        return;
    }
    let topic = chan.topic.clone();
    let setter = chan.topic_nick.clone();
    let time = chan.topic_time.map_or(0, |t| t.timestamp());
    ctx.reply(Response::RPL_TOPIC, vec![display.clone(), topic]);
    ctx.reply(
        Response::RPL_TOPICWHOTIME,
        vec![display, setter, time.to_string()],
    );
}
