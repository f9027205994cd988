//! Channel MODE from a services link.

use super::super::{Audience, Context, Handler, HandlerError, HandlerResult};
use super::services_origin;
use crate::error::ChannelError;
use crate::state::NickKey;
use slirc_proto::mode::{parse_modes, render_modes};
use slirc_proto::{Message, ModeContext, Response};

/// Flags services may toggle, `r` (registered channel) included.
const SERVICES_FLAGS: &[char] = &['i', 'n', 'r', 's', 't'];

/// Handler for `server_MODE`.
///
/// `:<bot> MODE <channel> <modes> [args...]`
///
/// Applied without privilege checks. The channel hears the change only when
/// every letter was accepted.
pub struct ServerModeHandler;

impl Handler for ServerModeHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let name = msg.param(0).ok_or(HandlerError::NeedMoreParams)?;
        let display = ctx
            .dir
            .channel(name)
            .map(|c| c.name.clone())
            .ok_or_else(|| HandlerError::NoSuchChannel(name.to_string()))?;
        let modestr = msg.param(1).unwrap_or_default();
        let args = msg.params.get(2..).unwrap_or_default();

        let mut applied = Vec::new();
        let mut replied = false;
        for change in parse_modes(ModeContext::Channel, modestr, args) {
            let on = change.sign.is_plus();
            match change.letter {
                letter if SERVICES_FLAGS.contains(&letter) => {
                    if let Some(chan) = ctx.dir.channel_mut(name) {
                        chan.set_mode(letter, on);
                    }
                    applied.push(change);
                }
                'o' => {
                    let member = change.arg.clone().unwrap_or_default();
                    let perms = ctx
                        .dir
                        .channel_mut(name)
                        .and_then(|c| c.members.get_mut(&NickKey::new(&member)));
                    if let Some(perms) = perms {
                        if perms.is_op() != on {
                            perms.set_op(on);
                        }
                        applied.push(change);
                    } else {
                        let err = ChannelError::UserNotInChannel {
                            nick: member,
                            channel: display.clone(),
                        };
                        ctx.report(&err.into(), "MODE");
                        replied = true;
                    }
                }
                letter => {
                    ctx.reply(
                        Response::ERR_UNKNOWNMODE,
                        vec![letter.to_string(), "is unknown mode char to me".to_string()],
                    );
                    replied = true;
                }
            }
        }

        if !applied.is_empty() && !replied {
            let (modes, args) = render_modes(&applied);
            let mut params = vec![display, modes];
            params.extend(args);
            let audience = Audience::new().channel(ctx.dir, name);
            ctx.send(audience, Message::new("MODE", params).with_prefix(services_origin(msg)));
        }
        Ok(())
    }
}
