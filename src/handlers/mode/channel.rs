//! Channel modes.

use super::super::{Audience, Context, HandlerResult};
use crate::error::ChannelError;
use slirc_proto::mode::{parse_modes, render_modes};
use slirc_proto::{Message, ModeContext, Response};

/// Letters a channel operator toggles without an argument.
const FLAG_MODES: &[char] = &['i', 'n', 's', 't'];

pub(super) fn channel_mode(ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
    let name = &msg.params[0];
    let Some(modestr) = msg.param(1) else {
        send_channel_modes(ctx, name);
        return Ok(());
    };

    let caller = ctx.caller()?;
    let prefix = caller.prefix();
    let nick = caller.nick.clone();
    let is_oper = caller.operator;
    let Some(chan) = ctx.dir.channel(name) else {
        return Ok(());
    };
    let display = chan.name.clone();
    let privileged = is_oper || chan.is_op(&nick);
    let challenge_configured = ctx.config.captcha.is_some();

    // Any reply to the caller withholds the broadcast; applied changes stand.
    let mut applied = Vec::new();
    let mut replied = false;
    for change in parse_modes(ModeContext::Channel, modestr, &msg.params[2..]) {
        if change.letter == 'b' && change.sign.is_plus() {
            ctx.reply(
                Response::RPL_ENDOFBANLIST,
                vec![display.clone(), "End of Channel Ban List".to_string()],
            );
            replied = true;
            continue;
        }
        if !privileged {
            return Err(ChannelError::ChanOpPrivsNeeded(display).into());
        }

        match change.letter {
            letter if FLAG_MODES.contains(&letter) => {
                set_flag(ctx, name, letter, change.sign.is_plus());
                applied.push(change);
            }
            'x' if challenge_configured => {
                set_flag(ctx, name, 'x', change.sign.is_plus());
                applied.push(change);
            }
            'x' => {
                ctx.notice("Cannot set mode +x, no challenge verification is configured");
                replied = true;
            }
            'o' => {
                let member = change.arg.as_deref().unwrap_or_default();
                let perms = ctx
                    .dir
                    .channel_mut(name)
                    .and_then(|c| c.members.get_mut(&crate::state::NickKey::new(member)));
                match perms {
                    Some(perms) if !member.is_empty() => {
                        perms.set_op(change.sign.is_plus());
                        applied.push(change);
                    }
                    _ => {
                        let err = ChannelError::UserNotInChannel {
                            nick: member.to_string(),
                            channel: display.clone(),
                        };
                        ctx.report(&err.into(), "MODE");
                        replied = true;
                    }
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

    for change in &applied {
        crate::metrics::record_mode_change(change.letter);
    }
    if !applied.is_empty() && !replied {
        let (modes, args) = render_modes(&applied);
        let mut params = vec![display, modes];
        params.extend(args);
        let audience = Audience::new().channel(ctx.dir, name).services(ctx.dir);
        ctx.send(audience, Message::new("MODE", params).with_prefix(prefix));
    }
    Ok(())
}

pub(crate) fn set_flag(ctx: &mut Context<'_>, name: &str, letter: char, on: bool) {
    if let Some(chan) = ctx.dir.channel_mut(name) {
        chan.set_mode(letter, on);
    }
}

/// RPL_CHANNELMODEIS for the caller.
pub fn send_channel_modes(ctx: &mut Context<'_>, name: &str) {
    let Some(chan) = ctx.dir.channel(name) else {
        return;
    };
    let params = vec![chan.name.clone(), chan.mode_string()];
    ctx.reply(Response::RPL_CHANNELMODEIS, params);
}
