//! JOIN handler.

use super::super::helpers::split_list;
use super::super::mode::send_channel_modes;
use super::super::{Audience, Context, Handler, HandlerError, HandlerResult};
use super::{names::send_names, topic::send_topic};
use crate::error::ChannelError;
use crate::state::{ChanKey, JoinOutcome};
use crate::verify::Purpose;
use slirc_proto::{ChannelExt, Message, Response};
use tracing::debug;

/// Handler for JOIN command.
///
/// `JOIN <channel>{,<channel>} [<key>{,<key>}]`
///
/// Keys are used as challenge proofs for `+x` channels. Each channel is
/// handled on its own; a failure on one does not stop the rest.
pub struct JoinHandler;

impl Handler for JoinHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let keys: Vec<&str> = msg.param(1).map(|k| k.split(',').collect()).unwrap_or_default();
        for (idx, name) in split_list(&msg.params[0]).enumerate() {
            let key = keys.get(idx).copied().unwrap_or("");
            if let Err(e) = join_one(ctx, name, key) {
                ctx.report(&e, "JOIN");
            }
        }
        Ok(())
    }
}

fn join_one(ctx: &mut Context<'_>, name: &str, key: &str) -> HandlerResult {
    if !name.is_valid_channel() {
        return Err(HandlerError::NoSuchChannel(name.to_string()));
    }
    let caller = ctx.caller()?;
    let invited = caller.invited_to.contains(&ChanKey::new(name));
    let last_activity = caller.last_activity;

    match ctx.dir.channel(name) {
        None => {
            let limit = ctx.config.limits.max_channels;
            if limit > 0 && ctx.dir.channel_count() >= limit {
                return Err(HandlerError::NoSuchChannel(name.to_string()));
            }
        }
        Some(chan) => {
            let invite_only = chan.has_mode('i');
            let challenge = chan.has_mode('x');
            let display = chan.name.clone();
            if invite_only && !invited {
                return Err(ChannelError::InviteOnly(display).into());
            }
            if challenge && !invited {
                let Some(verifier) = ctx.verifier else {
                    return Err(ChannelError::InviteOnly(display).into());
                };
                if verifier
                    .verify(ctx.session, key, &Purpose::join(name, ctx.now), ctx.now)
                    .is_err()
                {
                    let url =
                        verifier.challenge_url(ctx.session, &Purpose::join(name, last_activity));
                    ctx.notice(format!("To join {display}, please go to {url}"));
                    ctx.reply(
                        Response::ERR_INVITEONLYCHAN,
                        vec![
                            display.clone(),
                            format!("Cannot join channel (+x). Please go to {url}"),
                        ],
                    );
                    crate::metrics::record_challenge("join");
                    return Ok(());
                }
            }
            if invite_only || challenge {
                ctx.caller_mut()?.invited_to.remove(&ChanKey::new(name));
            }
        }
    }

    let outcome = ctx
        .dir
        .join(ctx.session, name)
        .ok_or_else(|| HandlerError::Internal(format!("{} cannot join", ctx.session)))?;
    if outcome == JoinOutcome::AlreadyMember {
        return Ok(());
    }

    let mut modes_msg = None;
    if outcome == JoinOutcome::Created {
        if let Some(chan) = ctx.dir.channel_mut(name) {
            chan.set_mode('n', true);
            chan.set_mode('t', true);
        }
        modes_msg = Some(
            Message::new("MODE", [name, "+nt"]).with_prefix(ctx.server_prefix()),
        );
    }

    let chan_name = ctx
        .dir
        .channel(name)
        .map_or_else(|| name.to_string(), |c| c.name.clone());
    let caller = ctx.caller()?;
    let join = Message::new("JOIN", [chan_name.as_str()]).with_prefix(caller.prefix());
    let sjoin_nick = format!("{}{}", if outcome == JoinOutcome::Created { "@" } else { "" }, caller.nick);

    let members = Audience::new().channel(ctx.dir, name);
    ctx.send(members.clone(), join);
    if let Some(modes) = modes_msg {
        ctx.send(members, modes);
    }
    let sjoin = Message::new("SJOIN", ["1", chan_name.as_str(), sjoin_nick.as_str()])
        .with_prefix(ctx.server_prefix());
    let services = ctx.to_services();
    ctx.send(services, sjoin);

    debug!(session = %ctx.session, channel = %chan_name, created = outcome == JoinOutcome::Created, "Joined channel");
    send_join_burst(ctx, name);
    Ok(())
}

/// Mode, topic and names of a channel just joined, for the caller.
pub fn send_join_burst(ctx: &mut Context<'_>, name: &str) {
    send_channel_modes(ctx, name);
    send_topic(ctx, name);
    send_names(ctx, name);
}
