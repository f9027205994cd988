//! Services overrides: SVSNICK, SVSMODE, SVSHOLD, SVSJOIN and SVSPART.

use super::super::channel::{send_names, send_topic};
use super::super::{Audience, Context, Handler, HandlerError, HandlerResult};
use crate::error::ChannelError;
use crate::state::{Hold, JoinOutcome};
use chrono::{DateTime, TimeDelta, Utc};
use slirc_proto::mode::parse_modes;
use slirc_proto::{ChannelExt, Message, ModeContext, NickExt, Prefix, irc_eq};
use std::time::Duration;
use tracing::info;

/// Handler for `server_SVSNICK`.
///
/// `SVSNICK <nick> <newnick> [:<timestamp>]`, e.g. renaming a user to a
/// guest nick after failing to identify.
pub struct SvsNickHandler;

impl Handler for SvsNickHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let (old, new) = (&msg.params[0], &msg.params[1]);
        if !new.is_valid_nick() {
            return Err(HandlerError::ErroneousNickname {
                nick: new.clone(),
                hold_reason: None,
            });
        }
        let id = ctx
            .dir
            .find_nick(old)
            .ok_or_else(|| HandlerError::NoSuchNick(old.clone()))?;
        if !irc_eq(old, new) && ctx.dir.find_nick(new).is_some() {
            return Err(HandlerError::NicknameInUse(new.clone()));
        }

        let Some(old_prefix) = ctx.dir.session(id).map(|s| s.prefix()) else {
            return Ok(());
        };
        ctx.dir.set_nick(id, new);
        info!(session = %id, old = %old, new = %new, "Nick forced by services");

        let audience = Audience::new()
            .common_channels(ctx.dir, id)
            .services(ctx.dir);
        ctx.send(audience, Message::new("NICK", [new.as_str()]).with_prefix(old_prefix));
        Ok(())
    }
}

/// Handler for `server_SVSMODE`.
///
/// `SVSMODE <nick> <modes> [args...]`. Services may set `+d <svid>` (the
/// services id shown in the burst) and `r` (identified). The target is told
/// its resulting modes.
pub struct SvsModeHandler;

impl Handler for SvsModeHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let target = &msg.params[0];
        let modestr = &msg.params[1];
        let id = ctx
            .dir
            .find_nick(target)
            .ok_or_else(|| HandlerError::NoSuchNick(target.clone()))?;
        if !modestr.starts_with(['+', '-']) {
            return Err(HandlerError::UnknownModeFlag);
        }
        let link_prefix = ctx.caller()?.prefix();

        let mut unknown = 0;
        for change in parse_modes(ModeContext::User, modestr, &msg.params[2..]) {
            let Some(session) = ctx.dir.session_mut(id) else {
                break;
            };
            match change.letter {
                'd' => session.svid = change.arg.unwrap_or_default(),
                'r' if change.sign.is_plus() => {
                    session.modes.insert('r');
                }
                'r' => {
                    session.modes.remove(&'r');
                }
                _ => unknown += 1,
            }
        }
        for _ in 0..unknown {
            ctx.report(&HandlerError::UnknownModeFlag, "SVSMODE");
        }

        let Some(session) = ctx.dir.session(id) else {
            return Ok(());
        };
        let mode = Message::new("MODE", [session.nick.clone(), session.mode_string()])
            .with_prefix(link_prefix);
        ctx.send(Audience::new().session(id), mode);
        Ok(())
    }
}

/// Handler for `server_SVSHOLD`.
///
/// `SVSHOLD <nick> <seconds> :<reason>` reserves a nickname for a while;
/// `SVSHOLD <nick>` releases it early.
pub struct SvsHoldHandler;

impl Handler for SvsHoldHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let nick = &msg.params[0];
        let Some(secs) = msg.param(1) else {
            ctx.dir.remove_hold(nick);
            return Ok(());
        };

        let duration = match parse_hold_duration(secs, ctx.now) {
            Ok(duration) => duration,
            Err(e) => {
                ctx.notice(format!("Invalid duration: {e}"));
                return Ok(());
            }
        };
        let hold = Hold {
            added: ctx.now,
            duration,
            reason: msg.param(2).unwrap_or_default().to_string(),
        };
        info!(nick = %nick, secs = %secs, "Nick held by services");
        ctx.dir.add_hold(nick, hold);
        Ok(())
    }
}

/// Seconds, possibly fractional, as a hold duration. The hold must end at
/// a representable instant after `now`.
fn parse_hold_duration(secs: &str, now: DateTime<Utc>) -> Result<TimeDelta, String> {
    let value: f64 = secs
        .parse()
        .map_err(|e| format!("time: invalid duration {secs:?}: {e}"))?;
    let duration = Duration::try_from_secs_f64(value).map_err(|e| e.to_string())?;
    let duration = TimeDelta::from_std(duration).map_err(|e| e.to_string())?;
    if now.checked_add_signed(duration).is_none() {
        return Err(format!("time: invalid duration {secs:?}: out of range"));
    }
    Ok(duration)
}

/// Handler for `server_SVSJOIN`.
///
/// `SVSJOIN <nick> <channel>` puts a user into a channel, bypassing every
/// channel mode. The user gets the topic and names as if it had joined.
pub struct SvsJoinHandler;

impl Handler for SvsJoinHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let (target, name) = (&msg.params[0], &msg.params[1]);
        let id = ctx
            .dir
            .find_nick(target)
            .ok_or_else(|| HandlerError::NoSuchNick(target.clone()))?;
        if !name.is_valid_channel() {
            return Err(HandlerError::NoSuchChannel(name.clone()));
        }
        let Some(outcome) = ctx.dir.join(id, name) else {
            return Ok(());
        };
        if outcome == JoinOutcome::AlreadyMember {
            return Ok(());
        }
        let Some(session) = ctx.dir.session(id) else {
            return Ok(());
        };
        let prefix = session.prefix();
        let nick = session.nick.clone();
        let op = ctx
            .dir
            .channel(name)
            .and_then(|c| c.member(&nick))
            .map(|p| p.prefix())
            .unwrap_or_default();

        let members = Audience::new().channel(ctx.dir, name);
        ctx.send(members, Message::new("JOIN", [name.as_str()]).with_prefix(prefix));
        let services = ctx.to_services();
        ctx.send(
            services,
            Message::new("SJOIN", ["1".to_string(), name.clone(), format!("{op}{nick}")])
                .with_prefix(Prefix::server(ctx.server_name())),
        );
        ctx.acting_as(id, |ctx| {
            send_topic(ctx, name);
            send_names(ctx, name);
        });
        Ok(())
    }
}

/// Handler for `server_SVSPART`.
///
/// `SVSPART <nick> <channel>`
pub struct SvsPartHandler;

impl Handler for SvsPartHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let (target, name) = (&msg.params[0], &msg.params[1]);
        let id = ctx
            .dir
            .find_nick(target)
            .ok_or_else(|| HandlerError::NoSuchNick(target.clone()))?;
        let chan = ctx
            .dir
            .channel(name)
            .ok_or_else(|| HandlerError::NoSuchChannel(name.clone()))?;
        if !chan.is_member(target) {
            return Err(ChannelError::NotOnChannel(chan.name.clone()).into());
        }
        let Some(prefix) = ctx.dir.session(id).map(|s| s.prefix()) else {
            return Ok(());
        };

        let audience = Audience::new().channel(ctx.dir, name).services(ctx.dir);
        ctx.send(audience, Message::new("PART", [name.as_str()]).with_prefix(prefix));
        ctx.dir.part(id, name);
        Ok(())
    }
}
