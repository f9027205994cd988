//! MODE command handler.
//!
//! - User modes: `MODE nick [+/-modes]`
//! - Channel modes: `MODE channel [+/-modes [args...]]`
//!
//! Changes are applied one at a time. A rejected letter gets its own error
//! reply and the remaining letters still apply; only what was applied is
//! announced.

mod channel;
mod user;

pub use channel::send_channel_modes;

use super::{Context, Handler, HandlerResult};
use crate::error::ChannelError;
use slirc_proto::{ChannelExt, Message};

/// Handler for MODE command.
pub struct ModeHandler;

impl Handler for ModeHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let target = &msg.params[0];
        let nick = ctx.caller()?.nick.clone();

        if target.is_channel_name() && ctx.dir.channel(target).is_some_and(|c| c.is_member(&nick)) {
            return channel::channel_mode(ctx, msg);
        }
        if let Some(target_id) = ctx.dir.find_nick(target) {
            return user::user_mode(ctx, msg, target_id);
        }
        Err(ChannelError::NotOnChannel(target.clone()).into())
    }
}
