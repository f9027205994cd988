//! IRC command handlers.
//!
//! This module contains the Handler trait and command registry for dispatching
//! replicated IRC messages to the appropriate handlers.
//!
//! ## Determinism
//!
//! Handlers run on the serialized apply path and must produce identical
//! state and output on every replica. They read the time only from
//! `ctx.now` (the log entry's timestamp), iterate only ordered collections,
//! and never fail the apply: errors become replies to the caller.

mod channel;
mod connection;
pub mod core;
mod helpers;
mod messaging;
mod mode;
mod oper;
mod server;
mod service_aliases;
mod user_query;
mod user_status;

pub use crate::error::{HandlerError, HandlerResult};
pub use self::core::{Audience, Context, Handler, Outbox, Registry};

// Re-export helper functions for use by handlers
pub use helpers::{
    SERVICES_NICKS, is_services_nick, server_notice, server_reply, services_prefix, split_list,
    visible_host,
};

pub use channel::{
    InviteHandler, JoinHandler, KickHandler, KnockHandler, ListHandler, NamesHandler,
    PartHandler, TopicHandler,
};
pub use connection::{
    MotdHandler, NickHandler, PassHandler, PingHandler, QuitHandler, UserHandler,
    extract_credential,
};
pub use messaging::{NoticeHandler, PrivmsgHandler};
pub use mode::ModeHandler;
pub use oper::{KillHandler, OperHandler};
pub use service_aliases::ServiceAliasHandler;
pub use user_query::{IsonHandler, UserhostHandler, WhoHandler, WhoisHandler};
pub use user_status::AwayHandler;
