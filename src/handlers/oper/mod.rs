//! Operator command handlers.

mod auth;
mod kill;

pub use auth::{OperHandler, oper_up};
pub use kill::{KillHandler, kill_session};
