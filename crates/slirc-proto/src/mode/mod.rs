//! The compact mode grammar: `+nt-o nick` and friends.

mod parse;
mod types;

pub use self::parse::parse_modes;
pub use self::types::{render_modes, ModeChange, ModeContext, ModeSign};
