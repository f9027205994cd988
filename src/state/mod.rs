//! Replicated state.
//!
//! The [`Directory`] owns every session, channel and nickname hold. It is
//! only ever mutated from the serialized apply path, so nothing in here
//! locks.

mod channel;
mod directory;
mod id;
mod session;

pub use channel::{Channel, MemberPerms};
pub use directory::{Directory, Hold, InvariantViolation, JoinOutcome};
pub use id::{ChanKey, CompositeId, NickKey, SessionId};
pub use session::Session;
