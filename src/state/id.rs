//! Composite identifiers and case-folded map keys.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use slirc_proto::irc_to_lower;
use std::fmt;

/// An ordered `(primary, sub)` pair.
///
/// Used both for session identity (connection + subsession) and for output
/// ordering (log position + position within the batch). Ordering is
/// lexicographic.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CompositeId {
    pub primary: i64,
    pub sub: i64,
}

/// Session identity. `sub == 0` is the main session of a connection.
pub type SessionId = CompositeId;

impl CompositeId {
    /// The zero id: precedes every real id.
    pub const ZERO: CompositeId = CompositeId { primary: 0, sub: 0 };

    pub const fn new(primary: i64, sub: i64) -> Self {
        Self { primary, sub }
    }

    /// The main session of connection `primary`.
    pub const fn main(primary: i64) -> Self {
        Self { primary, sub: 0 }
    }

    /// A services-introduced subsession riding on `primary`.
    ///
    /// The sub id is derived from the nickname so every replica picks the
    /// same one. It is never zero.
    pub fn subsession(primary: i64, nick: &str) -> Self {
        let digest = Sha256::digest(irc_to_lower(nick).as_bytes());
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        let sub = i64::from_be_bytes(bytes) & i64::MAX;
        Self {
            primary,
            sub: if sub == 0 { 1 } else { sub },
        }
    }

    pub fn is_main(&self) -> bool {
        self.sub == 0
    }
}

impl fmt::Display for CompositeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.primary, self.sub)
    }
}

/// Case-folded nickname, used as the nickname index key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NickKey(String);

impl NickKey {
    pub fn new(nick: &str) -> Self {
        Self(irc_to_lower(nick))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Case-folded channel name, used as the channel table key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChanKey(String);

impl ChanKey {
    pub fn new(name: &str) -> Self {
        Self(irc_to_lower(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
