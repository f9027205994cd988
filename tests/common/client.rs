//! Test IRC client.
//!
//! A client is just a connection id plus how far it has read into the
//! output stream. Commands go through [`TestNetwork`](super::TestNetwork).

use slirc_proto::Message;
use slircd_replica::state::{CompositeId, SessionId};

/// A test IRC client.
pub struct TestClient {
    pub session: SessionId,
    pub nick: String,
    pub(crate) last_seen: CompositeId,
}

impl TestClient {
    pub(crate) fn new(session: SessionId, last_seen: CompositeId) -> Self {
        Self {
            session,
            nick: String::new(),
            last_seen,
        }
    }

    /// Connection id as used in log entries.
    pub fn id(&self) -> i64 {
        self.session.primary
    }
}

/// First message with the given verb or numeric.
#[allow(dead_code)]
pub fn find<'a>(messages: &'a [Message], command: &str) -> Option<&'a Message> {
    messages.iter().find(|m| m.command == command)
}

#[allow(dead_code)]
pub fn has(messages: &[Message], command: &str) -> bool {
    find(messages, command).is_some()
}
