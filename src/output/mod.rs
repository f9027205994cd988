//! Output messages and the stream that delivers them.
//!
//! The apply path produces one batch per log entry. Every message in a
//! batch shares the entry's position as its primary id and numbers itself
//! with `sub = 1, 2, ...`. Delivery front-ends follow the stream with
//! [`OutputStream::get_next`] and keep only the messages whose interest set
//! names their connection.

mod stream;

pub use stream::{Batch, Cancelled, OutputError, OutputStream};

use crate::state::{CompositeId, SessionId};
use slirc_proto::Message;
use std::collections::BTreeSet;
use tokio_util::sync::CancellationToken;

/// One synthesized message and the connections that should receive it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputMessage {
    pub id: CompositeId,
    /// Primary ids of the connections this is delivered to.
    pub interested: BTreeSet<i64>,
    pub message: Message,
}

impl OutputMessage {
    /// Whether `session`'s connection receives this message. Subsessions
    /// receive through their connection.
    pub fn is_interesting_for(&self, session: SessionId) -> bool {
        self.interested.contains(&session.primary)
    }
}

/// Follow `stream` on behalf of one connection.
///
/// Blocks until a batch holding something for `session` arrives, advancing
/// `last_seen` past every batch looked at, including ones with nothing of
/// interest. Returns the interesting messages in order.
pub async fn next_for_session(
    stream: &OutputStream,
    session: SessionId,
    last_seen: &mut CompositeId,
    cancel: &CancellationToken,
) -> Result<Vec<OutputMessage>, Cancelled> {
    loop {
        let batch = stream.get_next(*last_seen, cancel).await?;
        if let Some(last) = batch.last() {
            *last_seen = last.id;
        }
        let mine: Vec<OutputMessage> = batch
            .iter()
            .filter(|m| m.is_interesting_for(session))
            .cloned()
            .collect();
        if !mine.is_empty() {
            return Ok(mine);
        }
    }
}
