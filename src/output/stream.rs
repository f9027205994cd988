//! The output stream: a single producer, many blocking readers.

use super::OutputMessage;
use crate::state::CompositeId;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// All messages produced by one log entry, in production order.
pub type Batch = Arc<[OutputMessage]>;

/// Returned by [`OutputStream::get_next`] when the caller's token fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("get_next cancelled")]
pub struct Cancelled;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OutputError {
    #[error("empty batch")]
    EmptyBatch,
    #[error("batch mixes primary ids {first} and {other}")]
    MixedBatch { first: i64, other: i64 },
    #[error("batch {got} does not follow {last}")]
    NotMonotonic { got: i64, last: i64 },
}

#[derive(Default)]
struct Inner {
    batches: BTreeMap<i64, Batch>,
    last: CompositeId,
}

/// Ordered, bounded log of output batches.
///
/// Batches are keyed by their primary id. Readers block in
/// [`get_next`](Self::get_next) until a batch newer than the one they last
/// saw exists; every [`add`](Self::add) wakes all of them.
#[derive(Default)]
pub struct OutputStream {
    inner: Mutex<Inner>,
    notify: Notify,
}

impl OutputStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch. All messages must share one primary id, greater than
    /// that of any batch added before.
    pub fn add(&self, messages: Vec<OutputMessage>) -> Result<(), OutputError> {
        let first = messages.first().ok_or(OutputError::EmptyBatch)?.id.primary;
        if let Some(other) = messages.iter().map(|m| m.id.primary).find(|p| *p != first) {
            return Err(OutputError::MixedBatch { first, other });
        }
        {
            let mut inner = self.inner.lock();
            if first <= inner.last.primary {
                return Err(OutputError::NotMonotonic {
                    got: first,
                    last: inner.last.primary,
                });
            }
            // Non-empty: checked above.
            inner.last = messages[messages.len() - 1].id;
            inner.batches.insert(first, messages.into());
        }
        trace!(primary = first, "output batch added");
        self.notify.notify_waiters();
        Ok(())
    }

    /// The first batch whose primary id is greater than `last_seen.primary`.
    ///
    /// `last_seen` does not need to still be stored. Blocks until such a
    /// batch exists or `cancel` fires.
    pub async fn get_next(
        &self,
        last_seen: CompositeId,
        cancel: &CancellationToken,
    ) -> Result<Batch, Cancelled> {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // Register before checking so an add between the check and the
            // await is not lost.
            notified.as_mut().enable();

            if let Some(batch) = self.next_after(last_seen) {
                return Ok(batch);
            }

            tokio::select! {
                _ = &mut notified => continue,
                _ = cancel.cancelled() => return Err(Cancelled),
            }
        }
    }

    fn next_after(&self, last_seen: CompositeId) -> Option<Batch> {
        let inner = self.inner.lock();
        let start = last_seen.primary.checked_add(1)?;
        inner.batches.range(start..).next().map(|(_, b)| Arc::clone(b))
    }

    /// Wake every blocked reader so it re-checks; nothing new need exist.
    pub fn interrupt_get_next(&self) {
        self.notify.notify_waiters();
    }

    /// The batch stored under `id.primary`, if still retained.
    pub fn get(&self, id: CompositeId) -> Option<Batch> {
        self.inner.lock().batches.get(&id.primary).cloned()
    }

    /// Drop the batch stored under `id.primary`.
    ///
    /// # Panics
    ///
    /// If no such batch is stored. Only the replica deletes, and it only
    /// deletes what it added; anything else is a bug in the caller.
    pub fn delete(&self, id: CompositeId) {
        let removed = self.inner.lock().batches.remove(&id.primary);
        if removed.is_none() {
            panic!("output stream: delete of unknown batch {}", id.primary);
        }
    }

    /// Id of the last message of the most recently added batch, or
    /// [`CompositeId::ZERO`].
    pub fn last_seen(&self) -> CompositeId {
        self.inner.lock().last
    }

    /// Number of batches currently retained.
    pub fn len(&self) -> usize {
        self.inner.lock().batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Primary id of the oldest retained batch.
    pub fn first_retained(&self) -> Option<i64> {
        self.inner.lock().batches.keys().next().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slirc_proto::Message;
    use std::collections::BTreeSet;
    use std::time::Duration;

    fn msg(primary: i64, sub: i64) -> OutputMessage {
        OutputMessage {
            id: CompositeId::new(primary, sub),
            interested: BTreeSet::from([1]),
            message: Message::new("PING", ["x"]),
        }
    }

    fn stream_with(batches: &[i64]) -> OutputStream {
        let stream = OutputStream::new();
        for &p in batches {
            stream.add(vec![msg(p, 1)]).unwrap();
        }
        stream
    }

    #[test]
    fn last_seen_tracks_last_message() {
        let stream = OutputStream::new();
        assert_eq!(stream.last_seen(), CompositeId::ZERO);
        stream.add(vec![msg(1, 1), msg(1, 2)]).unwrap();
        assert_eq!(stream.last_seen(), CompositeId::new(1, 2));
    }

    #[test]
    fn add_rejects_bad_batches() {
        let stream = stream_with(&[3]);
        assert_eq!(stream.add(vec![]), Err(OutputError::EmptyBatch));
        assert_eq!(
            stream.add(vec![msg(4, 1), msg(5, 1)]),
            Err(OutputError::MixedBatch { first: 4, other: 5 })
        );
        assert_eq!(
            stream.add(vec![msg(2, 1)]),
            Err(OutputError::NotMonotonic { got: 2, last: 3 })
        );
    }

    #[test]
    fn get_and_delete_by_primary() {
        let stream = stream_with(&[1, 2, 3]);
        assert!(stream.get(CompositeId::new(2, 0)).is_some());
        stream.delete(CompositeId::new(2, 0));
        assert!(stream.get(CompositeId::new(2, 1)).is_none());
        // Out of order is fine as long as the batch exists.
        stream.delete(CompositeId::new(3, 0));
        stream.delete(CompositeId::new(1, 0));
        assert!(stream.is_empty());
    }

    #[test]
    #[should_panic(expected = "delete of unknown batch")]
    fn delete_twice_panics() {
        let stream = stream_with(&[1]);
        stream.delete(CompositeId::new(1, 0));
        stream.delete(CompositeId::new(1, 0));
    }

    #[test]
    #[should_panic(expected = "delete of unknown batch 0")]
    fn delete_zero_panics() {
        stream_with(&[1]).delete(CompositeId::ZERO);
    }

    #[tokio::test]
    async fn get_next_skips_deleted() {
        let stream = stream_with(&[1, 2, 3]);
        let token = CancellationToken::new();
        stream.delete(CompositeId::new(2, 0));

        let next = stream.get_next(CompositeId::new(1, 1), &token).await.unwrap();
        assert_eq!(next[0].id, CompositeId::new(3, 1));

        // Resuming from the deleted id still works.
        let next = stream.get_next(CompositeId::new(2, 1), &token).await.unwrap();
        assert_eq!(next[0].id, CompositeId::new(3, 1));

        stream.delete(CompositeId::new(1, 0));
        let next = stream.get_next(CompositeId::ZERO, &token).await.unwrap();
        assert_eq!(next[0].id, CompositeId::new(3, 1));
    }

    #[tokio::test]
    async fn get_next_cancelled() {
        let stream = OutputStream::new();
        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(stream.get_next(CompositeId::ZERO, &token).await.unwrap_err(), Cancelled);
    }

    #[tokio::test]
    async fn get_next_blocks_until_add() {
        let stream = Arc::new(OutputStream::new());
        let token = CancellationToken::new();

        let reader = {
            let stream = Arc::clone(&stream);
            let token = token.clone();
            tokio::spawn(async move { stream.get_next(CompositeId::ZERO, &token).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!reader.is_finished());

        stream.add(vec![msg(1, 1)]).unwrap();
        let batch = tokio::time::timeout(Duration::from_secs(1), reader)
            .await
            .expect("reader woke")
            .unwrap()
            .unwrap();
        assert_eq!(batch[0].id, CompositeId::new(1, 1));
    }
}
