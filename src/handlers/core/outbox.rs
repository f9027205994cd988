//! Collecting a command's output and its audiences.
//!
//! Audiences are sets of connection (primary) ids, computed from the
//! Directory at the moment the message is produced. Since handlers produce
//! notifications before committing membership changes, recipients see the
//! membership as it was when the event happened.

use crate::output::OutputMessage;
use crate::state::{CompositeId, Directory, SessionId};
use slirc_proto::Message;
use std::collections::BTreeSet;

/// Who receives a message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Audience(BTreeSet<i64>);

impl Audience {
    pub fn new() -> Self {
        Self::default()
    }

    /// One session (through its connection).
    pub fn session(mut self, id: SessionId) -> Self {
        self.0.insert(id.primary);
        self
    }

    /// Every member of a channel.
    pub fn channel(mut self, dir: &Directory, name: &str) -> Self {
        self.0
            .extend(dir.channel_members(name).into_iter().map(|id| id.primary));
        self
    }

    /// Every member of a channel except `except`.
    pub fn channel_but_one(mut self, dir: &Directory, name: &str, except: SessionId) -> Self {
        self.0.extend(
            dir.channel_members(name)
                .into_iter()
                .filter(|id| *id != except)
                .map(|id| id.primary),
        );
        self
    }

    /// `id` and everybody sharing a channel with it.
    pub fn common_channels(mut self, dir: &Directory, id: SessionId) -> Self {
        self.0.extend(
            dir.common_channel_members(id)
                .into_iter()
                .map(|id| id.primary),
        );
        self
    }

    /// Everybody sharing a channel with `id`, but not `id` itself.
    pub fn peers(mut self, dir: &Directory, id: SessionId) -> Self {
        self.0.extend(
            dir.common_channel_members(id)
                .into_iter()
                .filter(|peer| *peer != id)
                .map(|peer| peer.primary),
        );
        self
    }

    /// Every established services link.
    pub fn services(mut self, dir: &Directory) -> Self {
        self.0.extend(dir.server_links().map(|s| s.id.primary));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, primary: i64) -> bool {
        self.0.contains(&primary)
    }

    pub fn into_set(self) -> BTreeSet<i64> {
        self.0
    }
}

/// Messages produced by one command, in order.
#[derive(Debug)]
pub struct Outbox {
    caller: i64,
    replay: bool,
    messages: Vec<(Audience, Message)>,
}

impl Outbox {
    /// `replay` marks a command re-applied during recovery: its effects on
    /// other sessions were already delivered, so only what is addressed to
    /// the caller itself goes out again.
    pub fn new(caller: SessionId, replay: bool) -> Self {
        Self {
            caller: caller.primary,
            replay,
            messages: Vec::new(),
        }
    }

    pub fn push(&mut self, audience: Audience, message: Message) {
        let audience = if self.replay {
            if !audience.contains(self.caller) {
                return;
            }
            Audience::new().session(CompositeId::main(self.caller))
        } else {
            audience
        };
        if audience.is_empty() {
            return;
        }
        self.messages.push((audience, message));
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number the messages `(primary, 1)`, `(primary, 2)`, ...
    pub fn into_output(self, primary: i64) -> Vec<OutputMessage> {
        self.messages
            .into_iter()
            .zip(1..)
            .map(|((audience, message), sub)| OutputMessage {
                id: CompositeId::new(primary, sub),
                interested: audience.into_set(),
                message,
            })
            .collect()
    }
}
