//! The Directory: sessions, nickname index, channels and holds.
//!
//! Every mutation path that touches membership goes through this type so
//! the following always hold between two calls:
//!
//! - each session with a nickname is indexed under exactly that nickname,
//!   and the index points at nothing else;
//! - channel membership and a session's channel set mirror each other;
//! - no channel is empty.
//!
//! [`Directory::check_invariants`] verifies all three.

use super::channel::{Channel, MemberPerms};
use super::id::{ChanKey, NickKey, SessionId};
use super::session::Session;
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// A time-boxed reservation of a nickname.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hold {
    pub added: DateTime<Utc>,
    pub duration: TimeDelta,
    pub reason: String,
}

impl Hold {
    /// Whether the hold has lapsed as seen from `now`. A hold whose end is
    /// past the representable range never lapses.
    pub fn expired_at(&self, now: DateTime<Utc>) -> bool {
        self.added
            .checked_add_signed(self.duration)
            .is_some_and(|end| now > end)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The channel did not exist; the joiner created it and is operator.
    Created,
    Joined,
    AlreadyMember,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("nick index entry {nick:?} points at {id} which does not carry it")]
    DanglingNick { nick: String, id: SessionId },
    #[error("session {id} has nick {nick:?} but is not indexed under it")]
    UnindexedNick { nick: String, id: SessionId },
    #[error("channel {0:?} has no members")]
    EmptyChannel(String),
    #[error("membership of {nick:?} in {channel:?} is one-sided")]
    Membership { nick: String, channel: String },
}

#[derive(Debug, Default)]
pub struct Directory {
    sessions: BTreeMap<SessionId, Session>,
    nicks: BTreeMap<NickKey, SessionId>,
    channels: BTreeMap<ChanKey, Channel>,
    holds: BTreeMap<NickKey, Hold>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Sessions
    // ------------------------------------------------------------------

    /// Insert a session. Returns `false` if the id is already taken.
    ///
    /// A session arriving with a nickname is indexed under it; the caller
    /// has already checked the nickname is free.
    pub fn create_session(&mut self, session: Session) -> bool {
        if self.sessions.contains_key(&session.id) {
            return false;
        }
        if !session.nick.is_empty() {
            self.nicks.insert(NickKey::new(&session.nick), session.id);
        }
        self.sessions.insert(session.id, session);
        true
    }

    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    pub fn session_mut(&mut self, id: SessionId) -> Option<&mut Session> {
        self.sessions.get_mut(&id)
    }

    pub fn contains_session(&self, id: SessionId) -> bool {
        self.sessions.contains_key(&id)
    }

    /// All sessions in id order.
    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn find_nick(&self, nick: &str) -> Option<SessionId> {
        self.nicks.get(&NickKey::new(nick)).copied()
    }

    pub fn session_by_nick(&self, nick: &str) -> Option<&Session> {
        self.find_nick(nick).and_then(|id| self.sessions.get(&id))
    }

    /// Established services links.
    pub fn server_links(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values().filter(|s| s.is_server())
    }

    /// Subsessions riding on connection `primary`.
    pub fn subsessions(&self, primary: i64) -> Vec<SessionId> {
        self.sessions
            .range(SessionId::new(primary, 1)..=SessionId::new(primary, i64::MAX))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Give `id` a new nickname, rekeying the index and every membership.
    ///
    /// Returns the previous nickname (empty if it had none), or `None` if
    /// the session does not exist.
    pub fn set_nick(&mut self, id: SessionId, nick: &str) -> Option<String> {
        let session = self.sessions.get_mut(&id)?;
        let old = std::mem::replace(&mut session.nick, nick.to_owned());
        let new_key = NickKey::new(nick);

        if !old.is_empty() {
            let old_key = NickKey::new(&old);
            self.nicks.remove(&old_key);
            for chan_key in &session.channels {
                if let Some(chan) = self.channels.get_mut(chan_key)
                    && let Some(perms) = chan.members.remove(&old_key)
                {
                    chan.members.insert(new_key.clone(), perms);
                }
            }
        }
        self.nicks.insert(new_key, id);
        Some(old)
    }

    /// Remove a session and cascade: memberships, nickname index, and
    /// channels left empty. Notifications must be computed before calling
    /// this.
    pub fn delete_session(&mut self, id: SessionId) -> Option<Session> {
        let session = self.sessions.remove(&id)?;
        let key = NickKey::new(&session.nick);
        for chan_key in &session.channels {
            self.remove_member(chan_key, &key);
        }
        if !session.nick.is_empty() && self.nicks.get(&key) == Some(&id) {
            self.nicks.remove(&key);
        }
        Some(session)
    }

    // ------------------------------------------------------------------
    // Channels
    // ------------------------------------------------------------------

    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.get(&ChanKey::new(name))
    }

    pub fn channel_mut(&mut self, name: &str) -> Option<&mut Channel> {
        self.channels.get_mut(&ChanKey::new(name))
    }

    /// All channels in case-folded name order.
    pub fn channels(&self) -> impl Iterator<Item = &Channel> {
        self.channels.values()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Add `id` to channel `name`, creating it if needed. The creator is
    /// made operator. Returns `None` if the session is unknown or has no
    /// nickname to be a member under.
    pub fn join(&mut self, id: SessionId, name: &str) -> Option<JoinOutcome> {
        let session = self.sessions.get_mut(&id)?;
        if session.nick.is_empty() {
            return None;
        }
        let chan_key = ChanKey::new(name);
        let nick_key = NickKey::new(&session.nick);

        let created = !self.channels.contains_key(&chan_key);
        let chan = self
            .channels
            .entry(chan_key.clone())
            .or_insert_with(|| Channel::new(name));
        if chan.members.contains_key(&nick_key) {
            return Some(JoinOutcome::AlreadyMember);
        }
        let perms = if created {
            MemberPerms::operator()
        } else {
            MemberPerms::default()
        };
        chan.members.insert(nick_key, perms);
        session.channels.insert(chan_key);

        Some(if created {
            JoinOutcome::Created
        } else {
            JoinOutcome::Joined
        })
    }

    /// Remove `id` from channel `name`. Returns whether it was a member.
    /// The channel disappears with its last member.
    pub fn part(&mut self, id: SessionId, name: &str) -> bool {
        let chan_key = ChanKey::new(name);
        let Some(session) = self.sessions.get_mut(&id) else {
            return false;
        };
        if !session.channels.remove(&chan_key) {
            return false;
        }
        let nick_key = NickKey::new(&session.nick);
        self.remove_member(&chan_key, &nick_key);
        true
    }

    fn remove_member(&mut self, chan_key: &ChanKey, nick_key: &NickKey) {
        let Some(chan) = self.channels.get_mut(chan_key) else {
            return;
        };
        chan.members.remove(nick_key);
        if chan.members.is_empty() {
            self.channels.remove(chan_key);
        }
    }

    /// Session ids of every member of `name`, in nickname order.
    pub fn channel_members(&self, name: &str) -> Vec<SessionId> {
        self.channel(name)
            .map(|chan| {
                chan.members
                    .keys()
                    .filter_map(|key| self.nicks.get(key).copied())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// `id` itself plus everybody sharing at least one channel with it.
    pub fn common_channel_members(&self, id: SessionId) -> BTreeSet<SessionId> {
        let mut peers = BTreeSet::from([id]);
        if let Some(session) = self.sessions.get(&id) {
            for chan_key in &session.channels {
                if let Some(chan) = self.channels.get(chan_key) {
                    peers.extend(chan.members.keys().filter_map(|k| self.nicks.get(k).copied()));
                }
            }
        }
        peers
    }

    pub fn shares_channel(&self, a: SessionId, b: SessionId) -> bool {
        match (self.sessions.get(&a), self.sessions.get(&b)) {
            (Some(a), Some(b)) => !a.channels.is_disjoint(&b.channels),
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Holds
    // ------------------------------------------------------------------

    pub fn hold(&self, nick: &str) -> Option<&Hold> {
        self.holds.get(&NickKey::new(nick))
    }

    pub fn add_hold(&mut self, nick: &str, hold: Hold) {
        self.holds.insert(NickKey::new(nick), hold);
    }

    pub fn remove_hold(&mut self, nick: &str) -> Option<Hold> {
        self.holds.remove(&NickKey::new(nick))
    }

    // ------------------------------------------------------------------
    // Invariants
    // ------------------------------------------------------------------

    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        for (key, id) in &self.nicks {
            let ok = self
                .sessions
                .get(id)
                .is_some_and(|s| NickKey::new(&s.nick) == *key);
            if !ok {
                return Err(InvariantViolation::DanglingNick {
                    nick: key.as_str().to_owned(),
                    id: *id,
                });
            }
        }

        for session in self.sessions.values() {
            if !session.nick.is_empty()
                && self.nicks.get(&NickKey::new(&session.nick)) != Some(&session.id)
            {
                return Err(InvariantViolation::UnindexedNick {
                    nick: session.nick.clone(),
                    id: session.id,
                });
            }
            for chan_key in &session.channels {
                let mirrored = self
                    .channels
                    .get(chan_key)
                    .is_some_and(|c| c.members.contains_key(&NickKey::new(&session.nick)));
                if !mirrored {
                    return Err(InvariantViolation::Membership {
                        nick: session.nick.clone(),
                        channel: chan_key.as_str().to_owned(),
                    });
                }
            }
        }

        for (chan_key, chan) in &self.channels {
            if chan.members.is_empty() {
                return Err(InvariantViolation::EmptyChannel(chan.name.clone()));
            }
            for nick_key in chan.members.keys() {
                let mirrored = self
                    .nicks
                    .get(nick_key)
                    .and_then(|id| self.sessions.get(id))
                    .is_some_and(|s| s.channels.contains(chan_key));
                if !mirrored {
                    return Err(InvariantViolation::Membership {
                        nick: nick_key.as_str().to_owned(),
                        channel: chan.name.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}
