//! A connected participant, a services link, or a services subsession.

use super::id::{ChanKey, SessionId};
use chrono::{DateTime, Utc};
use slirc_proto::Prefix;
use std::collections::BTreeSet;

/// Per-session state.
///
/// `nick` is empty until the session picks one. Server links never hold a
/// nickname; they are identified by `server_name` instead.
#[derive(Clone, Debug)]
pub struct Session {
    pub id: SessionId,
    pub nick: String,
    pub username: String,
    pub realname: String,
    /// Visible host part of the origin prefix.
    pub host: String,
    pub modes: BTreeSet<char>,
    /// Away text; empty when not away.
    pub away: String,
    pub operator: bool,
    /// Set once a `SERVER` handshake succeeded on this connection.
    pub server_name: Option<String>,
    pub logged_in: bool,
    /// Credentials from `PASS`, consumed at login.
    pub pass: String,
    /// Services account token (`+d`).
    pub svid: String,
    pub channels: BTreeSet<ChanKey>,
    pub invited_to: BTreeSet<ChanKey>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub last_non_ping: DateTime<Utc>,
}

impl Session {
    pub fn new(id: SessionId, host: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            nick: String::new(),
            username: String::new(),
            realname: String::new(),
            host,
            modes: BTreeSet::new(),
            away: String::new(),
            operator: false,
            server_name: None,
            logged_in: false,
            pass: String::new(),
            svid: id.primary.to_string(),
            channels: BTreeSet::new(),
            invited_to: BTreeSet::new(),
            created_at,
            last_activity: created_at,
            last_non_ping: created_at,
        }
    }

    pub fn is_server(&self) -> bool {
        self.server_name.is_some()
    }

    /// Origin used for messages this session causes.
    pub fn prefix(&self) -> Prefix {
        match &self.server_name {
            Some(name) => Prefix::server(name.clone()),
            None => Prefix::user(&self.nick, &self.username, &self.host),
        }
    }

    /// Nickname for numeric replies, `*` before one is chosen.
    pub fn reply_nick(&self) -> &str {
        if self.nick.is_empty() { "*" } else { &self.nick }
    }

    /// `+` followed by the sorted mode letters.
    pub fn mode_string(&self) -> String {
        std::iter::once('+').chain(self.modes.iter().copied()).collect()
    }

    pub fn is_away(&self) -> bool {
        !self.away.is_empty()
    }

    pub fn is_invisible(&self) -> bool {
        self.modes.contains(&'i')
    }
}
