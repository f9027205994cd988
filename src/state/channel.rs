//! Channels and member permissions.

use super::id::NickKey;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};

/// Permission bits a member holds in one channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemberPerms(u8);

impl MemberPerms {
    pub const OPERATOR: u8 = 1;

    pub fn operator() -> Self {
        Self(Self::OPERATOR)
    }

    pub fn is_op(self) -> bool {
        self.0 & Self::OPERATOR != 0
    }

    pub fn set_op(&mut self, op: bool) {
        if op {
            self.0 |= Self::OPERATOR;
        } else {
            self.0 &= !Self::OPERATOR;
        }
    }

    /// `@` for operators, empty otherwise.
    pub fn prefix(self) -> &'static str {
        if self.is_op() { "@" } else { "" }
    }
}

#[derive(Clone, Debug)]
pub struct Channel {
    /// Display name as given by the creator.
    pub name: String,
    pub members: BTreeMap<NickKey, MemberPerms>,
    pub modes: BTreeSet<char>,
    pub topic: String,
    pub topic_nick: String,
    pub topic_time: Option<DateTime<Utc>>,
}

impl Channel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: BTreeMap::new(),
            modes: BTreeSet::new(),
            topic: String::new(),
            topic_nick: String::new(),
            topic_time: None,
        }
    }

    pub fn has_mode(&self, mode: char) -> bool {
        self.modes.contains(&mode)
    }

    pub fn set_mode(&mut self, mode: char, on: bool) {
        if on {
            self.modes.insert(mode);
        } else {
            self.modes.remove(&mode);
        }
    }

    pub fn is_member(&self, nick: &str) -> bool {
        self.members.contains_key(&NickKey::new(nick))
    }

    pub fn member(&self, nick: &str) -> Option<MemberPerms> {
        self.members.get(&NickKey::new(nick)).copied()
    }

    pub fn is_op(&self, nick: &str) -> bool {
        self.member(nick).is_some_and(MemberPerms::is_op)
    }

    pub fn is_secret(&self) -> bool {
        self.has_mode('s')
    }

    /// `+` followed by the sorted channel modes.
    pub fn mode_string(&self) -> String {
        std::iter::once('+').chain(self.modes.iter().copied()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perms_toggle_operator() {
        let mut perms = MemberPerms::default();
        assert!(!perms.is_op());
        perms.set_op(true);
        assert!(perms.is_op());
        assert_eq!(perms.prefix(), "@");
        perms.set_op(false);
        assert_eq!(perms, MemberPerms::default());
    }

    #[test]
    fn membership_lookup_folds_case() {
        let mut chan = Channel::new("#Rust");
        chan.members.insert(NickKey::new("Alice"), MemberPerms::operator());
        assert!(chan.is_member("ALICE"));
        assert!(chan.is_op("alice"));
        assert!(!chan.is_member("bob"));
    }

    #[test]
    fn mode_string_sorted() {
        let mut chan = Channel::new("#c");
        chan.set_mode('t', true);
        chan.set_mode('n', true);
        assert_eq!(chan.mode_string(), "+nt");
        chan.set_mode('t', false);
        assert_eq!(chan.mode_string(), "+n");
    }
}
