//! The replication boundary.
//!
//! A [`Replica`] consumes the replicated command log one [`LogEntry`] at a
//! time, in log order. Each entry runs through the command registry against
//! the replica's own [`Directory`], and whatever it produces is appended to
//! the [`OutputStream`] as one batch under the entry's id. Replicas fed the
//! same log end up with identical directories and identical streams.

use crate::config::Config;
use crate::error::ApplyError;
use crate::handlers::{Context, Registry, visible_host};
use crate::output::{OutputMessage, OutputStream};
use crate::state::{CompositeId, Directory, Session, SessionId};
use crate::telemetry::spans;
use crate::verify::{HmacVerifier, Verifier};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use slirc_proto::Message;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One entry of the replicated command log.
///
/// ```json
/// {"id": 7, "timestamp": 1700000000000000000, "type": "IrcFromClient", "session": 3, "line": "JOIN #rust"}
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Log position. Strictly increasing; doubles as the primary id of the
    /// entry's output batch and of a session it creates.
    pub id: i64,
    /// Unix nanoseconds, fixed by the leader. The only clock handlers see.
    pub timestamp: i64,
    #[serde(flatten)]
    pub kind: EntryKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EntryKind {
    /// A connection was accepted.
    CreateSession,
    /// A connection went away without saying QUIT.
    DeleteSession {
        session: i64,
        #[serde(default)]
        reason: String,
    },
    /// One protocol line from a connection.
    IrcFromClient {
        session: i64,
        line: String,
        /// Re-applied during recovery; effects on others were delivered.
        #[serde(default)]
        replay: bool,
    },
}

impl EntryKind {
    fn name(&self) -> &'static str {
        match self {
            Self::CreateSession => "create_session",
            Self::DeleteSession { .. } => "delete_session",
            Self::IrcFromClient { .. } => "irc_from_client",
        }
    }
}

/// Verbs that can change which channels a session is in.
const MEMBERSHIP_VERBS: &[&str] = &["JOIN", "PART", "KICK", "KILL", "QUIT", "SVSJOIN", "SVSPART"];

/// One replica of the chat state machine.
pub struct Replica {
    config: Arc<Config>,
    directory: Directory,
    registry: Registry,
    verifier: Option<Box<dyn Verifier>>,
    stream: Arc<OutputStream>,
    last_applied: i64,
}

impl Replica {
    /// A replica with an empty directory and stream. A `[captcha]` block in
    /// `config` turns on the HMAC challenge verifier.
    pub fn new(config: Arc<Config>) -> Self {
        let verifier = config
            .captcha
            .as_ref()
            .map(|c| Box::new(HmacVerifier::from_config(c)) as Box<dyn Verifier>);
        Self {
            config,
            directory: Directory::new(),
            registry: Registry::new(),
            verifier,
            stream: Arc::new(OutputStream::new()),
            last_applied: 0,
        }
    }

    /// Replace the challenge verifier.
    pub fn with_verifier(mut self, verifier: Box<dyn Verifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// The stream this replica appends to, for delivery front-ends.
    pub fn stream(&self) -> Arc<OutputStream> {
        Arc::clone(&self.stream)
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Id of the last entry applied, 0 before the first.
    pub fn last_applied(&self) -> i64 {
        self.last_applied
    }

    /// Decode one JSON log line and apply it.
    pub fn apply_json(&mut self, line: &str) -> Result<Vec<OutputMessage>, ApplyError> {
        let entry: LogEntry = serde_json::from_str(line).inspect_err(|e| {
            crate::metrics::record_apply_error("decode");
            warn!(error = %e, "Rejected log entry");
        })?;
        self.apply(&entry)
    }

    /// Apply one log entry.
    ///
    /// Returns the messages it produced, which have also been appended to
    /// the stream. A rejected entry changes nothing and produces nothing.
    pub fn apply(&mut self, entry: &LogEntry) -> Result<Vec<OutputMessage>, ApplyError> {
        let span = spans::apply(entry.id, entry.kind.name());
        let _enter = span.enter();

        let result = self.apply_entry(entry);
        match &result {
            Ok(_) => {
                crate::metrics::record_entry_applied();
                crate::metrics::set_sizes(
                    self.directory.session_count(),
                    self.directory.channel_count(),
                    self.stream.len(),
                );
            }
            Err(e) => {
                crate::metrics::record_apply_error(e.error_code());
                warn!(entry = entry.id, error = %e, "Rejected log entry");
            }
        }
        result
    }

    fn apply_entry(&mut self, entry: &LogEntry) -> Result<Vec<OutputMessage>, ApplyError> {
        if entry.id <= self.last_applied {
            return Err(ApplyError::OutOfOrder {
                got: entry.id,
                last: self.last_applied,
            });
        }
        let now = Utc.timestamp_nanos(entry.timestamp);

        let output = match &entry.kind {
            EntryKind::CreateSession => {
                let id = CompositeId::main(entry.id);
                if self.directory.contains_session(id) {
                    return Err(ApplyError::DuplicateSession(entry.id));
                }
                let host = visible_host(&self.config.server.host_prefix, entry.id);
                self.directory.create_session(Session::new(id, host, now));
                crate::metrics::record_session_created();
                info!(session = %id, "Session created");
                self.stream.interrupt_get_next();
                Vec::new()
            }
            EntryKind::DeleteSession { session, reason } => {
                let id = self.known_session(*session)?;
                let quit = Message::new("QUIT", [reason.as_str()]);
                let output = self.dispatch(entry.id, id, now, false, &quit);
                self.stream.interrupt_get_next();
                output
            }
            EntryKind::IrcFromClient {
                session,
                line,
                replay,
            } => {
                let id = self.known_session(*session)?;
                let msg: Message = line.parse()?;
                self.touch(id, now, &msg.command);
                let output = self.dispatch(entry.id, id, now, *replay, &msg);
                if MEMBERSHIP_VERBS.contains(&msg.command.as_str()) {
                    self.stream.interrupt_get_next();
                }
                output
            }
        };

        if !output.is_empty() {
            for msg in &output {
                crate::metrics::record_fanout(msg.interested.len());
            }
            self.stream.add(output.clone())?;
        }
        self.last_applied = entry.id;
        self.compact();

        debug_assert!(
            self.directory.check_invariants().is_ok(),
            "directory invariant broken after entry {}: {:?}",
            entry.id,
            self.directory.check_invariants()
        );
        Ok(output)
    }

    fn known_session(&self, primary: i64) -> Result<SessionId, ApplyError> {
        let id = CompositeId::main(primary);
        if self.directory.contains_session(id) {
            Ok(id)
        } else {
            Err(ApplyError::UnknownSession(primary))
        }
    }

    /// Record activity. Keepalives do not count against idle time.
    fn touch(&mut self, id: SessionId, now: DateTime<Utc>, verb: &str) {
        if let Some(session) = self.directory.session_mut(id) {
            session.last_activity = now;
            if verb != "PING" && verb != "PONG" {
                session.last_non_ping = now;
            }
        }
    }

    fn dispatch(
        &mut self,
        entry: i64,
        session: SessionId,
        now: DateTime<Utc>,
        replay: bool,
        msg: &Message,
    ) -> Vec<OutputMessage> {
        let mut ctx = Context::new(
            &mut self.directory,
            &self.config,
            self.verifier.as_deref(),
            session,
            now,
            replay,
        );
        self.registry.dispatch(&mut ctx, msg);
        let produced = ctx.out.len();
        debug!(command = %msg.command, session = %session, produced, "Dispatched");
        ctx.out.into_output(entry)
    }

    /// Drop the oldest batches beyond the retention limit.
    fn compact(&self) {
        let keep = self.config.output.retained_batches;
        while self.stream.len() > keep {
            let Some(oldest) = self.stream.first_retained() else {
                break;
            };
            self.stream.delete(CompositeId::new(oldest, 0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, kind: EntryKind) -> LogEntry {
        LogEntry {
            id,
            timestamp: id * 1_000_000_000,
            kind,
        }
    }

    fn line(id: i64, session: i64, line: &str) -> LogEntry {
        entry(
            id,
            EntryKind::IrcFromClient {
                session,
                line: line.to_string(),
                replay: false,
            },
        )
    }

    #[test]
    fn test_log_entry_json_shape() {
        let json = r#"{"id":2,"timestamp":5,"type":"IrcFromClient","session":1,"line":"NICK a"}"#;
        let parsed: LogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.id, 2);
        assert_eq!(parsed.timestamp, 5);
        assert_eq!(
            parsed.kind,
            EntryKind::IrcFromClient {
                session: 1,
                line: "NICK a".to_string(),
                replay: false
            }
        );

        let json = r#"{"id":3,"timestamp":0,"type":"DeleteSession","session":1}"#;
        let parsed: LogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed.kind,
            EntryKind::DeleteSession {
                session: 1,
                reason: String::new()
            }
        );
    }

    #[test]
    fn test_rejects_out_of_order_and_unknown() {
        let mut replica = Replica::new(Arc::new(Config::default()));
        replica.apply(&entry(5, EntryKind::CreateSession)).unwrap();
        assert!(matches!(
            replica.apply(&entry(5, EntryKind::CreateSession)),
            Err(ApplyError::OutOfOrder { got: 5, last: 5 })
        ));
        assert!(matches!(
            replica.apply(&line(6, 99, "NICK a")),
            Err(ApplyError::UnknownSession(99))
        ));
        // A rejected entry does not consume its id.
        replica.apply(&line(6, 5, "NICK a")).unwrap();
        assert_eq!(replica.last_applied(), 6);
    }

    #[test]
    fn test_host_and_timestamps_come_from_the_log() {
        let mut replica = Replica::new(Arc::new(Config::default()));
        replica.apply(&entry(255, EntryKind::CreateSession)).unwrap();
        replica.apply(&line(300, 255, "PING x")).unwrap();
        let session = replica.directory().session(CompositeId::main(255)).unwrap();
        assert_eq!(session.host, "robust/0xff");
        assert_eq!(session.last_activity.timestamp(), 300);
        assert_eq!(session.last_non_ping.timestamp(), 255);
    }

    #[test]
    fn test_compaction_keeps_newest_batches() {
        let mut config = Config::default();
        config.output.retained_batches = 2;
        let mut replica = Replica::new(Arc::new(config));
        replica.apply(&entry(1, EntryKind::CreateSession)).unwrap();
        for id in 2..=6 {
            replica.apply(&line(id, 1, "PING x")).unwrap();
        }
        let stream = replica.stream();
        assert_eq!(stream.len(), 2);
        assert_eq!(stream.first_retained(), Some(5));
    }

    /// Accepts any non-empty proof.
    struct Lenient;

    impl Verifier for Lenient {
        fn verify(
            &self,
            _session: SessionId,
            proof: &str,
            _expected: &crate::verify::Purpose,
            _now: DateTime<Utc>,
        ) -> Result<(), crate::verify::VerifyError> {
            if proof.is_empty() {
                Err(crate::verify::VerifyError::Missing)
            } else {
                Ok(())
            }
        }

        fn challenge_url(&self, _session: SessionId, _purpose: &crate::verify::Purpose) -> String {
            "https://verify.invalid/".to_string()
        }
    }

    #[test]
    fn test_custom_verifier_gates_login() {
        let mut config = Config::default();
        config.captcha = Some(crate::config::CaptchaConfig {
            url: "https://captcha.invalid/".to_string(),
            hmac_secret: "unused".to_string(),
            required_for_login: true,
            validity_secs: 60,
        });
        let mut replica = Replica::new(Arc::new(config)).with_verifier(Box::new(Lenient));
        replica.apply(&entry(1, EntryKind::CreateSession)).unwrap();
        replica.apply(&line(2, 1, "NICK alice")).unwrap();
        let out = replica.apply(&line(3, 1, "USER a 0 * :A")).unwrap();
        assert_eq!(out[0].message.command, "NOTICE");
        assert!(out[0].message.trailing().contains("https://verify.invalid/"));

        let out = replica.apply(&line(4, 1, "PASS :captcha=ok")).unwrap();
        assert_eq!(out[0].message.command, "001");
        assert!(replica.directory().session(CompositeId::main(1)).unwrap().logged_in);
    }
}
