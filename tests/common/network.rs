//! A single replica fed through its log interface.

use super::client::TestClient;
use chrono::{DateTime, Utc};
use slirc_proto::Message;
use slircd_replica::config::Config;
use slircd_replica::output::OutputMessage;
use slircd_replica::state::CompositeId;
use slircd_replica::{EntryKind, LogEntry, Replica};
use std::sync::Arc;

/// Services password accepted by [`test_config`].
#[allow(dead_code)]
pub const SERVICES_PASSWORD: &str = "s3cret";

/// Configuration shared by the integration tests.
pub fn test_config() -> Config {
    Config::from_toml(
        r#"
        [server]
        name = "robustirc.net"
        network = "TestNet"
        motd = ["hello"]

        [[oper]]
        name = "root"
        password = "hunter2"

        [[services]]
        password = "s3cret"
        "#,
    )
    .expect("test config parses")
}

/// A replica plus the log position and clock the tests drive it with.
pub struct TestNetwork {
    replica: Replica,
    next_id: i64,
    /// Replicated clock, whole seconds.
    now: i64,
}

#[allow(dead_code)]
impl TestNetwork {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            replica: Replica::new(Arc::new(config)),
            next_id: 1,
            now: 1_700_000_000,
        }
    }

    pub fn replica(&self) -> &Replica {
        &self.replica
    }

    /// The replicated clock.
    pub fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.now, 0).expect("test clock in range")
    }

    /// Move the replicated clock forward.
    pub fn advance(&mut self, secs: i64) {
        self.now += secs;
    }

    fn entry(&mut self, kind: EntryKind) -> LogEntry {
        let id = self.next_id;
        self.next_id += 1;
        LogEntry {
            id,
            timestamp: self.now * 1_000_000_000,
            kind,
        }
    }

    /// Apply an entry that must be accepted.
    pub fn apply(&mut self, kind: EntryKind) -> Vec<OutputMessage> {
        let entry = self.entry(kind);
        self.replica
            .apply(&entry)
            .unwrap_or_else(|e| panic!("entry {} rejected: {e}", entry.id))
    }

    /// A new connection that has not sent anything yet.
    pub fn connect(&mut self) -> TestClient {
        let id = self.next_id;
        self.apply(EntryKind::CreateSession);
        TestClient::new(CompositeId::main(id), self.replica.stream().last_seen())
    }

    /// A connection that has completed NICK and USER. Its welcome burst is
    /// already drained.
    pub fn register(&mut self, nick: &str) -> TestClient {
        let mut client = self.connect();
        self.send(&client, &format!("NICK {nick}"));
        self.send(&client, &format!("USER {nick} 0 * :Test User {nick}"));
        let burst = self.drain(&mut client);
        assert!(
            burst.iter().any(|m| m.command == "001"),
            "{nick} did not get RPL_WELCOME: {burst:?}"
        );
        client.nick = nick.to_string();
        client
    }

    /// An authenticated services link. The link burst is left unread.
    pub fn link_services(&mut self) -> TestClient {
        let client = self.connect();
        self.send(&client, &format!("PASS :services={SERVICES_PASSWORD}"));
        self.send(&client, "SERVER services.robustirc.net 1 :Services for IRC Networks");
        client
    }

    /// One line from `client`.
    pub fn send(&mut self, client: &TestClient, line: &str) -> Vec<OutputMessage> {
        self.apply(EntryKind::IrcFromClient {
            session: client.id(),
            line: line.to_string(),
            replay: false,
        })
    }

    /// One line from `client`, re-applied during recovery.
    pub fn replay(&mut self, client: &TestClient, line: &str) -> Vec<OutputMessage> {
        self.apply(EntryKind::IrcFromClient {
            session: client.id(),
            line: line.to_string(),
            replay: true,
        })
    }

    /// The connection went away without a QUIT.
    pub fn disconnect(&mut self, client: &TestClient, reason: &str) -> Vec<OutputMessage> {
        self.apply(EntryKind::DeleteSession {
            session: client.id(),
            reason: reason.to_string(),
        })
    }

    /// Everything delivered to `client` since the last drain.
    pub fn drain(&self, client: &mut TestClient) -> Vec<Message> {
        let stream = self.replica.stream();
        let end = stream.last_seen();
        let mut received = Vec::new();
        for primary in client.last_seen.primary + 1..=end.primary {
            let Some(batch) = stream.get(CompositeId::new(primary, 0)) else {
                continue;
            };
            received.extend(
                batch
                    .iter()
                    .filter(|m| m.is_interesting_for(client.session))
                    .map(|m| m.message.clone()),
            );
        }
        client.last_seen = end;
        received
    }
}
