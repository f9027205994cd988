//! Integration tests for registration, nick changes and disconnects.

mod common;

use common::{TestClient, TestNetwork, find, has};
use slircd_replica::handlers::Registry;

#[test]
fn test_registration_burst() {
    let mut net = TestNetwork::new();
    let mut alice = net.connect();
    net.send(&alice, "NICK alice");
    assert!(net.drain(&mut alice).is_empty(), "no output before USER");

    net.send(&alice, "USER alice 0 * :Alice Liddell");
    let burst = net.drain(&mut alice);
    let codes: Vec<&str> = burst.iter().map(|m| m.command.as_str()).collect();
    assert_eq!(&codes[..5], ["001", "002", "003", "004", "005"]);
    assert!(codes.contains(&"372"));
    assert_eq!(codes.last(), Some(&"376"));

    let welcome = find(&burst, "001").unwrap();
    assert_eq!(welcome.params[0], "alice");

    let session = net.replica().directory().session(alice.session).unwrap();
    assert!(session.logged_in);
    assert_eq!(session.realname, "Alice Liddell");
    assert_eq!(session.host, format!("robust/0x{:x}", alice.id()));
}

#[test]
fn test_commands_before_login_are_refused() {
    let mut net = TestNetwork::new();
    let mut client = net.connect();
    net.send(&client, "JOIN #rust");
    let reply = net.drain(&mut client);
    let refused = find(&reply, "451").expect("ERR_NOTREGISTERED");
    assert_eq!(refused.params[0], "*");
    assert_eq!(net.replica().directory().channel_count(), 0);

    // PING is allowed before login.
    net.send(&client, "PING :token");
    assert!(has(&net.drain(&mut client), "PONG"));
}

#[test]
fn test_missing_parameters() {
    let mut net = TestNetwork::new();
    let mut alice = net.register("alice");
    net.send(&alice, "JOIN");
    let reply = net.drain(&mut alice);
    let err = find(&reply, "461").expect("ERR_NEEDMOREPARAMS");
    assert_eq!(err.params, ["alice", "JOIN", "Not enough parameters"]);
}

/// Everything a command could change, minus activity timestamps.
fn directory_state(net: &TestNetwork) -> String {
    let dir = net.replica().directory();
    let mut out = String::new();
    for s in dir.sessions() {
        out += &format!(
            "{} {} {:?} {} {} {} {:?} {:?} {:?} {:?}\n",
            s.id, s.nick, s.modes, s.away, s.operator, s.logged_in, s.server_name,
            s.channels, s.invited_to, s.pass
        );
    }
    for c in dir.channels() {
        out += &format!("{c:?}\n");
    }
    out
}

fn assert_short_commands_refused(net: &mut TestNetwork, client: &mut TestClient, verbs: &[(&str, usize)]) {
    net.drain(client);
    for &(verb, min) in verbs {
        let line = std::iter::once(verb.to_string())
            .chain((0..min - 1).map(|i| format!("p{i}")))
            .collect::<Vec<_>>()
            .join(" ");
        let before = directory_state(net);
        net.send(client, &line);
        let reply = net.drain(client);
        assert_eq!(reply.len(), 1, "{line:?} produced {reply:?}");
        assert_eq!(reply[0].command, "461", "{line:?}");
        assert_eq!(reply[0].params[1], verb);
        assert_eq!(directory_state(net), before, "{line:?} changed state");
    }
}

#[test]
fn test_every_verb_checks_its_minimum() {
    let registry = Registry::new();
    let (mut user_verbs, mut link_verbs) = (Vec::new(), Vec::new());
    for verb in registry.verbs() {
        let min = registry.min_params(verb).unwrap();
        if min == 0 {
            continue;
        }
        match verb.strip_prefix("server_") {
            Some(bare) => link_verbs.push((bare, min)),
            None => user_verbs.push((verb, min)),
        }
    }
    assert!(user_verbs.contains(&("JOIN", 1)));
    assert!(link_verbs.contains(&("TOPIC", 3)));

    let mut net = TestNetwork::new();
    let mut alice = net.register("alice");
    let bob = net.register("bob");
    net.send(&alice, "JOIN #rust");
    net.send(&bob, "JOIN #rust");
    assert_short_commands_refused(&mut net, &mut alice, &user_verbs);

    let mut link = net.link_services();
    assert_short_commands_refused(&mut net, &mut link, &link_verbs);
}

#[test]
fn test_unknown_commands_are_ignored() {
    let mut net = TestNetwork::new();
    let mut alice = net.register("alice");
    let produced = net.send(&alice, "FROBNICATE now");
    assert!(produced.is_empty());
    assert!(net.drain(&mut alice).is_empty());
}

#[test]
fn test_nick_collision_and_case_change() {
    let mut net = TestNetwork::new();
    let mut alice = net.register("alice");
    let mut bob = net.register("bob");

    net.send(&bob, "NICK ALICE");
    let reply = net.drain(&mut bob);
    assert_eq!(find(&reply, "433").unwrap().params[1], "ALICE");

    // Changing only the case of one's own nick is not a collision.
    net.send(&alice, "NICK ALICE");
    let reply = net.drain(&mut alice);
    let change = find(&reply, "NICK").expect("NICK echoed to the caller");
    assert_eq!(change.source_nickname(), Some("alice"));
    assert_eq!(change.params[0], "ALICE");
    assert_eq!(
        net.replica().directory().find_nick("alice"),
        Some(alice.session)
    );
}

#[test]
fn test_services_nicks_are_reserved() {
    let mut net = TestNetwork::new();
    let mut alice = net.register("alice");
    net.send(&alice, "NICK NickServ");
    assert!(has(&net.drain(&mut alice), "433"));
}

#[test]
fn test_quit_and_disconnect_notify_peers() {
    let mut net = TestNetwork::new();
    let mut alice = net.register("alice");
    let bob = net.register("bob");
    let carol = net.register("carol");
    net.send(&alice, "JOIN #rust");
    net.send(&bob, "JOIN #rust");
    net.send(&carol, "JOIN #rust");
    net.drain(&mut alice);

    net.send(&bob, "QUIT :bye now");
    let seen = net.drain(&mut alice);
    let quit = find(&seen, "QUIT").expect("alice sees bob quit");
    assert_eq!(quit.source_nickname(), Some("bob"));
    assert_eq!(quit.params, ["bye now"]);

    net.disconnect(&carol, "Connection reset");
    let seen = net.drain(&mut alice);
    let quit = find(&seen, "QUIT").expect("alice sees carol leave");
    assert_eq!(quit.source_nickname(), Some("carol"));

    let dir = net.replica().directory();
    assert!(dir.session(bob.session).is_none());
    assert!(dir.session(carol.session).is_none());
    assert_eq!(dir.channel_members("#rust"), vec![alice.session]);
}

#[test]
fn test_away_and_whois() {
    let mut net = TestNetwork::new();
    let mut alice = net.register("alice");
    let bob = net.register("bob");

    net.send(&bob, "AWAY :lunch");
    net.send(&alice, "PRIVMSG bob :hi");
    let reply = net.drain(&mut alice);
    assert_eq!(find(&reply, "301").unwrap().params, ["alice", "bob", "lunch"]);

    net.advance(30);
    net.send(&alice, "WHOIS bob");
    let reply = net.drain(&mut alice);
    let codes: Vec<&str> = reply.iter().map(|m| m.command.as_str()).collect();
    assert_eq!(codes.first(), Some(&"311"));
    assert_eq!(codes.last(), Some(&"318"));
    let idle = find(&reply, "317").unwrap();
    assert_eq!(idle.params[2], "30");
}
