//! Integration tests for channel flows: JOIN, PART, PRIVMSG and MODE.

mod common;

use common::{TestNetwork, find, has};

#[test]
fn test_first_joiner_is_operator() {
    let mut net = TestNetwork::new();
    let mut alice = net.register("alice");
    let mut bob = net.register("bob");

    net.send(&alice, "JOIN #Rust");
    let burst = net.drain(&mut alice);
    let join = find(&burst, "JOIN").unwrap();
    assert_eq!(join.source_nickname(), Some("alice"));
    assert_eq!(join.params, ["#Rust"]);
    assert_eq!(find(&burst, "MODE").unwrap().params, ["#Rust", "+nt"]);
    assert_eq!(find(&burst, "353").unwrap().params[3], "@alice");

    net.send(&bob, "JOIN #rust");
    let burst = net.drain(&mut bob);
    let names = find(&burst, "353").unwrap();
    assert_eq!(names.params[2], "#Rust", "display name keeps the creator's case");
    assert_eq!(names.params[3], "@alice bob");
    assert!(!has(&burst, "MODE"));

    let seen = net.drain(&mut alice);
    assert_eq!(find(&seen, "JOIN").unwrap().source_nickname(), Some("bob"));
}

#[test]
fn test_channel_disappears_with_last_member() {
    let mut net = TestNetwork::new();
    let alice = net.register("alice");
    let mut bob = net.register("bob");

    net.send(&alice, "JOIN #tmp");
    net.send(&alice, "MODE #tmp +s");
    net.send(&alice, "PART #tmp");
    assert!(net.replica().directory().channel("#tmp").is_none());

    // Re-created from scratch: new operator, default modes.
    net.send(&bob, "JOIN #tmp");
    let burst = net.drain(&mut bob);
    assert_eq!(find(&burst, "353").unwrap().params[3], "@bob");
    let chan = net.replica().directory().channel("#tmp").unwrap();
    assert!(chan.is_op("bob"));
    assert!(!chan.has_mode('s'));
}

#[test]
fn test_channel_message_skips_sender() {
    let mut net = TestNetwork::new();
    let mut alice = net.register("alice");
    let mut bob = net.register("bob");
    let mut carol = net.register("carol");
    net.send(&alice, "JOIN #rust");
    net.send(&bob, "JOIN #rust");
    net.drain(&mut alice);
    net.drain(&mut bob);

    net.send(&alice, "PRIVMSG #rust :hello from alice");
    let got = net.drain(&mut bob);
    let msg = find(&got, "PRIVMSG").unwrap();
    assert_eq!(msg.source_nickname(), Some("alice"));
    assert_eq!(msg.params, ["#rust", "hello from alice"]);
    assert!(net.drain(&mut alice).is_empty());

    // +n: outsiders cannot talk into the channel.
    net.send(&carol, "PRIVMSG #rust :let me in");
    assert!(has(&net.drain(&mut carol), "404"));
    assert!(net.drain(&mut bob).is_empty());
}

#[test]
fn test_mode_applies_what_it_can() {
    let mut net = TestNetwork::new();
    let mut alice = net.register("alice");
    let mut bob = net.register("bob");
    net.send(&alice, "JOIN #rust");
    net.send(&bob, "JOIN #rust");
    net.drain(&mut alice);
    net.drain(&mut bob);

    net.send(&alice, "MODE #rust +zs");
    let reply = net.drain(&mut alice);
    assert_eq!(find(&reply, "472").unwrap().params[1], "z");
    assert!(!has(&reply, "MODE"));
    assert!(net.replica().directory().channel("#rust").unwrap().has_mode('s'));

    let seen = net.drain(&mut bob);
    assert!(seen.is_empty());

    net.send(&alice, "MODE #rust +t");
    let seen = net.drain(&mut bob);
    assert_eq!(find(&seen, "MODE").unwrap().params, ["#rust", "+t"]);
}

#[test]
fn test_mode_needs_channel_operator() {
    let mut net = TestNetwork::new();
    let alice = net.register("alice");
    let mut bob = net.register("bob");
    net.send(&alice, "JOIN #rust");
    net.send(&bob, "JOIN #rust");
    net.drain(&mut bob);

    net.send(&bob, "MODE #rust +i");
    assert!(has(&net.drain(&mut bob), "482"));
    assert!(!net.replica().directory().channel("#rust").unwrap().has_mode('i'));

    net.send(&alice, "MODE #rust +o bob");
    assert!(net.replica().directory().channel("#rust").unwrap().is_op("bob"));
}

#[test]
fn test_invite_only_channel() {
    let mut net = TestNetwork::new();
    let alice = net.register("alice");
    let mut bob = net.register("bob");
    net.send(&alice, "JOIN #club");
    net.send(&alice, "MODE #club +i");

    net.send(&bob, "JOIN #club");
    assert!(has(&net.drain(&mut bob), "473"));

    net.send(&alice, "INVITE bob #club");
    let got = net.drain(&mut bob);
    assert_eq!(find(&got, "INVITE").unwrap().source_nickname(), Some("alice"));

    net.send(&bob, "JOIN #club");
    assert!(has(&net.drain(&mut bob), "JOIN"));
    // The invitation is used up.
    let session = net.replica().directory().session(bob.session).unwrap();
    assert!(session.invited_to.is_empty());
}

#[test]
fn test_kick_removes_member() {
    let mut net = TestNetwork::new();
    let alice = net.register("alice");
    let mut bob = net.register("bob");
    net.send(&alice, "JOIN #rust");
    net.send(&bob, "JOIN #rust");
    net.drain(&mut bob);

    net.send(&alice, "KICK #rust bob :behave");
    let got = net.drain(&mut bob);
    let kick = find(&got, "KICK").unwrap();
    assert_eq!(kick.params, ["#rust", "bob", "behave"]);
    assert_eq!(
        net.replica().directory().channel_members("#rust"),
        vec![alice.session]
    );
}
