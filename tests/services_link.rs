//! Integration tests for the services link and the commands it may issue.

mod common;

use common::{TestNetwork, find, has};
use slircd_replica::state::CompositeId;

#[test]
fn test_link_needs_password() {
    let mut net = TestNetwork::new();
    let mut link = net.connect();
    net.send(&link, "PASS :services=wrong");
    net.send(&link, "SERVER services.robustirc.net 1 :Services");
    let reply = net.drain(&mut link);
    assert_eq!(find(&reply, "ERROR").unwrap().params, ["Invalid password"]);
    let session = net.replica().directory().session(link.session).unwrap();
    assert!(!session.is_server());
}

#[test]
fn test_link_burst_lists_users_and_memberships() {
    let mut net = TestNetwork::new();
    let bob = net.register("bob");
    let alice = net.register("alice");
    net.send(&bob, "JOIN #rust");
    net.send(&alice, "JOIN #rust");

    let mut link = net.link_services();
    let burst = net.drain(&mut link);
    let lines: Vec<String> = burst.iter().map(|m| m.to_string()).collect();
    assert_eq!(lines[0], "SERVER robustirc.net 1 23");
    assert!(lines[1].starts_with("NICK alice 1 1 alice "));
    assert_eq!(lines[2], ":robustirc.net SJOIN 1 #rust alice");
    assert!(lines[3].starts_with("NICK bob 1 1 bob "));
    assert_eq!(lines[4], ":robustirc.net SJOIN 1 #rust @bob");
    assert_eq!(lines.len(), 5);
}

#[test]
fn test_link_sees_later_activity() {
    let mut net = TestNetwork::new();
    let mut link = net.link_services();
    net.drain(&mut link);

    let alice = net.register("alice");
    let seen = net.drain(&mut link);
    let intro = find(&seen, "NICK").expect("new users are introduced");
    assert_eq!(intro.params[0], "alice");

    net.send(&alice, "JOIN #rust");
    let seen = net.drain(&mut link);
    assert_eq!(find(&seen, "SJOIN").unwrap().params, ["1", "#rust", "@alice"]);
}

#[test]
fn test_services_users_ride_on_the_link() {
    let mut net = TestNetwork::new();
    let link = net.link_services();
    let mut alice = net.register("alice");

    net.send(&link, "NICK ChanServ 1 1700000000 services services.robustirc.net services.robustirc.net 0 :Channel Services");
    let chanserv = CompositeId::subsession(link.id(), "ChanServ");
    let dir = net.replica().directory();
    assert_eq!(dir.find_nick("chanserv"), Some(chanserv));
    assert!(dir.session(chanserv).unwrap().logged_in);

    net.send(&link, ":ChanServ PRIVMSG alice :Welcome!");
    let got = net.drain(&mut alice);
    let msg = find(&got, "PRIVMSG").unwrap();
    assert_eq!(msg.source_nickname(), Some("ChanServ"));
    assert_eq!(msg.params, ["alice", "Welcome!"]);

    // Output for the subsession goes to the link's connection.
    net.send(&alice, "PRIVMSG ChanServ :HELP");
    let produced = net.send(&alice, "PRIVMSG chanserv :HELP again");
    assert!(produced.iter().all(|m| m.is_interesting_for(link.session)));
}

#[test]
fn test_svsjoin_behaves_like_join() {
    let mut net = TestNetwork::new();
    let mut link = net.link_services();
    let mut alice = net.register("alice");
    net.drain(&mut link);

    net.send(&link, "SVSJOIN alice #help");
    let got = net.drain(&mut alice);
    assert_eq!(find(&got, "JOIN").unwrap().params, ["#help"]);
    assert!(has(&got, "331"));
    let names = find(&got, "353").unwrap();
    assert_eq!(names.params[0], "alice");
    assert_eq!(names.params[3], "@alice");

    let seen = net.drain(&mut link);
    assert!(has(&seen, "SJOIN"));
    assert!(!has(&seen, "353"), "replies go to the user, not the link");
}

#[test]
fn test_svshold_blocks_nick_until_expiry() {
    let mut net = TestNetwork::new();
    let link = net.link_services();
    let mut dave = net.register("dave");

    net.send(&link, "SVSHOLD carol 60 :held for registration");
    net.send(&dave, "NICK carol");
    let reply = net.drain(&mut dave);
    let refused = find(&reply, "432").expect("held nick is refused");
    assert!(refused.params.last().unwrap().contains("held for registration"));

    net.advance(61);
    net.send(&dave, "NICK carol");
    assert!(has(&net.drain(&mut dave), "NICK"));
    assert!(net.replica().directory().hold("carol").is_none());
}

#[test]
fn test_svshold_rejects_duration_beyond_calendar() {
    let mut net = TestNetwork::new();
    let mut link = net.link_services();
    let mut dave = net.register("dave");
    net.drain(&mut link);

    net.send(&link, "SVSHOLD carol 10000000000000 :forever");
    let reply = net.drain(&mut link);
    let notice = find(&reply, "NOTICE").expect("link is told why");
    assert!(notice.params.last().unwrap().starts_with("Invalid duration"));
    assert!(net.replica().directory().hold("carol").is_none());

    net.send(&dave, "NICK carol");
    assert!(has(&net.drain(&mut dave), "NICK"));
}

#[test]
fn test_services_mode_with_unknown_letter_is_not_relayed() {
    let mut net = TestNetwork::new();
    let mut link = net.link_services();
    net.send(&link, "NICK ChanServ 1 1700000000 services services.robustirc.net services.robustirc.net 0 :Channel Services");
    let mut alice = net.register("alice");
    net.send(&alice, "JOIN #rust");
    net.drain(&mut alice);
    net.drain(&mut link);

    net.send(&link, ":ChanServ MODE #rust +rz");
    assert!(has(&net.drain(&mut link), "472"));
    assert!(!has(&net.drain(&mut alice), "MODE"));
    assert!(net.replica().directory().channel("#rust").unwrap().has_mode('r'));

    net.send(&link, ":ChanServ MODE #rust +t");
    let seen = net.drain(&mut alice);
    assert_eq!(find(&seen, "MODE").unwrap().params, ["#rust", "+t"]);
}

#[test]
fn test_svsnick_renames_user() {
    let mut net = TestNetwork::new();
    let link = net.link_services();
    let mut alice = net.register("alice");

    net.send(&link, "SVSNICK alice Guest123");
    let got = net.drain(&mut alice);
    let change = find(&got, "NICK").unwrap();
    assert_eq!(change.source_nickname(), Some("alice"));
    assert_eq!(change.params, ["Guest123"]);
    assert_eq!(
        net.replica().directory().find_nick("guest123"),
        Some(alice.session)
    );
}

#[test]
fn test_link_quit_removes_services_users() {
    let mut net = TestNetwork::new();
    let link = net.link_services();
    net.send(&link, "NICK NickServ 1 1700000000 services services.robustirc.net services.robustirc.net 0 :Nick Services");
    assert!(net.replica().directory().find_nick("NickServ").is_some());

    net.disconnect(&link, "link lost");
    let dir = net.replica().directory();
    assert!(dir.find_nick("NickServ").is_none());
    assert!(dir.session(link.session).is_none());
    assert_eq!(dir.session_count(), 0);
}
