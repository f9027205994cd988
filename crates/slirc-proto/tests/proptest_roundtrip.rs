//! Property-based tests for message parsing, serialization and the mode
//! grammar.

use proptest::prelude::*;
use slirc_proto::mode::{parse_modes, render_modes};
use slirc_proto::{irc_to_lower, Message, ModeContext, Prefix};

fn nickname_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z\\[\\]\\\\^_`{|}][a-zA-Z0-9\\-\\[\\]\\\\^_`{|}]{0,15}")
        .expect("valid regex")
}

fn username_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z][a-zA-Z0-9]{0,9}").expect("valid regex")
}

fn hostname_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9]+(/0x[0-9a-f]{1,16})?").expect("valid regex")
}

fn middle_param_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[#a-zA-Z0-9_\\-]{1,20}").expect("valid regex")
}

/// Anything without line terminators or NUL, including the awkward cases.
fn trailing_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("[^\r\n\0]{0,200}").expect("valid regex"),
        Just(String::new()),
        Just(":".to_string()),
        Just(":leading".to_string()),
        Just("multiple   spaces   here".to_string()),
    ]
}

proptest! {
    #[test]
    fn serialized_messages_reparse(
        nick in nickname_strategy(),
        user in username_strategy(),
        host in hostname_strategy(),
        middle in prop::collection::vec(middle_param_strategy(), 0..5),
        trailing in trailing_strategy(),
    ) {
        let mut params = middle;
        params.push(trailing);
        let msg = Message::new("PRIVMSG", params).with_prefix(Prefix::user(nick, user, host));

        let reparsed: Message = msg.to_string().parse().expect("serializer output parses");
        prop_assert_eq!(reparsed, msg);
    }

    #[test]
    fn parser_never_panics(line in "[^\0]{0,300}") {
        let _ = line.parse::<Message>();
    }

    #[test]
    fn folding_is_idempotent(nick in nickname_strategy()) {
        let once = irc_to_lower(&nick);
        prop_assert_eq!(irc_to_lower(&once), once.clone());
    }

    #[test]
    fn rendered_modes_keep_every_change(
        letters in prop::collection::vec((any::<bool>(), prop::sample::select(vec!['n', 't', 's', 'i', 'x'])), 0..8),
    ) {
        let input: String = letters
            .iter()
            .map(|(plus, c)| format!("{}{}", if *plus { '+' } else { '-' }, c))
            .collect();
        let changes = parse_modes(ModeContext::Channel, &input, &[] as &[&str]);
        prop_assert_eq!(changes.len(), letters.len());

        let (rendered, args) = render_modes(&changes);
        prop_assert!(args.is_empty());
        let reparsed = parse_modes(ModeContext::Channel, &rendered, &[] as &[&str]);
        prop_assert_eq!(reparsed.len(), changes.len());
    }
}
