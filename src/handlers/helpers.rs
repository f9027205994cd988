//! Helper functions for IRC command handlers.
//!
//! Reply builders and origin prefixes shared across handlers. Error
//! replies live on [`HandlerError`](crate::error::HandlerError).

use slirc_proto::{Message, Prefix, Response};

// ============================================================================
// Common reply helpers
// ============================================================================

/// Helper to create a server reply message (numeric response).
pub fn server_reply(server_name: &str, response: Response, params: Vec<String>) -> Message {
    Message::new(response.to_string(), params).with_prefix(Prefix::server(server_name))
}

/// Helper to create a server NOTICE message.
pub fn server_notice<T: Into<String>>(server_name: &str, target: &str, text: T) -> Message {
    Message::new("NOTICE", [target.to_string(), text.into()]).with_prefix(Prefix::server(server_name))
}

// ============================================================================
// Prefixes and hosts
// ============================================================================

/// Origin used for messages services send on behalf of `name`.
pub fn services_prefix(name: &str) -> Prefix {
    Prefix::user(name, "services", "services")
}

/// Visible host of connection `primary`.
pub fn visible_host(host_prefix: &str, primary: i64) -> String {
    format!("{host_prefix}/0x{primary:x}")
}

/// Nicknames services reserve for their own bots.
pub const SERVICES_NICKS: &[&str] = &[
    "NickServ", "ChanServ", "OperServ", "MemoServ", "HostServ", "BotServ",
];

pub fn is_services_nick(nick: &str) -> bool {
    SERVICES_NICKS
        .iter()
        .any(|s| slirc_proto::irc_eq(s, nick))
}

/// Split a comma-separated target list, dropping empty entries.
pub fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_shape() {
        let msg = server_reply(
            "irc.test",
            Response::RPL_WELCOME,
            vec!["alice".into(), "Welcome to RobustIRC!".into()],
        );
        assert_eq!(msg.to_string(), ":irc.test 001 alice :Welcome to RobustIRC!");
    }

    #[test]
    fn notice_shape() {
        let msg = server_notice("irc.test", "alice", "hello");
        assert_eq!(msg.to_string(), ":irc.test NOTICE alice hello");
    }

    #[test]
    fn host_is_hex_of_connection() {
        assert_eq!(visible_host("robust", 255), "robust/0xff");
    }

    #[test]
    fn services_nicks_fold_case() {
        assert!(is_services_nick("nickserv"));
        assert!(!is_services_nick("nickserv2"));
    }

    #[test]
    fn split_list_drops_empties() {
        assert_eq!(split_list("#a,,#b,").collect::<Vec<_>>(), vec!["#a", "#b"]);
    }
}
