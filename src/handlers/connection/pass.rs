//! PASS handler and credential parsing.
//!
//! A password carries several credentials at once:
//! `nickserv=secret:oper=root pw:captcha=token`. A bare password is taken
//! as the NickServ one.

use super::super::{Context, Handler, HandlerResult};
use super::welcome::maybe_login;
use slirc_proto::Message;

const CREDENTIAL_KEYS: &[&str] = &["nickserv=", "services=", "network=", "oper=", "session=", "captcha="];

/// Handler for PASS command.
pub struct PassHandler;

impl Handler for PassHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let mut pass = msg.params.join(" ");
        if !CREDENTIAL_KEYS.iter().any(|k| pass.starts_with(k)) {
            pass.insert_str(0, "nickserv=");
        }
        ctx.caller_mut()?.pass = pass;
        maybe_login(ctx)
    }
}

/// Value of credential `key` within a PASS string, if present.
///
/// Fields are separated by `:`. A field that does not start with a known
/// key continues the previous value, so values may contain colons.
pub fn extract_credential<'a>(pass: &'a str, key: &str) -> Option<&'a str> {
    let marker = format!("{key}=");
    let start = field_starts(pass).find(|&i| pass[i..].starts_with(&marker))? + marker.len();
    let end = field_starts(pass)
        .find(|&i| i > start)
        .map_or(pass.len(), |i| i - 1);
    Some(&pass[start..end])
}

/// Byte offsets where a credential field begins.
fn field_starts(pass: &str) -> impl Iterator<Item = usize> + '_ {
    std::iter::once(0)
        .chain(pass.match_indices(':').map(|(i, _)| i + 1))
        .filter(move |&i| CREDENTIAL_KEYS.iter().any(|k| pass[i..].starts_with(k)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_credential() {
        assert_eq!(extract_credential("nickserv=hunter2", "nickserv"), Some("hunter2"));
        assert_eq!(extract_credential("nickserv=hunter2", "oper"), None);
    }

    #[test]
    fn several_credentials() {
        let pass = "nickserv=a:oper=root secret:captcha=tok.sig";
        assert_eq!(extract_credential(pass, "nickserv"), Some("a"));
        assert_eq!(extract_credential(pass, "oper"), Some("root secret"));
        assert_eq!(extract_credential(pass, "captcha"), Some("tok.sig"));
    }

    #[test]
    fn colons_inside_values() {
        let pass = "nickserv=a:b:c:oper=x";
        assert_eq!(extract_credential(pass, "nickserv"), Some("a:b:c"));
        assert_eq!(extract_credential(pass, "oper"), Some("x"));
    }
}
