//! Mode string parsing.

use super::types::{ModeChange, ModeContext, ModeSign};

/// Expand a compact mode string into an ordered list of changes.
///
/// The sign defaults to `+` until the first `+`/`-`. Letters that take an
/// argument in `context` consume the next element of `args`; when the
/// arguments run out the change still appears, with `arg` set to `None`.
/// Letters are not validated here: deciding what is known is up to whoever
/// applies the changes.
///
/// ```
/// use slirc_proto::mode::parse_modes;
/// use slirc_proto::{ModeChange, ModeContext};
///
/// let changes = parse_modes(ModeContext::Channel, "+ov", &["nick1", "nick2"]);
/// assert_eq!(
///     changes,
///     vec![ModeChange::plus('o').with_arg("nick1"), ModeChange::plus('v')]
/// );
/// ```
pub fn parse_modes<S: AsRef<str>>(context: ModeContext, modes: &str, args: &[S]) -> Vec<ModeChange> {
    let mut sign = ModeSign::Plus;
    let mut args = args.iter().map(AsRef::as_ref);
    let mut changes = Vec::with_capacity(modes.len());

    for letter in modes.chars() {
        match letter {
            '+' => sign = ModeSign::Plus,
            '-' => sign = ModeSign::Minus,
            _ => {
                let arg = if context.takes_arg(letter) {
                    args.next().map(str::to_owned)
                } else {
                    None
                };
                changes.push(ModeChange { sign, letter, arg });
            }
        }
    }

    changes
}
