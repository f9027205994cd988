//! Mode change types and rendering.

use std::fmt;

/// Whether a change sets or clears its letter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModeSign {
    /// `+`
    Plus,
    /// `-`
    Minus,
}

impl ModeSign {
    /// `true` for [`ModeSign::Plus`].
    pub fn is_plus(self) -> bool {
        self == ModeSign::Plus
    }

    /// The sign character.
    pub fn as_char(self) -> char {
        match self {
            ModeSign::Plus => '+',
            ModeSign::Minus => '-',
        }
    }
}

/// What a mode string is being applied to. Decides which letters consume an
/// argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeContext {
    /// Channel modes: `o` takes a nickname.
    Channel,
    /// User modes: `d` takes a services id.
    User,
}

impl ModeContext {
    /// Whether `letter` consumes the next argument in this context.
    pub fn takes_arg(self, letter: char) -> bool {
        match self {
            ModeContext::Channel => letter == 'o',
            ModeContext::User => letter == 'd',
        }
    }
}

/// One `(sign, letter, argument)` triple.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModeChange {
    /// Set or clear.
    pub sign: ModeSign,
    /// The mode letter.
    pub letter: char,
    /// Argument, for letters that take one. `None` when the mode string ran
    /// out of arguments.
    pub arg: Option<String>,
}

impl ModeChange {
    /// `+letter`
    pub fn plus(letter: char) -> Self {
        ModeChange {
            sign: ModeSign::Plus,
            letter,
            arg: None,
        }
    }

    /// `-letter`
    pub fn minus(letter: char) -> Self {
        ModeChange {
            sign: ModeSign::Minus,
            letter,
            arg: None,
        }
    }

    /// Attach an argument.
    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.arg = Some(arg.into());
        self
    }
}

impl fmt::Display for ModeChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.sign.as_char(), self.letter)
    }
}

/// Render changes back into a compact string plus its arguments.
///
/// All additions come first, then all removals; the relative order within
/// each group is kept, and so is the order of the arguments.
///
/// ```
/// use slirc_proto::mode::{render_modes, ModeChange};
///
/// let changes = [
///     ModeChange::minus('t'),
///     ModeChange::plus('o').with_arg("bob"),
///     ModeChange::plus('n'),
/// ];
/// let (modes, args) = render_modes(&changes);
/// assert_eq!(modes, "+on-t");
/// assert_eq!(args, vec!["bob"]);
/// ```
pub fn render_modes(changes: &[ModeChange]) -> (String, Vec<String>) {
    let mut modes = String::new();
    let mut args = Vec::new();
    for sign in [ModeSign::Plus, ModeSign::Minus] {
        let mut group = changes.iter().filter(|c| c.sign == sign).peekable();
        if group.peek().is_none() {
            continue;
        }
        modes.push(sign.as_char());
        for change in group {
            modes.push(change.letter);
            if let Some(arg) = change.arg.as_deref().filter(|a| !a.is_empty()) {
                args.push(arg.to_owned());
            }
        }
    }
    (modes, args)
}
