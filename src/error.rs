//! Unified error handling for slircd-replica.
//!
//! Handler failures become protocol replies addressed to the caller and
//! never abort the apply loop. Failures at the replication boundary are
//! [`ApplyError`]s: logged by the caller, producing no output.

use crate::handlers::server_reply;
use crate::output::OutputError;
use slirc_proto::{Message, ProtocolError, Response};
use thiserror::Error;

// ============================================================================
// Handler Errors (command processing)
// ============================================================================

/// Errors that can occur during command handling.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("not enough parameters")]
    NeedMoreParams,

    #[error("not registered")]
    NotRegistered,

    #[error("no origin")]
    NoOrigin,

    #[error("no nickname given")]
    NoNicknameGiven,

    #[error("erroneous nickname: {nick}")]
    ErroneousNickname {
        nick: String,
        /// Reason of the hold blocking the nickname, if that is the cause.
        hold_reason: Option<String>,
    },

    #[error("nickname in use: {0}")]
    NicknameInUse(String),

    #[error("no recipient")]
    NoRecipient,

    #[error("no text to send")]
    NoTextToSend,

    #[error("no such nick: {0}")]
    NoSuchNick(String),

    #[error("no such channel: {0}")]
    NoSuchChannel(String),

    #[error("cannot send to channel: {0}")]
    CannotSendToChan(String),

    #[error("password incorrect")]
    PasswdMismatch,

    #[error("not an operator")]
    NoPrivileges,

    #[error("cannot change mode for other users")]
    UsersDontMatch,

    #[error("unknown user mode flag")]
    UnknownModeFlag,

    #[error("cannot knock on {channel}: {reason}")]
    CannotKnock { channel: String, reason: String },

    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NeedMoreParams => "need_more_params",
            Self::NotRegistered => "not_registered",
            Self::NoOrigin => "no_origin",
            Self::NoNicknameGiven => "no_nickname_given",
            Self::ErroneousNickname { .. } => "erroneous_nickname",
            Self::NicknameInUse(_) => "nickname_in_use",
            Self::NoRecipient => "no_recipient",
            Self::NoTextToSend => "no_text_to_send",
            Self::NoSuchNick(_) => "no_such_nick",
            Self::NoSuchChannel(_) => "no_such_channel",
            Self::CannotSendToChan(_) => "cannot_send_to_chan",
            Self::PasswdMismatch => "passwd_mismatch",
            Self::NoPrivileges => "no_privileges",
            Self::UsersDontMatch => "users_dont_match",
            Self::UnknownModeFlag => "unknown_mode_flag",
            Self::CannotKnock { .. } => "cannot_knock",
            Self::Channel(e) => e.error_code(),
            Self::Internal(_) => "internal_error",
        }
    }

    /// Convert to an IRC error reply message.
    ///
    /// `nick` is the caller as it should appear in the reply (`*` when it
    /// has none yet) and `cmd_name` the verb being processed.
    pub fn to_irc_reply(&self, server_name: &str, nick: &str, cmd_name: &str) -> Option<Message> {
        let nick = nick.to_string();
        let (response, params) = match self {
            Self::NeedMoreParams => (
                Response::ERR_NEEDMOREPARAMS,
                vec![nick, cmd_name.to_string(), "Not enough parameters".to_string()],
            ),
            Self::NotRegistered => (
                Response::ERR_NOTREGISTERED,
                vec![nick, "You have not registered".to_string()],
            ),
            Self::NoOrigin => (
                Response::ERR_NOORIGIN,
                vec![nick, "No origin specified".to_string()],
            ),
            Self::NoNicknameGiven => (
                Response::ERR_NONICKNAMEGIVEN,
                vec![nick, "No nickname given".to_string()],
            ),
            Self::ErroneousNickname { nick: bad, hold_reason } => {
                let text = match hold_reason {
                    Some(reason) => format!("Erroneous Nickname: {reason}"),
                    None => "Erroneous nickname".to_string(),
                };
                (Response::ERR_ERRONEUSNICKNAME, vec![nick, bad.clone(), text])
            }
            Self::NicknameInUse(taken) => (
                Response::ERR_NICKNAMEINUSE,
                vec![nick, taken.clone(), "Nickname is already in use".to_string()],
            ),
            Self::NoRecipient => (
                Response::ERR_NORECIPIENT,
                vec![nick, format!("No recipient given ({cmd_name})")],
            ),
            Self::NoTextToSend => (
                Response::ERR_NOTEXTTOSEND,
                vec![nick, "No text to send".to_string()],
            ),
            Self::NoSuchNick(target) => (
                Response::ERR_NOSUCHNICK,
                vec![nick, target.clone(), "No such nick/channel".to_string()],
            ),
            Self::NoSuchChannel(channel) => (
                Response::ERR_NOSUCHCHANNEL,
                vec![nick, channel.clone(), "No such channel".to_string()],
            ),
            Self::CannotSendToChan(channel) => (
                Response::ERR_CANNOTSENDTOCHAN,
                vec![nick, channel.clone(), "Cannot send to channel".to_string()],
            ),
            Self::PasswdMismatch => (
                Response::ERR_PASSWDMISMATCH,
                vec![nick, "Password incorrect".to_string()],
            ),
            Self::NoPrivileges => (
                Response::ERR_NOPRIVILEGES,
                vec![
                    nick,
                    "Permission Denied - You're not an IRC operator".to_string(),
                ],
            ),
            Self::UsersDontMatch => (
                Response::ERR_USERSDONTMATCH,
                vec![nick, "Can't change mode for other users".to_string()],
            ),
            Self::UnknownModeFlag => (
                Response::ERR_UMODEUNKNOWNFLAG,
                vec![nick, "Unknown MODE flag".to_string()],
            ),
            Self::CannotKnock { channel, reason } => (
                Response::ERR_CANNOTKNOCK,
                vec![nick, format!("Cannot knock on {channel} ({reason})")],
            ),
            Self::Channel(e) => return Some(e.to_irc_reply(server_name, &nick)),
            Self::Internal(_) => return None,
        };
        Some(server_reply(server_name, response, params))
    }
}

// ============================================================================
// Channel Errors
// ============================================================================

/// Errors scoped to one channel.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChannelError {
    #[error("not on channel {0}")]
    NotOnChannel(String),

    #[error("channel operator privileges needed on {0}")]
    ChanOpPrivsNeeded(String),

    #[error("{nick} is not on {channel}")]
    UserNotInChannel { nick: String, channel: String },

    #[error("{nick} is already on {channel}")]
    UserOnChannel { nick: String, channel: String },

    #[error("invite only: {0}")]
    InviteOnly(String),
}

impl ChannelError {
    /// Get a static error code string for metrics labeling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotOnChannel(_) => "not_on_channel",
            Self::ChanOpPrivsNeeded(_) => "chanop_privs_needed",
            Self::UserNotInChannel { .. } => "user_not_in_channel",
            Self::UserOnChannel { .. } => "user_on_channel",
            Self::InviteOnly(_) => "invite_only",
        }
    }

    /// Convert to an IRC error reply.
    pub fn to_irc_reply(&self, server_name: &str, nick: &str) -> Message {
        let nick = nick.to_string();
        let (response, params) = match self {
            Self::NotOnChannel(channel) => (
                Response::ERR_NOTONCHANNEL,
                vec![nick, channel.clone(), "You're not on that channel".to_string()],
            ),
            Self::ChanOpPrivsNeeded(channel) => (
                Response::ERR_CHANOPRIVSNEEDED,
                vec![nick, channel.clone(), "You're not channel operator".to_string()],
            ),
            Self::UserNotInChannel {
                nick: target,
                channel,
            } => (
                Response::ERR_USERNOTINCHANNEL,
                vec![
                    nick,
                    target.clone(),
                    channel.clone(),
                    "They aren't on that channel".to_string(),
                ],
            ),
            Self::UserOnChannel {
                nick: target,
                channel,
            } => (
                Response::ERR_USERONCHANNEL,
                vec![
                    nick,
                    target.clone(),
                    channel.clone(),
                    "is already on channel".to_string(),
                ],
            ),
            Self::InviteOnly(channel) => (
                Response::ERR_INVITEONLYCHAN,
                vec![nick, channel.clone(), "Cannot join channel (+i)".to_string()],
            ),
        };
        server_reply(server_name, response, params)
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;

// ============================================================================
// Apply Errors (replication boundary)
// ============================================================================

/// A log entry the replica could not apply. Nothing was changed.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("undecodable log entry: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unparseable line: {0}")]
    Parse(#[from] ProtocolError),

    #[error("unknown session {0}")]
    UnknownSession(i64),

    #[error("session {0} already exists")]
    DuplicateSession(i64),

    #[error("entry {got} does not follow {last}")]
    OutOfOrder { got: i64, last: i64 },

    #[error("output stream rejected batch: {0}")]
    Output(#[from] OutputError),
}

impl ApplyError {
    /// Get a static error code string for metrics labeling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode",
            Self::Parse(_) => "parse",
            Self::UnknownSession(_) => "unknown_session",
            Self::DuplicateSession(_) => "duplicate_session",
            Self::OutOfOrder { .. } => "out_of_order",
            Self::Output(_) => "output",
        }
    }
}
