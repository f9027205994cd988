//! Numeric reply codes.
//!
//! Only the numerics this server emits are listed. Each renders as its
//! zero-padded three-digit code, which is what goes on the wire as the verb.

#![allow(non_camel_case_types)]

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

macro_rules! responses {
    ($($(#[$doc:meta])* $name:ident = $code:expr,)+) => {
        /// IRC server numeric reply.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[repr(u16)]
        #[non_exhaustive]
        pub enum Response {
            $($(#[$doc])* $name = $code,)+
        }

        impl Response {
            /// Look up a numeric by code.
            pub fn from_code(code: u16) -> Option<Response> {
                match code {
                    $($code => Some(Response::$name),)+
                    _ => None,
                }
            }
        }
    };
}

responses! {
    /// 001
    RPL_WELCOME = 1,
    /// 002
    RPL_YOURHOST = 2,
    /// 003
    RPL_CREATED = 3,
    /// 004
    RPL_MYINFO = 4,
    /// 005
    RPL_ISUPPORT = 5,
    /// 301 - target is away
    RPL_AWAY = 301,
    /// 302
    RPL_USERHOST = 302,
    /// 303
    RPL_ISON = 303,
    /// 305 - no longer away
    RPL_UNAWAY = 305,
    /// 306 - now away
    RPL_NOWAWAY = 306,
    /// 307 - nick is registered
    RPL_WHOISREGNICK = 307,
    /// 311
    RPL_WHOISUSER = 311,
    /// 312
    RPL_WHOISSERVER = 312,
    /// 313
    RPL_WHOISOPERATOR = 313,
    /// 315
    RPL_ENDOFWHO = 315,
    /// 317
    RPL_WHOISIDLE = 317,
    /// 318
    RPL_ENDOFWHOIS = 318,
    /// 319
    RPL_WHOISCHANNELS = 319,
    /// 322
    RPL_LIST = 322,
    /// 323
    RPL_LISTEND = 323,
    /// 324
    RPL_CHANNELMODEIS = 324,
    /// 331
    RPL_NOTOPIC = 331,
    /// 332
    RPL_TOPIC = 332,
    /// 333
    RPL_TOPICWHOTIME = 333,
    /// 341
    RPL_INVITING = 341,
    /// 352
    RPL_WHOREPLY = 352,
    /// 353
    RPL_NAMREPLY = 353,
    /// 366
    RPL_ENDOFNAMES = 366,
    /// 368
    RPL_ENDOFBANLIST = 368,
    /// 372
    RPL_MOTD = 372,
    /// 375
    RPL_MOTDSTART = 375,
    /// 376
    RPL_ENDOFMOTD = 376,
    /// 381
    RPL_YOUREOPER = 381,
    /// 401
    ERR_NOSUCHNICK = 401,
    /// 403
    ERR_NOSUCHCHANNEL = 403,
    /// 404
    ERR_CANNOTSENDTOCHAN = 404,
    /// 409
    ERR_NOORIGIN = 409,
    /// 411
    ERR_NORECIPIENT = 411,
    /// 412
    ERR_NOTEXTTOSEND = 412,
    /// 431
    ERR_NONICKNAMEGIVEN = 431,
    /// 432
    ERR_ERRONEUSNICKNAME = 432,
    /// 433
    ERR_NICKNAMEINUSE = 433,
    /// 441
    ERR_USERNOTINCHANNEL = 441,
    /// 442
    ERR_NOTONCHANNEL = 442,
    /// 443
    ERR_USERONCHANNEL = 443,
    /// 451
    ERR_NOTREGISTERED = 451,
    /// 461
    ERR_NEEDMOREPARAMS = 461,
    /// 462
    ERR_ALREADYREGISTERED = 462,
    /// 464
    ERR_PASSWDMISMATCH = 464,
    /// 472
    ERR_UNKNOWNMODE = 472,
    /// 473
    ERR_INVITEONLYCHAN = 473,
    /// 480 - knock refused
    ERR_CANNOTKNOCK = 480,
    /// 481
    ERR_NOPRIVILEGES = 481,
    /// 482
    ERR_CHANOPRIVSNEEDED = 482,
    /// 501
    ERR_UMODEUNKNOWNFLAG = 501,
    /// 502
    ERR_USERSDONTMATCH = 502,
}

impl Response {
    /// The numeric code.
    #[inline]
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// 4xx and 5xx numerics.
    #[inline]
    pub fn is_error(&self) -> bool {
        (400..600).contains(&self.code())
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.code())
    }
}

/// A string that is not a known numeric.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown numeric {0:?}")]
pub struct ParseResponseError(
    /// The rejected input.
    pub String,
);

impl FromStr for Response {
    type Err = ParseResponseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u16>()
            .ok()
            .and_then(Response::from_code)
            .ok_or_else(|| ParseResponseError(s.to_owned()))
    }
}
