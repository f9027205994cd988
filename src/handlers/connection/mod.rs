//! Connection and registration handlers.
//!
//! Handles PING, PASS, NICK, USER, QUIT and MOTD, plus the login sequence
//! that runs once a session has both a nickname and a username.

mod nick;
mod pass;
mod ping;
mod quit;
mod user;
mod welcome;

pub use nick::NickHandler;
pub use pass::{PassHandler, extract_credential};
pub use ping::PingHandler;
pub use quit::{QuitHandler, broadcast_quit, closing_link, remove_session};
pub use user::UserHandler;
pub use welcome::{MotdHandler, maybe_login, send_motd, services_nick_line};
