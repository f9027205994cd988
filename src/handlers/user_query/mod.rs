//! User query handlers: WHO, WHOIS, USERHOST and ISON.

mod ison;
mod userhost;
mod who;
mod whois;

pub use ison::IsonHandler;
pub use userhost::UserhostHandler;
pub use who::WhoHandler;
pub use whois::WhoisHandler;
