//! Operator, services-link and challenge configuration.

use serde::Deserialize;
use subtle::ConstantTimeEq;

/// Operator block configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct OperBlock {
    /// Operator name (used in OPER command).
    pub name: String,
    /// Password, plaintext or a bcrypt hash.
    pub password: String,
}

impl OperBlock {
    /// Verify the provided password against the stored password.
    /// Supports both bcrypt hashed passwords and plaintext (for backward compatibility).
    pub fn verify_password(&self, password: &str) -> bool {
        if self.password.starts_with("$2") {
            bcrypt::verify(password, &self.password).unwrap_or(false)
        } else {
            bool::from(self.password.as_bytes().ct_eq(password.as_bytes()))
        }
    }
}

/// A password a services link may present as `PASS services=<password>`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServicesBlock {
    pub password: String,
}

impl ServicesBlock {
    pub fn verify_password(&self, password: &str) -> bool {
        !self.password.is_empty() && bool::from(self.password.as_bytes().ct_eq(password.as_bytes()))
    }
}

/// Challenge ("captcha") verification.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptchaConfig {
    /// Where users solve challenges; the signed token is appended.
    pub url: String,
    /// Key shared with the challenge site.
    pub hmac_secret: String,
    /// Require a solved challenge before login.
    #[serde(default)]
    pub required_for_login: bool,
    /// How long a solved challenge stays valid (default: 600).
    #[serde(default = "default_validity_secs")]
    pub validity_secs: u64,
}

fn default_validity_secs() -> u64 {
    600
}
