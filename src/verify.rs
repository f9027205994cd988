//! Challenge verification for gated logins and `+x` channels.
//!
//! The state machine only needs two things from a verifier: a URL to send a
//! user to, and a yes/no on the proof they come back with. [`HmacVerifier`]
//! implements both with tokens signed by a key shared with the challenge
//! site, so checking a proof needs no network round trip and gives the same
//! answer on every replica.
//!
//! Token layout (both halves URL-safe base64 without padding):
//!
//! ```text
//! <purpose>.<HMAC-SHA256(key, domain ":" connection ":" purpose)>
//! ```
//!
//! The challenge URL carries a token in the `challenge` domain; the site
//! hands back a proof for the same purpose in the `solved` domain.

use crate::config::CaptchaConfig;
use crate::state::SessionId;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeDelta, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use slirc_proto::irc_eq;
use std::fmt;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

const CHALLENGE_DOMAIN: &str = "challenge";
const SOLVED_DOMAIN: &str = "solved";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("no proof supplied")]
    Missing,
    #[error("malformed proof")]
    Malformed,
    #[error("bad signature")]
    BadSignature,
    #[error("proof is for a different purpose")]
    WrongPurpose,
    #[error("proof expired")]
    Expired,
}

/// What a challenge unlocks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PurposeKind {
    Login,
    /// Joining the named channel.
    Join(String),
}

/// A challenge purpose, stamped with the replicated time it was issued.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Purpose {
    pub kind: PurposeKind,
    pub issued: DateTime<Utc>,
}

impl Purpose {
    pub fn login(issued: DateTime<Utc>) -> Self {
        Self {
            kind: PurposeKind::Login,
            issued,
        }
    }

    pub fn join(channel: &str, issued: DateTime<Utc>) -> Self {
        Self {
            kind: PurposeKind::Join(channel.to_owned()),
            issued,
        }
    }

    fn parse(s: &str) -> Option<Self> {
        let mut parts = s.splitn(3, ':');
        let kind = parts.next()?;
        let nanos: i64 = parts.next()?.parse().ok()?;
        let rest = parts.next()?;
        let kind = match kind {
            "login" => PurposeKind::Login,
            "join" if !rest.is_empty() => PurposeKind::Join(rest.to_owned()),
            _ => return None,
        };
        Some(Self {
            kind,
            issued: DateTime::from_timestamp_nanos(nanos),
        })
    }

    fn same_kind(&self, other: &Purpose) -> bool {
        match (&self.kind, &other.kind) {
            (PurposeKind::Login, PurposeKind::Login) => true,
            (PurposeKind::Join(a), PurposeKind::Join(b)) => irc_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nanos = self.issued.timestamp_nanos_opt().unwrap_or_default();
        match &self.kind {
            PurposeKind::Login => write!(f, "login:{nanos}:"),
            PurposeKind::Join(channel) => write!(f, "join:{nanos}:{channel}"),
        }
    }
}

/// The external verification collaborator.
pub trait Verifier: Send + Sync {
    /// Check `proof` for `expected`, as of the replicated time `now`.
    fn verify(
        &self,
        session: SessionId,
        proof: &str,
        expected: &Purpose,
        now: DateTime<Utc>,
    ) -> Result<(), VerifyError>;

    /// Where `session` goes to obtain a proof for `purpose`.
    fn challenge_url(&self, session: SessionId, purpose: &Purpose) -> String;
}

/// HMAC-signed tokens shared with a challenge site.
pub struct HmacVerifier {
    url: String,
    mac: HmacSha256,
    validity: TimeDelta,
}

impl HmacVerifier {
    pub fn new(url: impl Into<String>, secret: &[u8], validity: TimeDelta) -> Self {
        Self {
            url: url.into(),
            mac: HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size"),
            validity,
        }
    }

    pub fn from_config(config: &CaptchaConfig) -> Self {
        let validity = i64::try_from(config.validity_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX);
        Self::new(&config.url, config.hmac_secret.as_bytes(), validity)
    }

    fn sign(&self, domain: &str, session: SessionId, purpose: &str) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(domain.as_bytes());
        mac.update(b":");
        mac.update(session.primary.to_string().as_bytes());
        mac.update(b":");
        mac.update(purpose.as_bytes());
        mac
    }

    fn token(&self, domain: &str, session: SessionId, purpose: &str) -> String {
        let tag = self.sign(domain, session, purpose).finalize().into_bytes();
        format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(purpose),
            URL_SAFE_NO_PAD.encode(tag)
        )
    }

    /// The proof the challenge site issues once `purpose` is solved.
    pub fn solve(&self, session: SessionId, purpose: &Purpose) -> String {
        self.token(SOLVED_DOMAIN, session, &purpose.to_string())
    }
}

impl Verifier for HmacVerifier {
    fn verify(
        &self,
        session: SessionId,
        proof: &str,
        expected: &Purpose,
        now: DateTime<Utc>,
    ) -> Result<(), VerifyError> {
        if proof.is_empty() {
            return Err(VerifyError::Missing);
        }
        let (purpose_b64, tag_b64) = proof.split_once('.').ok_or(VerifyError::Malformed)?;
        let purpose_bytes = URL_SAFE_NO_PAD
            .decode(purpose_b64)
            .map_err(|_| VerifyError::Malformed)?;
        let tag = URL_SAFE_NO_PAD
            .decode(tag_b64)
            .map_err(|_| VerifyError::Malformed)?;
        let purpose_str = String::from_utf8(purpose_bytes).map_err(|_| VerifyError::Malformed)?;

        self.sign(SOLVED_DOMAIN, session, &purpose_str)
            .verify_slice(&tag)
            .map_err(|_| VerifyError::BadSignature)?;

        let purpose = Purpose::parse(&purpose_str).ok_or(VerifyError::Malformed)?;
        if !purpose.same_kind(expected) {
            return Err(VerifyError::WrongPurpose);
        }
        if purpose.issued > now || now - purpose.issued > self.validity {
            return Err(VerifyError::Expired);
        }
        Ok(())
    }

    fn challenge_url(&self, session: SessionId, purpose: &Purpose) -> String {
        format!(
            "{}#{}",
            self.url,
            self.token(CHALLENGE_DOMAIN, session, &purpose.to_string())
        )
    }
}
