//! # slircd-replica
//!
//! A replicated IRC state machine. Every replica applies the same command
//! log in the same order and so holds the same sessions and channels and
//! produces the same output, message for message.
//!
//! - [`replica`]: log entries and the apply loop
//! - [`handlers`]: command dispatch and the per-verb handlers
//! - [`state`]: the session and channel directory
//! - [`output`]: the resumable output stream delivery front-ends follow
//! - [`verify`]: challenge tokens for gated logins and channels

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod output;
pub mod replica;
pub mod state;
pub mod telemetry;
pub mod verify;

pub use replica::{EntryKind, LogEntry, Replica};
