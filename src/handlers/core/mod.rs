//! Core handler infrastructure.
//!
//! This module contains the fundamental types for the command handler
//! system: the handler registry, the context passed to every handler, and
//! the outbox that collects what a command produces and for whom.

pub mod context;
pub mod outbox;
pub mod registry;

// Re-export commonly used types
pub use context::{Context, Handler};
pub use outbox::{Audience, Outbox};
pub use registry::Registry;
