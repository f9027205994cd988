//! Telemetry utilities for command timing and log correlation.

use std::time::Instant;

/// Guard for timing command execution and recording metrics.
///
/// Records command latency when dropped.
pub struct CommandTimer {
    command: String,
    start: Instant,
}

impl CommandTimer {
    /// Start timing a command.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for CommandTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        crate::metrics::record_command(&self.command, duration);
    }
}

/// Standardized span constructors.
pub mod spans {
    use crate::state::SessionId;
    use tracing::{Span, debug_span, info_span};

    /// Span for applying one log entry.
    pub fn apply(entry: i64, kind: &str) -> Span {
        info_span!("apply", entry = entry, kind = %kind)
    }

    /// Span for a command execution.
    pub fn command(name: &str, session: SessionId, target: Option<&str>) -> Span {
        if let Some(target) = target {
            debug_span!("command", name = %name, session = %session, target = %target)
        } else {
            debug_span!("command", name = %name, session = %session)
        }
    }
}
