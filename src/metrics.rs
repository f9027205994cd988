//! Prometheus metrics collection for slircd-replica.
//!
//! Every recording function is a no-op until [`init`] has run, so the apply
//! path can record unconditionally and tests need not set anything up.
//!
//! - `irc_command_total{command}` - Commands applied by verb
//! - `irc_command_duration_seconds{command}` - Apply latency per verb
//! - `irc_command_errors_total{command,error}` - Error replies by kind
//! - `irc_output_fanout` - Recipients per output message

use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

// ========================================================================
// Counters
// ========================================================================

/// Log entries applied.
pub static ENTRIES_APPLIED: OnceLock<IntCounter> = OnceLock::new();

/// Log entries rejected at the replication boundary, by reason.
pub static APPLY_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

/// Sessions created.
pub static SESSIONS_CREATED: OnceLock<IntCounter> = OnceLock::new();

/// Sessions deleted (QUIT, KILL, link loss, DeleteSession).
pub static SESSIONS_DELETED: OnceLock<IntCounter> = OnceLock::new();

/// Sessions completing login.
pub static LOGINS: OnceLock<IntCounter> = OnceLock::new();

/// Challenges handed out, by purpose (`login`, `join`).
pub static CHALLENGES_ISSUED: OnceLock<IntCounterVec> = OnceLock::new();

/// Commands processed by verb.
pub static COMMAND_COUNTER: OnceLock<IntCounterVec> = OnceLock::new();

/// Command errors by verb and error kind.
pub static COMMAND_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

/// Channel mode changes applied, by letter.
pub static CHANNEL_MODE_CHANGES: OnceLock<IntCounterVec> = OnceLock::new();

// ========================================================================
// Gauges
// ========================================================================

/// Live sessions, services links and subsessions included.
pub static LIVE_SESSIONS: OnceLock<IntGauge> = OnceLock::new();

/// Live channels.
pub static LIVE_CHANNELS: OnceLock<IntGauge> = OnceLock::new();

/// Batches retained in the output stream.
pub static RETAINED_BATCHES: OnceLock<IntGauge> = OnceLock::new();

// ========================================================================
// Histograms
// ========================================================================

/// Apply latency by verb.
pub static COMMAND_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Recipients per output message.
pub static OUTPUT_FANOUT: OnceLock<Histogram> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Call once at startup. Later calls keep the first set of metrics.
pub fn init() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            if $metric.get().is_none() {
                let m = $init.expect(concat!(stringify!($metric), " creation failed"));
                if let Err(e) = r.register(Box::new(m.clone())) {
                    tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
                }
                let _ = $metric.set(m);
            }
        };
    }

    register!(ENTRIES_APPLIED, IntCounter::new("slircd_entries_applied_total", "Log entries applied"));
    register!(APPLY_ERRORS, IntCounterVec::new(Opts::new("slircd_apply_errors_total", "Log entries rejected"), &["error"]));
    register!(SESSIONS_CREATED, IntCounter::new("irc_sessions_created_total", "Sessions created"));
    register!(SESSIONS_DELETED, IntCounter::new("irc_sessions_deleted_total", "Sessions deleted"));
    register!(LOGINS, IntCounter::new("irc_logins_total", "Sessions completing login"));
    register!(CHALLENGES_ISSUED, IntCounterVec::new(Opts::new("irc_challenges_issued_total", "Verification challenges handed out"), &["purpose"]));
    register!(COMMAND_COUNTER, IntCounterVec::new(Opts::new("irc_command_total", "IRC commands processed by type"), &["command"]));
    register!(COMMAND_ERRORS, IntCounterVec::new(Opts::new("irc_command_errors_total", "IRC command errors by type"), &["command", "error"]));
    register!(CHANNEL_MODE_CHANGES, IntCounterVec::new(Opts::new("irc_channel_mode_changes_total", "Channel mode changes"), &["mode"]));
    register!(LIVE_SESSIONS, IntGauge::new("irc_live_sessions", "Live sessions"));
    register!(LIVE_CHANNELS, IntGauge::new("irc_live_channels", "Live channels"));
    register!(RETAINED_BATCHES, IntGauge::new("slircd_output_retained_batches", "Batches retained in the output stream"));
    register!(COMMAND_LATENCY, HistogramVec::new(
        HistogramOpts::new("irc_command_duration_seconds", "IRC command latency by type")
            .buckets(vec![0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05]),
        &["command"]));
    register!(OUTPUT_FANOUT, Histogram::with_opts(
        HistogramOpts::new("irc_output_fanout", "Recipients per output message")
            .buckets(vec![1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 1000.0])));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

// ============================================================================
// Recording helpers
// ============================================================================

#[inline]
fn inc(metric: &OnceLock<IntCounter>) {
    if let Some(c) = metric.get() {
        c.inc();
    }
}

#[inline]
fn inc_label(metric: &OnceLock<IntCounterVec>, labels: &[&str]) {
    if let Some(c) = metric.get() {
        c.with_label_values(labels).inc();
    }
}

#[inline]
fn set_gauge(metric: &OnceLock<IntGauge>, value: usize) {
    if let Some(g) = metric.get() {
        g.set(i64::try_from(value).unwrap_or(i64::MAX));
    }
}

/// Record a command execution with latency.
#[inline]
pub fn record_command(command: &str, duration_secs: f64) {
    inc_label(&COMMAND_COUNTER, &[command]);
    if let Some(h) = COMMAND_LATENCY.get() {
        h.with_label_values(&[command]).observe(duration_secs);
    }
}

/// Record a command error.
#[inline]
pub fn record_command_error(command: &str, error: &str) {
    inc_label(&COMMAND_ERRORS, &[command, error]);
}

#[inline]
pub fn record_entry_applied() {
    inc(&ENTRIES_APPLIED);
}

#[inline]
pub fn record_apply_error(error: &str) {
    inc_label(&APPLY_ERRORS, &[error]);
}

#[inline]
pub fn record_session_created() {
    inc(&SESSIONS_CREATED);
}

#[inline]
pub fn record_session_deleted() {
    inc(&SESSIONS_DELETED);
}

#[inline]
pub fn record_login() {
    inc(&LOGINS);
}

/// Record a challenge handed to a session (`login` or `join`).
#[inline]
pub fn record_challenge(purpose: &str) {
    inc_label(&CHALLENGES_ISSUED, &[purpose]);
}

/// Record a channel mode change.
#[inline]
pub fn record_mode_change(mode: char) {
    inc_label(&CHANNEL_MODE_CHANGES, &[&mode.to_string()]);
}

/// Record how many connections one output message goes to.
#[inline]
pub fn record_fanout(recipients: usize) {
    if let Some(h) = OUTPUT_FANOUT.get() {
        h.observe(recipients as f64);
    }
}

/// Update the directory and stream size gauges.
pub fn set_sizes(sessions: usize, channels: usize, retained_batches: usize) {
    set_gauge(&LIVE_SESSIONS, sessions);
    set_gauge(&LIVE_CHANNELS, channels);
    set_gauge(&RETAINED_BATCHES, retained_batches);
}
