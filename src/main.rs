//! slircd-replay - apply a command log to a fresh replica.
//!
//! Reads one JSON [`LogEntry`](slircd_replica::LogEntry) per line from a
//! file (or stdin), applies them in order and prints every output message
//! as a delivery front-end would see it:
//!
//! ```text
//! slircd-replay [--metrics] [config.toml] [log.jsonl]
//! ```

use slircd_replica::config::{self, Config};
use slircd_replica::output::OutputStream;
use slircd_replica::state::CompositeId;
use slircd_replica::{Replica, metrics};
use std::io::{BufRead, BufReader};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mut with_metrics = false;
    let mut positional = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--metrics" {
            with_metrics = true;
        } else {
            positional.push(arg);
        }
    }
    let config_path = positional
        .first()
        .cloned()
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;
    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("{} configuration error(s) in {config_path}", errors.len());
    }
    if with_metrics {
        metrics::init();
    }

    info!(
        server = %config.server.name,
        network = %config.server.network,
        retained = config.output.retained_batches,
        "Starting replay"
    );

    let mut replica = Replica::new(Arc::new(config));
    let stream = replica.stream();
    let progress = Arc::new(AtomicI64::new(0));
    let cancel = CancellationToken::new();
    let printer = tokio::spawn(print_stream(
        Arc::clone(&stream),
        Arc::clone(&progress),
        cancel.clone(),
    ));

    let input: Box<dyn BufRead> = match positional.get(1) {
        Some(path) => Box::new(BufReader::new(std::fs::File::open(path)?)),
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    let mut applied = 0usize;
    let mut rejected = 0usize;
    for (lineno, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match replica.apply_json(&line) {
            Ok(_) => applied += 1,
            Err(e) => {
                rejected += 1;
                warn!(line = lineno + 1, error = %e, "Skipping entry");
            }
        }
    }

    let target = stream.last_seen().primary;
    while progress.load(Ordering::Acquire) < target {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    cancel.cancel();
    printer.await?;

    info!(
        applied,
        rejected,
        sessions = replica.directory().session_count(),
        channels = replica.directory().channel_count(),
        "Replay finished"
    );
    if with_metrics {
        print!("{}", metrics::gather_metrics());
    }
    Ok(())
}

/// Follow the stream until cancelled, one line per message:
/// `<id> <recipients> <message>`.
async fn print_stream(stream: Arc<OutputStream>, progress: Arc<AtomicI64>, cancel: CancellationToken) {
    let mut last_seen = CompositeId::ZERO;
    while let Ok(batch) = stream.get_next(last_seen, &cancel).await {
        for msg in batch.iter() {
            let recipients: Vec<String> = msg.interested.iter().map(i64::to_string).collect();
            println!("{} [{}] {}", msg.id, recipients.join(","), msg.message);
            last_seen = msg.id;
        }
        progress.store(last_seen.primary, Ordering::Release);
    }
}
