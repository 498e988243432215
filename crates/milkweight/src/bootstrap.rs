use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// `log_level` takes the CLI names (`DEBUG`, `INFO`, `WARNING`, `ERROR`).
/// Output goes to stderr so reports written to stdout stay clean.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(level_directive(log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let subscriber = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()?;

    Ok(())
}

/// Map a CLI level name to an `EnvFilter` directive; unknown names pass
/// through lowercased.
pub fn level_directive(log_level: &str) -> String {
    let lower = log_level.to_lowercase();
    match lower.as_str() {
        "debug" => "debug".to_string(),
        "info" => "info".to_string(),
        "warning" | "warn" => "warn".to_string(),
        "error" => "error".to_string(),
        _ => lower,
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
