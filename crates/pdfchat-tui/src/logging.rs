use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Where the daily log files go: `<cache_dir>/pdfchat/logs`, falling back to
/// `./logs` when the platform has no cache dir.
pub fn log_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|d| d.join("pdfchat").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Route tracing output to a daily rolling file. The terminal is in raw mode
/// while the UI runs, so nothing is written to stdout or stderr.
///
/// The returned guard flushes the writer on drop; keep it alive for the
/// whole process.
pub fn init(dir: PathBuf) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(&dir)?;
    let appender = tracing_appender::rolling::daily(&dir, "pdfchat.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()?;

    Ok(guard)
}
