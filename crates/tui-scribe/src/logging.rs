//! Opt-in file logging.
//!
//! The editor owns the terminal, so log output must never reach it. Logging
//! is disabled unless `SCRIBE_LOG_DIR` points at a directory; events then go
//! to a daily-rolling file through a non-blocking writer. `RUST_LOG` filters
//! as usual.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub use tracing_appender::non_blocking::WorkerGuard;

/// Initializes the tracing subscriber when `SCRIBE_LOG_DIR` is set.
///
/// The returned guard must be held for the process lifetime; dropping it
/// flushes and stops the writer thread.
pub fn init() -> Option<WorkerGuard> {
    let dir = std::env::var_os("SCRIBE_LOG_DIR")?;

    let appender = tracing_appender::rolling::daily(dir, "scribe.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();

    tracing::info!("logging initialized");
    Some(guard)
}
