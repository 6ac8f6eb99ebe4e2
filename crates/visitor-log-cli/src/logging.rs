use std::env;
use std::path::Path;
use tracing::{info, Subscriber};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Stdout follows `TRACING_LEVEL` (default `info`). The log file keeps the
/// core crate at `debug` by default (`FILE_TRACING_LEVEL`) so skipped rows
/// and insert conflicts of every run stay on record. Files rotate daily
/// under `LOG_DIR` (default `./logs`).
///
/// Buffered lines are written out when the returned guard is dropped.
pub fn init_logger() -> WorkerGuard {
    let stdout_filter = env::var("TRACING_LEVEL").unwrap_or_else(|_| "info".to_string());
    let file_filter = env::var("FILE_TRACING_LEVEL")
        .unwrap_or_else(|_| "info,visitor_log_core=debug".to_string());
    let log_dir = env::var("LOG_DIR").unwrap_or_else(|_| "./logs".to_string());

    let (writer, guard) = file_writer(log_dir);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .pretty()
                .with_file(false)
                .without_time()
                .with_ansi(true)
                .with_filter(EnvFilter::new(stdout_filter)),
        )
        .with(file_layer(writer, &file_filter))
        .init();

    info!("Tracing is configured for stdout and file logging.");

    guard
}

fn file_writer<P: AsRef<Path>>(log_dir: P) -> (NonBlocking, WorkerGuard) {
    let file_appender = tracing_appender::rolling::daily(log_dir, "visitors.log");
    tracing_appender::non_blocking(file_appender)
}

fn file_layer<S>(writer: NonBlocking, filter: &str) -> impl Layer<S> + Send + Sync + 'static
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(EnvFilter::new(filter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;
    use tracing::error;

    fn read_logs(dir: &Path) -> String {
        fs::read_dir(dir)
            .unwrap()
            .map(|entry| fs::read_to_string(entry.unwrap().path()).unwrap())
            .collect()
    }

    #[test]
    fn test_error_reaches_file_once_guard_drops() {
        let dir = tempdir().unwrap();
        let (writer, guard) = file_writer(dir.path());
        let subscriber = tracing_subscriber::registry().with(file_layer(writer, "info"));

        tracing::subscriber::with_default(subscriber, || {
            error!("Error: importing bad.csv: Row at line 2");
        });
        drop(guard);

        let logged = read_logs(dir.path());
        assert!(logged.contains("Error: importing bad.csv: Row at line 2"));
    }

    #[test]
    fn test_file_filter_drops_lower_levels() {
        let dir = tempdir().unwrap();
        let (writer, guard) = file_writer(dir.path());
        let subscriber = tracing_subscriber::registry().with(file_layer(writer, "warn"));

        tracing::subscriber::with_default(subscriber, || {
            info!("Columns: nombre_visita");
            error!("Error: statistics recompute failed");
        });
        drop(guard);

        let logged = read_logs(dir.path());
        assert!(!logged.contains("Columns"));
        assert!(logged.contains("statistics recompute failed"));
    }
}
