//! Console and file logging
//!
//! Every run writes to its own directory, `<log root>/<unix timestamp>/`,
//! so logs from separate runs never interleave. `RUST_LOG` overrides the
//! level chosen on the command line.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const LOG_FILE_NAME: &str = "ucs-version.log";

/// Target of every event emitted by this crate
const CRATE_TARGET: &str = env!("CARGO_CRATE_NAME");

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Cannot create log directory {}: {source}", path.display())]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Global subscriber already set: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Keeps the non-blocking file writer alive; drop it only at shutdown
#[must_use = "Dropping this handle stops the background log writer."]
#[derive(Debug)]
pub struct LogHandle {
    _guard: Option<WorkerGuard>,
    dir: Option<PathBuf>,
}

impl LogHandle {
    /// Directory this run logs into, if file logging is enabled
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }
}

/// Returns the per-run log directory under `root`
pub fn run_log_dir(root: &Path, timestamp: i64) -> PathBuf {
    root.join(timestamp.to_string())
}

/// Filter used when `RUST_LOG` is unset
///
/// Dependencies stay at `info` at most; only this crate goes more verbose.
fn default_directives(level: LevelFilter) -> String {
    format!("{},{}={}", level.min(LevelFilter::INFO), CRATE_TARGET, level)
}

/// Installs the global subscriber
///
/// `log_root` of `None` disables file logging.
pub fn init(level: LevelFilter, log_root: Option<&Path>) -> Result<LogHandle, LoggingError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    let mut layers = vec![
        layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed(),
    ];

    let (guard, dir) = match log_root {
        Some(root) => {
            let dir = run_log_dir(root, chrono::Utc::now().timestamp());
            fs::create_dir_all(&dir).map_err(|source| LoggingError::Directory {
                path: dir.clone(),
                source,
            })?;

            let appender = tracing_appender::rolling::never(&dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            layers.push(layer().with_writer(writer).with_ansi(false).boxed());

            (Some(guard), Some(dir))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()?;

    Ok(LogHandle { _guard: guard, dir })
}
