//! File logging.
//!
//! The terminal belongs to the TUI, so records only go to
//! `~/.local/state/alternate/alternate.log`. `ALTERNATE_LOG` takes an
//! `EnvFilter` directive and overrides the default level.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::app_dirs::AppDirs;

pub const LOG_ENV: &str = "ALTERNATE_LOG";
pub const LOG_FILE: &str = "alternate.log";

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "alternate=debug"
    } else {
        "alternate=info"
    }
}

pub fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Install the global subscriber.
///
/// The returned guard flushes buffered records when dropped and must be held
/// until exit. Returns `None` and leaves logging disabled when the log
/// directory cannot be created.
pub fn init(verbose: bool) -> Option<WorkerGuard> {
    let log_dir = AppDirs::log_dir()?;
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Failed to create log directory {:?}: {}", log_dir, e);
        return None;
    }

    let appender = tracing_appender::rolling::never(&log_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    if tracing_subscriber::registry()
        .with(filter(verbose))
        .with(file_layer)
        .try_init()
        .is_err()
    {
        return None;
    }

    tracing::info!(dir = %log_dir.display(), "logging initialized");
    Some(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_follows_verbosity() {
        assert_eq!(default_directive(false), "alternate=info");
        assert_eq!(default_directive(true), "alternate=debug");
    }

    #[test]
    fn test_filter_builds_without_env() {
        if std::env::var(LOG_ENV).is_err() {
            assert_eq!(filter(true).to_string(), "alternate=debug");
        }
    }
}
