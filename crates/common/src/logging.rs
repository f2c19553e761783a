//! Tracing setup for dispatch sessions.
//!
//! Dispatch emits structured events (backend selected, binding fired,
//! profile reloaded) through `tracing`. By default they go to the
//! terminal; an accessibility session that runs headless under a
//! supervisor sets `LoggingConfig.file` to append them to a log file
//! instead, where ANSI colors are disabled.

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use crate::config::LoggingConfig;

/// Initialize the global tracing subscriber from the config. The
/// `RUST_LOG` environment variable overrides the configured level.
pub fn init_logging(config: &LoggingConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let log_file = config.file.as_deref().and_then(|path| match open_log_file(path) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!(
                "facepilot: cannot open log file {}: {e}; logging to terminal",
                path.display()
            );
            None
        }
    });

    match (log_file, config.json) {
        (Some(file), true) => {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(env_filter)
                .json()
                .with_writer(Mutex::new(file))
                .finish();
            tracing::subscriber::set_global_default(subscriber).ok();
        }
        (Some(file), false) => {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(env_filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .finish();
            tracing::subscriber::set_global_default(subscriber).ok();
        }
        (None, true) => {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(env_filter)
                .json()
                .finish();
            tracing::subscriber::set_global_default(subscriber).ok();
        }
        (None, false) => {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(env_filter)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber).ok();
        }
    }
}

/// Initialize logging with defaults (useful for tests and quick scripts).
pub fn init_default_logging() {
    init_logging(&LoggingConfig::default());
}

/// Open the session log for appending, creating parent directories so
/// a configured path like `~/.local/state/facepilot/session.log` works
/// on first run. Appending keeps earlier sessions readable.
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_parent_directories_are_created() {
        let dir = std::env::temp_dir().join(format!("facepilot-log-test-{}", std::process::id()));
        let path = dir.join("nested").join("session.log");

        let file = open_log_file(&path).unwrap();
        drop(file);
        assert!(path.exists());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn repeated_init_is_harmless() {
        let config = LoggingConfig::default();
        init_logging(&config);
        init_logging(&config);
        tracing::info!("still alive");
    }

    #[test]
    fn file_logging_init_accepts_a_writable_path() {
        let dir = std::env::temp_dir().join(format!("facepilot-log-init-{}", std::process::id()));
        let config = LoggingConfig {
            level: "debug".to_string(),
            json: false,
            file: Some(dir.join("session.log")),
        };

        init_logging(&config);
        assert!(dir.join("session.log").exists());

        std::fs::remove_dir_all(&dir).ok();
    }
}
