//! Logging infrastructure
//!
//! Structured logging setup for both development and production.

use tracing_subscriber::EnvFilter;

/// Initialize the logger with defaults (`RUST_LOG` respected, stdout only)
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger with an optional level override and file output.
///
/// When `log_dir` is set, logs roll daily into `jikoni-server.<date>`
/// files instead of stdout. The directory is created if missing.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.unwrap_or("info")));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir.and_then(prepare_log_dir) {
        let file_appender = tracing_appender::rolling::daily(dir, "jikoni-server");
        subscriber.with_writer(file_appender).init();
        return;
    }

    subscriber.init();
}

/// Ensure the log directory exists, creating it if needed. A directory
/// that cannot be created falls back to stdout with a warning on stderr,
/// since the subscriber is not installed yet at this point.
fn prepare_log_dir(dir: &str) -> Option<&str> {
    match std::fs::create_dir_all(dir) {
        Ok(()) => Some(dir),
        Err(err) => {
            eprintln!("log directory '{dir}' is unusable ({err}), logging to stdout");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_log_directory_is_created() {
        let dir = std::env::temp_dir().join("jikoni-logger-test").join("nested");
        let _ = std::fs::remove_dir_all(&dir);
        let dir_str = dir.to_str().unwrap();

        assert_eq!(prepare_log_dir(dir_str), Some(dir_str));
        assert!(dir.is_dir());

        let _ = std::fs::remove_dir_all(dir.parent().unwrap());
    }
}
