//! Structured logging for three-play using the tracing crate.
//!
//! Configures a rolling file logger that writes to daily-rotated log files.
//! Follows the XDG Base Directory Specification for log file placement.
//! Nothing is written to the terminal, so stdout stays clean JSON.
//! Automatically cleans up old log files, keeping only the 7 most recent days.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing_appender::rolling;
use tracing_subscriber::prelude::*;

/// Prefix of the daily log files, e.g. `three-play.log.2024-05-01`.
pub const LOG_FILE_PREFIX: &str = "three-play.log";

/// Level used when neither `RUST_LOG` nor `3PLAY_LOG_LEVEL` is set.
const DEFAULT_LOG_LEVEL: &str = "warn";

const LOG_LEVEL_ENV: &str = "3PLAY_LOG_LEVEL";

/// Global non-blocking guard holder to keep the appender alive for the program lifetime.
static APPENDER_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// Initializes the logging system with file-based output.
///
/// The filter comes from `RUST_LOG`, then `3PLAY_LOG_LEVEL`, then `warn`.
///
/// # Errors
/// - If the log directory cannot be determined or created
/// - If logging was already initialized
pub fn init_logging() -> Result<(), anyhow::Error> {
    let log_dir = get_log_dir()?;
    fs::create_dir_all(&log_dir)?;

    if let Err(e) = cleanup_old_logs(&log_dir) {
        eprintln!("Warning: Failed to cleanup old logs: {e}");
    }

    let file_appender = rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    APPENDER_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Logging already initialized"))?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = std::env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
        tracing_subscriber::EnvFilter::try_new(level_directive(&level))
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_LEVEL))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_level(true)
                .with_ansi(false),
        )
        .init();

    tracing::debug!("Logging initialized. Log dir: {}", log_dir.display());
    Ok(())
}

/// Accepts Python-style level names (`WARNING`, `CRITICAL`) as well as tracing's.
fn level_directive(level: &str) -> String {
    match level.trim().to_lowercase().as_str() {
        "" => DEFAULT_LOG_LEVEL.to_string(),
        "warning" => "warn".to_string(),
        "critical" | "fatal" => "error".to_string(),
        other => other.to_string(),
    }
}

/// Log directory: `$XDG_STATE_HOME/three-play`, or `~/.local/state/three-play`.
///
/// # Errors
/// - If the home directory cannot be determined
pub fn get_log_dir() -> Result<PathBuf, anyhow::Error> {
    if let Ok(xdg_state) = std::env::var("XDG_STATE_HOME") {
        if !xdg_state.is_empty() {
            return Ok(PathBuf::from(xdg_state).join("three-play"));
        }
    }
    let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    Ok(home.join(".local/state/three-play"))
}

/// Whether a file name is one of our dated log files.
pub fn is_log_file(file_name: &str) -> bool {
    file_name
        .strip_prefix(LOG_FILE_PREFIX)
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|date| date.matches('-').count() == 2)
}

/// Removes all but the 7 most recently modified log files.
fn cleanup_old_logs(log_dir: &Path) -> Result<(), anyhow::Error> {
    const MAX_LOG_FILES: usize = 7;

    let mut log_files: Vec<_> = fs::read_dir(log_dir)?
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            let file_name = path.file_name()?.to_string_lossy().to_string();
            if !is_log_file(&file_name) {
                return None;
            }
            let modified = fs::metadata(&path).ok()?.modified().ok()?;
            Some((path, modified))
        })
        .collect();

    // Newest first
    log_files.sort_by(|a, b| b.1.cmp(&a.1));

    for (path, _) in log_files.iter().skip(MAX_LOG_FILES) {
        if let Err(e) = fs::remove_file(path) {
            tracing::warn!("Failed to delete old log file {}: {}", path.display(), e);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_directive() {
        assert_eq!(level_directive("WARNING"), "warn");
        assert_eq!(level_directive("Critical"), "error");
        assert_eq!(level_directive("DEBUG"), "debug");
        assert_eq!(level_directive(" "), "warn");
    }

    #[test]
    fn test_is_log_file() {
        assert!(is_log_file("three-play.log.2024-05-01"));
        assert!(!is_log_file("three-play.log"));
        assert!(!is_log_file("other.log.2024-05-01"));
        assert!(!is_log_file("three-play.toml"));
    }

    #[test]
    fn test_cleanup_keeps_newest() {
        let dir = tempfile::tempdir().unwrap();
        for day in 1..=9 {
            let path = dir.path().join(format!("{LOG_FILE_PREFIX}.2024-05-0{day}"));
            fs::write(&path, "line\n").unwrap();
            let mtime = std::time::SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_700_000_000 + day * 60);
            fs::File::options()
                .write(true)
                .open(&path)
                .unwrap()
                .set_modified(mtime)
                .unwrap();
        }
        fs::write(dir.path().join("notes.txt"), "keep").unwrap();

        cleanup_old_logs(dir.path()).unwrap();

        let mut remaining: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        remaining.sort();
        assert_eq!(remaining.len(), 8);
        assert!(remaining.contains(&"notes.txt".to_string()));
        assert!(!remaining.contains(&format!("{LOG_FILE_PREFIX}.2024-05-01")));
        assert!(!remaining.contains(&format!("{LOG_FILE_PREFIX}.2024-05-02")));
    }
}
