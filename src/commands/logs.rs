//! Display recent log entries from the application.

use anyhow::anyhow;
use console::style;
use std::fs;
use std::path::{Path, PathBuf};

use crate::logging::{get_log_dir, LOG_FILE_PREFIX};

const DEFAULT_LINES: usize = 50;

/// Shows the last 50 lines of the most recent log file.
///
/// # Errors
/// - If the log directory cannot be determined
/// - If log files cannot be read
pub fn handle_logs() -> Result<(), anyhow::Error> {
    let log_dir = get_log_dir()?;

    if !log_dir.exists() {
        println!("Log directory does not exist yet: {}", log_dir.display());
        println!("Logs will be created when the application runs.");
        return Ok(());
    }

    let Some(log_file) = find_latest_log(&log_dir)? else {
        println!("No log files found in: {}", log_dir.display());
        println!("Run any three-play command to generate logs.");
        return Ok(());
    };

    let content = fs::read_to_string(&log_file).map_err(|e| anyhow!("Failed to read log file: {e}"))?;

    if content.is_empty() {
        println!("Log file is empty: {}", log_file.display());
        return Ok(());
    }

    let lines: Vec<&str> = content.lines().collect();
    let start_index = lines.len().saturating_sub(DEFAULT_LINES);

    if start_index > 0 {
        println!("Showing last {} of {} lines:", DEFAULT_LINES, lines.len());
    } else {
        println!("Showing all {} lines:", lines.len());
    }
    println!("Full log file at: {}", style(log_file.display()).dim());
    println!();

    for line in &lines[start_index..] {
        println!("{line}");
    }

    Ok(())
}

/// Finds the most recently modified log file in the directory.
fn find_latest_log(log_dir: &Path) -> Result<Option<PathBuf>, anyhow::Error> {
    let entries = fs::read_dir(log_dir).map_err(|e| anyhow!("Failed to read log directory: {e}"))?;

    let mut latest: Option<(PathBuf, std::time::SystemTime)> = None;

    for entry in entries {
        let path = entry.map_err(|e| anyhow!("Failed to read directory entry: {e}"))?.path();

        if !path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(LOG_FILE_PREFIX))
        {
            continue;
        }

        let Ok(modified) = fs::metadata(&path).and_then(|m| m.modified()) else {
            continue;
        };
        if latest.as_ref().map_or(true, |(_, newest)| modified > *newest) {
            latest = Some((path, modified));
        }
    }

    Ok(latest.map(|(path, _)| path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_latest_log() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_latest_log(dir.path()).unwrap().is_none());

        let old = dir.path().join(format!("{LOG_FILE_PREFIX}.2024-05-01"));
        let new = dir.path().join(format!("{LOG_FILE_PREFIX}.2024-05-02"));
        fs::write(&old, "old\n").unwrap();
        fs::write(&new, "new\n").unwrap();
        fs::write(dir.path().join("other.txt"), "ignored\n").unwrap();

        let base = std::time::SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_700_000_000);
        fs::File::options().write(true).open(&old).unwrap().set_modified(base).unwrap();
        fs::File::options()
            .write(true)
            .open(&new)
            .unwrap()
            .set_modified(base + std::time::Duration::from_secs(60))
            .unwrap();

        assert_eq!(find_latest_log(dir.path()).unwrap(), Some(new));
    }
}
