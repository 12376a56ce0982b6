//! Configuration file editor command.
//!
//! Opens the three-play configuration file in the user's preferred editor.

use std::path::Path;
use std::process::Command;

use three_play::config::{get_config_path, FileConfig};

/// Opens the configuration file in the user's preferred editor.
///
/// Writes a commented template first when the file does not exist, and
/// checks that the edited file still parses.
///
/// Tries editors in this order:
/// 1. $EDITOR environment variable
/// 2. nano
/// 3. vi
///
/// # Errors
/// - If the home directory cannot be determined
/// - If no editor can be found or executed
/// - If the edited file is not valid TOML
pub fn handle_config() -> anyhow::Result<()> {
    let config_path = get_config_path().ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    ensure_config_file(&config_path)?;

    tracing::info!("Opening config file: {}", config_path.display());

    let editor = find_editor()?;
    tracing::debug!("Using editor: {}", editor);

    let status = Command::new(&editor)
        .arg(&config_path)
        .status()
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to open editor '{editor}': {e}. Make sure the editor is installed and accessible."
            )
        })?;

    if !status.success() {
        return Err(anyhow::anyhow!(
            "Editor exited with error code: {}",
            status.code().unwrap_or(-1)
        ));
    }

    FileConfig::load_from(&config_path)?;
    tracing::info!("Config file edited successfully");
    Ok(())
}

/// Creates the config directory and a template file if missing.
fn ensure_config_file(config_path: &Path) -> anyhow::Result<()> {
    if config_path.exists() {
        return Ok(());
    }
    if let Some(dir) = config_path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| anyhow::anyhow!("Failed to create config directory: {e}"))?;
    }
    std::fs::write(config_path, FileConfig::template())?;
    tracing::info!("Created config file: {}", config_path.display());
    Ok(())
}

/// Finds the best available editor to use.
fn find_editor() -> anyhow::Result<String> {
    if let Ok(editor) = std::env::var("EDITOR") {
        if !editor.is_empty() {
            return Ok(editor);
        }
    }

    for editor in &["nano", "vi"] {
        if is_editor_available(editor) {
            return Ok(editor.to_string());
        }
    }

    Err(anyhow::anyhow!(
        "No editor found. Please set the $EDITOR environment variable."
    ))
}

/// Checks if an editor is available in the system PATH.
fn is_editor_available(editor: &str) -> bool {
    Command::new("which")
        .arg(editor)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("three-play.toml");

        ensure_config_file(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# three-play configuration"));
        assert!(FileConfig::load_from(&path).unwrap().is_some());

        std::fs::write(&path, "[api]\napi_key = \"mine\"\n").unwrap();
        ensure_config_file(&path).unwrap();
        let kept = FileConfig::load_from(&path).unwrap().unwrap();
        assert_eq!(kept.api.api_key.as_deref(), Some("mine"));
    }
}
