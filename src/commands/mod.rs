//! Application command handlers for three-play.
//!
//! # Commands
//! - `media`: list, show, find the latest and archive media files
//! - `transcripts`: transcript listing, text, edit links and cancellation
//! - `catalog`: languages, turnaround levels and integrations
//! - `order`: ASR and transcription orders
//! - `config`: Open configuration file in user's preferred editor
//! - `logs`: Display recent log entries

pub mod catalog;
pub mod config;
pub mod logs;
pub mod media;
pub mod order;
pub mod transcripts;

pub use catalog::{handle_integrations, handle_languages, handle_turnarounds};
pub use config::handle_config;
pub use logs::handle_logs;
pub use media::handle_media;
pub use order::handle_order;
pub use transcripts::{handle_active_transcripts, handle_transcript, handle_transcripts};

use serde::Serialize;

/// Prints a value to stdout as pretty JSON.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
