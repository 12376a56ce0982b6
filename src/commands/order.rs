//! Order commands.

use anyhow::anyhow;
use console::style;
use serde_json::json;
use three_play::{Language, NewMediaFile, OrderOptions, ThreePlayApi, ThreePlayHelper, Turnaround};

use super::print_json;
use crate::app::OrderCommand;

/// Creates a media file for the video and places the order on it.
///
/// Prints `{"media_file_id": .., "ordered": ..}`. `ordered: false` means
/// 3Play did not confirm in time and the order should be retried.
///
/// # Errors
/// - If the language or turnaround is unknown
/// - If the media file cannot be created
pub async fn handle_order(api: &ThreePlayApi, command: OrderCommand) -> anyhow::Result<()> {
    let (media_file_id, ordered) = match command {
        OrderCommand::Asr {
            video_id,
            video_name,
            language,
            callback,
        } => {
            let new_file = NewMediaFile::new(video_id, video_name, parse_language(&language)?);
            api.order_asr(&new_file, callback.as_deref()).await?
        }
        OrderCommand::Transcription {
            video_id,
            video_name,
            language,
            turnaround,
            callback,
        } => {
            let turnaround = ThreePlayHelper::as_turnaround(turnaround.as_deref(), Some(Turnaround::Standard))?
                .unwrap_or_default();
            let new_file = NewMediaFile::new(video_id, video_name, parse_language(&language)?);
            let options = OrderOptions { turnaround, callback };
            api.order_transcription(&new_file, &options).await?
        }
    };

    if ordered {
        eprintln!("{} Order placed on media file {}", style("✓").green(), media_file_id);
    } else {
        eprintln!(
            "{} Media file {} created, but the order was not confirmed; retry later",
            style("!").yellow(),
            media_file_id
        );
    }
    print_json(&json!({"media_file_id": media_file_id, "ordered": ordered}))
}

fn parse_language(name: &str) -> anyhow::Result<Language> {
    Language::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = Language::all().iter().map(|l| l.name()).collect();
        anyhow!("Unknown language '{name}'. Expected one of: {}", known.join(", "))
    })
}
