//! Transcript commands.

use anyhow::anyhow;
use console::style;
use three_play::{ResourceRef, TextOptions, ThreePlayApi, TranscriptStatus};

use super::print_json;
use crate::app::TranscriptCommand;

/// Lists transcripts for a video.
///
/// # Errors
/// - If `status` is not a transcript status
/// - If the video has no matching transcripts
pub async fn handle_transcripts(
    api: &ThreePlayApi,
    video_id: &str,
    status: Option<&str>,
    default_only: bool,
    latest_first: bool,
) -> anyhow::Result<()> {
    let status = status
        .map(|s| TranscriptStatus::from_str_opt(s).ok_or_else(|| anyhow!("Unknown transcript status: {s}")))
        .transpose()?;

    let transcripts = api
        .helper()
        .get_transcripts(video_id, status, default_only, latest_first)
        .await?;
    print_json(&transcripts)
}

/// Prints the transcripts currently used as captions for a video, with their languages.
pub async fn handle_active_transcripts(api: &ThreePlayApi, video_id: &str) -> anyhow::Result<()> {
    let transcripts = api.helper().get_active_transcript_list(video_id).await?;
    for transcript in &transcripts {
        eprintln!(
            "{} {} ({})",
            style(transcript.id).bold(),
            transcript.language().map(|l| l.name()).unwrap_or("Unknown"),
            transcript.type_label()
        );
    }
    print_json(&transcripts)
}

/// Runs a `transcript` subcommand.
pub async fn handle_transcript(api: &ThreePlayApi, command: TranscriptCommand) -> anyhow::Result<()> {
    match command {
        TranscriptCommand::Text {
            transcript_id,
            start_seconds,
            cut_from,
            cut_to,
        } => {
            let text = match (cut_from, cut_to) {
                (Some(first_end), Some(second_start)) => {
                    api.helper()
                        .cut_transcript_in_middle(transcript_id, &first_end, &second_start, 0, None)
                        .await?
                }
                _ => {
                    let options = TextOptions {
                        start_seconds,
                        ..TextOptions::default()
                    };
                    api.get_formatted_transcript_text(transcript_id, &options)
                        .await?
                }
            };
            // SRT goes out as-is so it can be redirected to a file
            print!("{text}");
            Ok(())
        }
        TranscriptCommand::EditUrl { id, video_id, hours } => {
            let target = match (id, video_id) {
                (Some(id), _) => ResourceRef::Id(id),
                (None, Some(video_id)) => ResourceRef::Video(video_id),
                (None, None) => return Err(anyhow!("Pass --id or --video-id")),
            };
            match api.get_expiring_edit_url(&target, hours).await? {
                Some(url) => {
                    println!("{url}");
                    Ok(())
                }
                None => Err(anyhow!("No transcripts found for {target:?}")),
            }
        }
        TranscriptCommand::Cancel { video_id } => {
            let cancelled = api.helper().cancel_transcripts(&video_id).await?;
            eprintln!(
                "{} Cancelled {} transcript(s) for {}",
                style("✓").green(),
                cancelled,
                video_id
            );
            Ok(())
        }
    }
}
