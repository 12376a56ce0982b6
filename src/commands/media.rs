//! Media file commands.

use console::style;
use three_play::{MediaFile, MediaFileFilter, ThreePlayApi};

use super::print_json;
use crate::app::MediaCommand;

/// Runs a `media` subcommand.
///
/// # Errors
/// - If the 3Play request fails
/// - `media latest` when the video has no media file
pub async fn handle_media(api: &ThreePlayApi, command: MediaCommand) -> anyhow::Result<()> {
    match command {
        MediaCommand::List {
            name,
            name_partial,
            video_id,
            latest_first,
            per_page,
        } => {
            let filter = MediaFileFilter {
                name,
                name_partial,
                video_id,
                per_page,
                sort_by_created: latest_first,
                latest_first,
                ..MediaFileFilter::default()
            };
            let files = api.list_media_files(&filter).await?;
            tracing::info!("Listed {} media files", files.data.len());
            print_json(&files.data)
        }
        MediaCommand::Get { media_file_id } => {
            let file = api.get_media_file(media_file_id).await?;
            print_json(&file)
        }
        MediaCommand::Latest { video_id } => {
            let file = api.helper().get_latest_media_file(&video_id).await?;
            eprintln!("{}", style(MediaFile::url(file.id)).dim());
            print_json(&file)
        }
        MediaCommand::Archive { media_file_ids } => {
            let archived = api.archive_media_files(&media_file_ids).await?;
            if archived {
                eprintln!("{} Archived {} media file(s)", style("✓").green(), media_file_ids.len());
                Ok(())
            } else {
                Err(anyhow::anyhow!("3Play did not archive media files {media_file_ids:?}"))
            }
        }
    }
}
