//! Audio description endpoints.

use chrono::{DateTime, FixedOffset};

use super::{data_of, Params, ResourceRef, ThreePlayApi, DEFAULT_PER_PAGE};
use crate::error::{Result, ThreePlayError};
use crate::models::{AudioDescription, Language, TranscriptStatus};

/// Filters for [`ThreePlayApi::list_audio_descriptions`].
#[derive(Debug, Clone, Default)]
pub struct AudioDescriptionFilter {
    pub id: Option<u64>,
    pub media_file_id: Option<u64>,
    pub media_file_name: Option<String>,
    pub attribute1: Option<String>,
    pub attribute2: Option<String>,
    pub attribute3: Option<String>,
    pub status: Option<TranscriptStatus>,
    pub language: Option<Language>,
    pub video_id: Option<String>,
    pub per_page: Option<u32>,
    pub sort_by_created: bool,
    /// Media files created after this instant
    pub created_after: Option<DateTime<FixedOffset>>,
}

impl AudioDescriptionFilter {
    pub fn video_id(video_id: impl Into<String>) -> Self {
        Self {
            video_id: Some(video_id.into()),
            ..Self::default()
        }
    }

    pub fn to_params(&self) -> Params {
        let mut params = Params::new().with("per_page", self.per_page.unwrap_or(DEFAULT_PER_PAGE));
        params.push_opt("id", self.id);
        params.push_opt("media_file_id", self.media_file_id);
        params.push_opt("media_file_name", self.media_file_name.as_deref());
        params.push_opt("media_file_attribute1", self.attribute1.as_deref());
        params.push_opt("media_file_attribute2", self.attribute2.as_deref());
        params.push_opt("media_file_attribute3", self.attribute3.as_deref());
        params.push_opt("status", self.status.map(TranscriptStatus::as_str));
        params.push_opt("language_id", self.language.map(Language::id));
        params.push_opt("media_file_reference_id", self.video_id.as_deref());
        if self.sort_by_created {
            params.push("sort_by", "created_at");
        }
        params.push_opt("media_file_created_after", self.created_after.map(|dt| dt.to_rfc3339()));
        params
    }
}

impl ThreePlayApi {
    pub async fn list_audio_descriptions(&self, filter: &AudioDescriptionFilter) -> Result<Vec<AudioDescription>> {
        let body = self.get("audio_descriptions", &filter.to_params()).await?;
        let orders: Option<Vec<AudioDescription>> = data_of(body)?;
        Ok(orders.unwrap_or_default())
    }

    /// Signed download link for the mixed audio (description plus source).
    ///
    /// For a video id, the most recent complete order is used.
    ///
    /// # Errors
    /// - `AdIsNotComplete` if the most recent order is still pending or in progress
    pub async fn get_ad_asset_url(&self, target: &ResourceRef, media_format: &str) -> Result<Option<String>> {
        let ad_id = match target {
            ResourceRef::Id(id) => *id,
            ResourceRef::Video(video_id) => {
                let filter = AudioDescriptionFilter {
                    sort_by_created: true,
                    ..AudioDescriptionFilter::video_id(video_id.clone())
                };
                let orders = self.list_audio_descriptions(&filter).await?;
                match latest_complete(video_id, &orders)? {
                    Some(id) => id,
                    None => return Ok(None),
                }
            }
        };

        let body = self
            .get(
                &format!("audio_descriptions/{ad_id}/mix"),
                &Params::new().with("format", media_format),
            )
            .await?;
        Ok(body["data"].as_str().map(str::to_string))
    }

    /// Downloads the mixed audio description media, e.g. as mp3 bytes.
    ///
    /// Returns `None` when there is no complete order to download.
    pub async fn download_ad_asset(&self, target: &ResourceRef, media_format: &str) -> Result<Option<Vec<u8>>> {
        match self.get_ad_asset_url(target, media_format).await? {
            Some(url) => Ok(Some(self.download(&url).await?)),
            None => Ok(None),
        }
    }
}

/// Walks orders newest first (they are sorted oldest first): a complete
/// order wins, an open one means the latest AD is not ready yet, and
/// cancelled orders are skipped.
fn latest_complete(video_id: &str, orders: &[AudioDescription]) -> Result<Option<u64>> {
    for order in orders.iter().rev() {
        match order.status {
            TranscriptStatus::Complete => return Ok(Some(order.id)),
            TranscriptStatus::Pending | TranscriptStatus::InProgress => {
                return Err(ThreePlayError::AdIsNotComplete {
                    video_id: video_id.to_string(),
                })
            }
            TranscriptStatus::Cancelled => continue,
        }
    }
    Ok(None)
}
