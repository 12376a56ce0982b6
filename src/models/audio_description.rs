//! Audio description orders.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::media_file::ACCOUNT_URL;
use super::{Language, MediaFile, TranscriptStatus};

/// An audio description order on a media file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioDescription {
    pub id: u64,
    pub media_file_id: u64,
    #[serde(rename = "reference_id", default)]
    pub video_id: Option<String>,
    #[serde(default)]
    pub duration: Option<u64>,
    pub status: TranscriptStatus,
    /// Not part of the payload; English until a media file says otherwise.
    #[serde(skip_deserializing, default = "default_language")]
    pub language: Language,
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<FixedOffset>>,
}

fn default_language() -> Language {
    Language::English
}

impl AudioDescription {
    /// Display label, matching the `type` of transcripts.
    pub const TYPE_LABEL: &'static str = "Audio Description";

    /// Id prefixed so it cannot clash with transcript ids in mixed listings.
    pub fn display_id(&self) -> String {
        format!("ad-{}", self.id)
    }

    /// Link to download the mixed audio from the 3Play web app.
    pub fn asset_url(&self, download_format: &str) -> String {
        format!(
            "{ACCOUNT_URL}/audio_descriptions/{}/download_asset?download_format={download_format}",
            self.id
        )
    }

    /// 3Play only offers audio description for English and Spanish videos.
    pub fn is_available(language: Language) -> bool {
        matches!(language, Language::English | Language::Spanish)
    }

    /// Takes language and timestamps from the media file the order belongs to.
    /// A media file language we don't know leaves the current one in place.
    pub fn with_media_file(mut self, media_file: &MediaFile) -> Self {
        if let Some(language) = media_file.language() {
            self.language = language;
        }
        self.created_at = Some(media_file.updated_at);
        if self.status == TranscriptStatus::Complete {
            self.completed_at = Some(media_file.updated_at);
        }
        self
    }
}
