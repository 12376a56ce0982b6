//! 3Play API models.
//!
//! Plain records mirroring the JSON the API returns, plus the enumerations
//! (languages, statuses, turnaround levels) used to build requests.

pub mod audio_description;
pub mod language;
pub mod media_file;
pub mod transcript;
pub mod turnaround;

use serde::{Deserialize, Serialize};

pub use audio_description::AudioDescription;
pub use language::{Language, TranscriptFormat, TranslationOption, UnknownLanguage};
pub use media_file::{MediaFile, NewMediaFile};
pub use transcript::{Transcript, TranscriptStatus};
pub use turnaround::{Turnaround, TurnaroundAd, TurnaroundLevel};

/// Envelope of every 3Play v3 response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// Pagination block attached to list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub per_page: u64,
    pub total_entries: u64,
    #[serde(default)]
    pub current_page: Option<u64>,
}

impl Pagination {
    /// Total number of pages, at least one.
    pub fn page_count(&self) -> u64 {
        if self.per_page == 0 {
            return 1;
        }
        self.total_entries.div_ceil(self.per_page).max(1)
    }
}

/// Timestamps as 3Play sends them: RFC 3339, or a naive ISO 8601 value taken as UTC.
pub(crate) mod iso8601 {
    use chrono::{DateTime, FixedOffset, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    pub fn parse(value: &str) -> Option<DateTime<FixedOffset>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(dt);
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
            .map(|naive| naive.and_utc().into())
    }

    pub fn serialize<S: Serializer>(dt: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&dt.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error> {
        let value = String::deserialize(deserializer)?;
        parse(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {value}")))
    }
}
