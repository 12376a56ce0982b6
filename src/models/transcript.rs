//! Transcript records returned by the `transcripts` endpoints.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::turnaround::title_case;
use super::{Language, MediaFile};
use crate::error::{Result, ThreePlayError};

/// Transcript statuses used in the 3Play API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptStatus {
    InProgress,
    Pending,
    Complete,
    Cancelled,
}

impl TranscriptStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TranscriptStatus::InProgress => "in_progress",
            TranscriptStatus::Pending => "pending",
            TranscriptStatus::Complete => "complete",
            TranscriptStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str_opt(value: &str) -> Option<Self> {
        match value {
            "in_progress" => Some(TranscriptStatus::InProgress),
            "pending" => Some(TranscriptStatus::Pending),
            "complete" => Some(TranscriptStatus::Complete),
            "cancelled" => Some(TranscriptStatus::Cancelled),
            _ => None,
        }
    }

    /// `"In Progress"`, `"Complete"`, ...
    pub fn title(self) -> String {
        title_case(self.as_str())
    }

    /// Still waiting on 3Play.
    pub fn is_open(self) -> bool {
        matches!(self, TranscriptStatus::Pending | TranscriptStatus::InProgress)
    }
}

impl std::fmt::Display for TranscriptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transcript (or translation) order on a media file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub id: u64,
    pub media_file_id: u64,
    #[serde(rename = "reference_id", default)]
    pub video_id: Option<String>,
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub default: bool,
    /// Raw 3Play type, e.g. `TranslatedTranscript`
    #[serde(rename = "type")]
    pub kind: String,
    pub language_id: i64,
    pub status: TranscriptStatus,
    #[serde(default)]
    pub cancellable: bool,
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<FixedOffset>>,
}

impl Transcript {
    /// Raw type name for translations.
    pub const TRANSLATED: &'static str = "TranslatedTranscript";

    /// Duration in milliseconds, zero when 3Play has not reported one.
    pub fn duration_ms(&self) -> u64 {
        self.duration.unwrap_or(0)
    }

    /// Display label for the transcript type; unknown types are shown as-is.
    pub fn type_label(&self) -> &str {
        match self.kind.as_str() {
            "TranslatedTranscript" => "Translation",
            "TranscribedTranscript" => "Transcript",
            "ReviewedTranscript" => "Transcript (Reviewed)",
            "ImportedTranscript" => "Transcript (Imported)",
            "VendorTranscribedTranscript" => "Transcript (Vendor)",
            "AsrTranscript" => "ASR",
            other => other,
        }
    }

    pub fn is_translation(&self) -> bool {
        self.kind == Self::TRANSLATED
    }

    /// The transcript language, or `InvalidLanguageId` if 3Play returned an id we don't know.
    pub fn language(&self) -> Result<Language> {
        Language::from_id(self.language_id).ok_or(ThreePlayError::InvalidLanguageId {
            language_id: self.language_id,
            transcript_id: self.id,
        })
    }

    /// Copies timestamps from the media file the transcript belongs to.
    pub fn with_media_file(mut self, media_file: &MediaFile) -> Self {
        self.created_at = Some(media_file.created_at);
        if self.status == TranscriptStatus::Complete {
            self.completed_at = Some(media_file.updated_at);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript_json(status: &str, duration: &str) -> String {
        format!(
            r#"{{
                "id": 5550001,
                "media_file_id": 8812345,
                "reference_id": "abc123",
                "duration": {duration},
                "default": true,
                "type": "ReviewedTranscript",
                "language_id": 13,
                "status": "{status}",
                "cancellable": false
            }}"#
        )
    }

    #[test]
    fn test_parse_transcript() {
        let t: Transcript = serde_json::from_str(&transcript_json("complete", "61000")).unwrap();
        assert_eq!(t.id, 5550001);
        assert_eq!(t.media_file_id, 8812345);
        assert_eq!(t.video_id.as_deref(), Some("abc123"));
        assert_eq!(t.duration_ms(), 61000);
        assert!(t.default);
        assert_eq!(t.type_label(), "Transcript (Reviewed)");
        assert_eq!(t.language().unwrap(), Language::Spanish);
        assert_eq!(t.status, TranscriptStatus::Complete);
        assert!(t.created_at.is_none());
    }

    #[test]
    fn test_null_duration_is_zero() {
        let t: Transcript = serde_json::from_str(&transcript_json("pending", "null")).unwrap();
        assert_eq!(t.duration_ms(), 0);
        assert!(t.status.is_open());
    }

    #[test]
    fn test_invalid_language() {
        let mut t: Transcript = serde_json::from_str(&transcript_json("complete", "1")).unwrap();
        t.language_id = 404;
        match t.language() {
            Err(ThreePlayError::InvalidLanguageId {
                language_id,
                transcript_id,
            }) => {
                assert_eq!(language_id, 404);
                assert_eq!(transcript_id, 5550001);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_with_media_file_sets_completed_only_when_complete() {
        let file: MediaFile = serde_json::from_value(serde_json::json!({
            "id": 8812345,
            "name": "Demo",
            "language_id": 1,
            "created_at": "2022-03-14T09:26:53+00:00",
            "updated_at": "2022-03-15T10:00:01+00:00"
        }))
        .unwrap();

        let done: Transcript = serde_json::from_str(&transcript_json("complete", "1")).unwrap();
        let done = done.with_media_file(&file);
        assert_eq!(done.created_at, Some(file.created_at));
        assert_eq!(done.completed_at, Some(file.updated_at));

        let open: Transcript = serde_json::from_str(&transcript_json("in_progress", "1")).unwrap();
        let open = open.with_media_file(&file);
        assert_eq!(open.created_at, Some(file.created_at));
        assert!(open.completed_at.is_none());
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(TranscriptStatus::InProgress.title(), "In Progress");
        assert_eq!(
            TranscriptStatus::from_str_opt("cancelled"),
            Some(TranscriptStatus::Cancelled)
        );
        assert_eq!(TranscriptStatus::from_str_opt("done"), None);
    }
}
