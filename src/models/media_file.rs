//! Media file records returned by the `files` endpoints.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::{iso8601, Language};

/// Base URL of the 3Play account web app.
pub const ACCOUNT_URL: &str = "https://account.3playmedia.com";

/// An audio or video asset submitted to 3Play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaFile {
    pub id: u64,
    pub name: String,
    /// Duration in milliseconds, unset until 3Play has processed the source
    #[serde(default)]
    pub duration: Option<u64>,
    /// Raw 3Play language id; see [`MediaFile::language`]
    pub language_id: i64,
    #[serde(default)]
    pub source: Option<String>,
    /// Id of the video on the integrated platform (3Play's `reference_id`)
    #[serde(rename = "reference_id", default)]
    pub video_id: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(with = "iso8601")]
    pub created_at: DateTime<FixedOffset>,
    #[serde(with = "iso8601")]
    pub updated_at: DateTime<FixedOffset>,
}

impl MediaFile {
    /// Link to a media file in the 3Play web app.
    pub fn url(file_id: u64) -> String {
        format!("{ACCOUNT_URL}/files/{file_id}")
    }

    /// The file's language, or `None` for ids outside [`Language::all`].
    pub fn language(&self) -> Option<Language> {
        Language::from_id(self.language_id)
    }
}

/// Parameters for creating a media file that references an integrated video.
#[derive(Debug, Clone)]
pub struct NewMediaFile {
    pub video_id: String,
    pub video_name: String,
    pub language: Language,
    /// Defaults to `video_name`
    pub file_name: Option<String>,
    /// Defaults to the configured integration id
    pub integration_id: Option<String>,
    pub attribute1: Option<String>,
    pub attribute2: Option<String>,
    pub attribute3: Option<String>,
    /// Rendered as `label:value` pairs
    pub labels: Vec<(String, String)>,
}

impl NewMediaFile {
    pub fn new(video_id: impl Into<String>, video_name: impl Into<String>, language: Language) -> Self {
        Self {
            video_id: video_id.into(),
            video_name: video_name.into(),
            language,
            file_name: None,
            integration_id: None,
            attribute1: None,
            attribute2: None,
            attribute3: None,
            labels: Vec::new(),
        }
    }

    pub(crate) fn label_param(&self) -> String {
        self.labels
            .iter()
            .map(|(label, value)| format!("{label}:{value}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEDIA_FILE_JSON: &str = r#"{
        "id": 8812345,
        "name": "Testing - Product Demo",
        "duration": 93120,
        "language_id": 1,
        "source": "https://www.youtube.com/watch?v=abc123",
        "reference_id": "abc123",
        "state": "complete",
        "created_at": "2022-03-14T09:26:53-04:00",
        "updated_at": "2022-03-15T10:00:01-04:00",
        "attribute1": null
    }"#;

    #[test]
    fn test_media_file_fields_from_vendor_payload() {
        let file: MediaFile = serde_json::from_str(MEDIA_FILE_JSON).unwrap();

        assert_eq!(file.id, 8812345);
        assert_eq!(file.name, "Testing - Product Demo");
        assert_eq!(file.duration, Some(93120));
        assert_eq!(file.language_id, 1);
        assert_eq!(file.language(), Some(Language::English));
        assert_eq!(
            file.source.as_deref(),
            Some("https://www.youtube.com/watch?v=abc123")
        );
        assert_eq!(file.video_id.as_deref(), Some("abc123"));
        assert_eq!(file.state.as_deref(), Some("complete"));
        assert_eq!(file.created_at.to_rfc3339(), "2022-03-14T09:26:53-04:00");
        assert_eq!(file.updated_at.to_rfc3339(), "2022-03-15T10:00:01-04:00");
    }

    #[test]
    fn test_media_file_reserializes_vendor_field_names() {
        let file: MediaFile = serde_json::from_str(MEDIA_FILE_JSON).unwrap();
        let value = serde_json::to_value(&file).unwrap();

        assert_eq!(value["reference_id"], "abc123");
        assert_eq!(value["language_id"], 1);

        let again: MediaFile = serde_json::from_value(value).unwrap();
        assert_eq!(again, file);
    }

    #[test]
    fn test_unknown_language_still_decodes() {
        let json = MEDIA_FILE_JSON.replace("\"language_id\": 1", "\"language_id\": 42");
        let file: MediaFile = serde_json::from_str(&json).unwrap();
        assert_eq!(file.language_id, 42);
        assert_eq!(file.language(), None);
    }

    #[test]
    fn test_labels_and_url() {
        let mut new_file = NewMediaFile::new("abc123", "Demo", Language::English);
        new_file.labels = vec![
            ("team".to_string(), "marketing".to_string()),
            ("year".to_string(), "2022".to_string()),
        ];
        assert_eq!(new_file.label_param(), "team:marketing,year:2022");
        assert_eq!(
            MediaFile::url(42),
            "https://account.3playmedia.com/files/42"
        );
    }
}
