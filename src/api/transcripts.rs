//! Transcript endpoints.

use serde::Deserialize;
use serde_json::Value;

use super::{data_of, CaptionUpload, Params, RequestOptions, ResourceRef, ThreePlayApi, DEFAULT_PER_PAGE};
use crate::error::{Result, ThreePlayError};
use crate::models::{ApiResponse, Language, Transcript, TranscriptFormat, TranscriptStatus};

/// Filters for [`ThreePlayApi::get_transcripts`]. Unset fields are not sent.
#[derive(Debug, Clone, Default)]
pub struct TranscriptFilter {
    pub transcript_id: Option<u64>,
    pub media_file_id: Option<u64>,
    pub media_file_name: Option<String>,
    pub attribute1: Option<String>,
    pub attribute2: Option<String>,
    pub attribute3: Option<String>,
    pub label: Option<String>,
    /// Only default transcripts
    pub by_default: bool,
    pub status: Option<TranscriptStatus>,
    pub language: Option<Language>,
    /// Integrated platform video id (`media_file_reference_id`)
    pub video_id: Option<String>,
    /// Defaults to 100
    pub per_page: Option<u32>,
    pub sort_by_created: bool,
    /// Only applies together with `sort_by_created`
    pub latest_first: bool,
}

impl TranscriptFilter {
    pub fn video_id(video_id: impl Into<String>) -> Self {
        Self {
            video_id: Some(video_id.into()),
            ..Self::default()
        }
    }

    pub fn to_params(&self) -> Params {
        let mut params = Params::new().with("per_page", self.per_page.unwrap_or(DEFAULT_PER_PAGE));
        params.push_opt("id", self.transcript_id);
        params.push_opt("media_file_id", self.media_file_id);
        params.push_opt("media_file_name", self.media_file_name.as_deref());
        params.push_opt("media_file_attribute1", self.attribute1.as_deref());
        params.push_opt("media_file_attribute2", self.attribute2.as_deref());
        params.push_opt("media_file_attribute3", self.attribute3.as_deref());
        params.push_opt("media_file_label", self.label.as_deref());
        params.push_opt("status", self.status.map(TranscriptStatus::as_str));
        params.push_opt("language_id", self.language.map(Language::id));
        params.push_opt("media_file_reference_id", self.video_id.as_deref());
        if self.sort_by_created {
            params.push("sort_by", "created_at");
            if self.latest_first {
                params.push("sort_dir", "desc");
            }
        }
        if self.by_default {
            params.push("default", "true");
        }
        params
    }
}

/// Options for [`ThreePlayApi::get_formatted_transcript_text`].
#[derive(Debug, Clone, Default)]
pub struct TextOptions {
    /// Seconds to cut from the start of the captions, e.g. `"32.012"`
    pub start_seconds: Option<String>,
    pub format: TranscriptFormat,
    /// Portions to keep as millisecond pairs, e.g. `"0,10500"`
    pub clips: Vec<String>,
}

impl TextOptions {
    pub fn to_params(&self) -> Params {
        let mut params = Params::new().with("output_format_id", self.format.id());
        params.push_opt(
            "offset",
            self.start_seconds
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty() && *s != "0")
                .map(|s| format!("-{s}s")),
        );
        for clip in &self.clips {
            params.push("clips[]", clip);
        }
        params
    }
}

#[derive(Debug, Deserialize)]
struct Delivery {
    method: String,
    #[serde(default)]
    success: bool,
}

impl ThreePlayApi {
    /// Lists transcripts matching the filter, across all pages.
    ///
    /// When a status is requested, records with any other status are dropped;
    /// 3Play occasionally includes in-progress records in a `complete` listing.
    pub async fn get_transcripts(&self, filter: &TranscriptFilter) -> Result<ApiResponse<Vec<Transcript>>> {
        let mut body = self.get("transcripts", &filter.to_params()).await?;
        if let Some(status) = filter.status {
            retain_status(&mut body, status);
        }
        Ok(serde_json::from_value(body)?)
    }

    pub async fn get_transcript(&self, transcript_id: u64) -> Result<Transcript> {
        let body = self
            .get(&format!("transcripts/{transcript_id}"), &Params::new())
            .await?;
        data_of(body)
    }

    /// The first translation among the matching transcripts, if any.
    pub async fn get_translation(
        &self,
        media_file_id: Option<u64>,
        transcript_id: Option<u64>,
    ) -> Result<Option<Transcript>> {
        let filter = TranscriptFilter {
            media_file_id,
            transcript_id,
            ..TranscriptFilter::default()
        };
        let transcripts = self.get_transcripts(&filter).await?.data;
        Ok(transcripts.into_iter().find(Transcript::is_translation))
    }

    /// Formatted text (SRT by default) for a transcript.
    pub async fn get_formatted_transcript_text(&self, transcript_id: u64, options: &TextOptions) -> Result<String> {
        let body = self
            .get(&format!("transcripts/{transcript_id}/text"), &options.to_params())
            .await?;
        Ok(body["data"].as_str().unwrap_or_default().to_string())
    }

    /// Attempts to cancel a transcript; `false` if 3Play refused.
    pub async fn cancel_transcript(&self, transcript_id: u64) -> Result<bool> {
        match self
            .post(&format!("transcripts/{transcript_id}/cancel"), &Params::new())
            .await
        {
            Ok(_) => Ok(true),
            Err(ThreePlayError::Http { status, .. }) => {
                tracing::info!("Transcript {} could not be cancelled ({})", transcript_id, status);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Triggers redelivery of captions to an integration (e.g. `"wistia"`).
    ///
    /// Returns whether the delivery through `service` succeeded.
    pub async fn redeliver_transcript(&self, transcript_id: u64, service: &str) -> Result<bool> {
        let body = self
            .post(&format!("transcripts/{transcript_id}/redeliver"), &Params::new())
            .await?;
        let deliveries: Vec<Delivery> = data_of(body)?;
        Ok(deliveries
            .iter()
            .any(|delivery| delivery.method == service && delivery.success))
    }

    /// Re-sends the completion callback for a transcript.
    pub async fn trigger_callback(&self, transcript_id: u64) -> Result<Value> {
        self.post(&format!("transcripts/{transcript_id}/callback"), &Params::new())
            .await
    }

    /// Imports existing SRT captions as a transcript on a media file.
    pub async fn import_transcript(
        &self,
        media_file_id: u64,
        caption_file_contents: &str,
        language: Language,
        auto_paragraph: bool,
    ) -> Result<Value> {
        let params = Params::new()
            .with("media_file_id", media_file_id)
            .with("language_id", language.id())
            .with("autoparagraph", auto_paragraph);
        let options = RequestOptions {
            upload: Some(CaptionUpload {
                contents: caption_file_contents.to_string(),
            }),
            ..RequestOptions::default()
        };

        self.request_with(reqwest::Method::POST, "transcripts/order/import", &params, &options)
            .await
    }

    /// An expiring editing link for a transcript, or for the latest transcript of a video.
    ///
    /// Returns `None` when the video has no transcripts.
    pub async fn get_expiring_edit_url(&self, target: &ResourceRef, expiration_hours: u32) -> Result<Option<String>> {
        let transcript_id = match target {
            ResourceRef::Id(id) => *id,
            ResourceRef::Video(video_id) => {
                tracing::info!("{}: Retrieving latest transcript for video", video_id);
                let filter = TranscriptFilter {
                    sort_by_created: true,
                    ..TranscriptFilter::video_id(video_id.clone())
                };
                match self.get_transcripts(&filter).await?.data.last() {
                    Some(transcript) => transcript.id,
                    None => return Ok(None),
                }
            }
        };

        let body = self
            .get(
                &format!("transcripts/{transcript_id}/expiring_editing_link"),
                &Params::new().with("hours_until_expiration", expiration_hours),
            )
            .await?;
        Ok(body["data"].as_str().map(str::to_string))
    }
}

/// Drops records in `data` whose `status` differs from `status`.
fn retain_status(body: &mut Value, status: TranscriptStatus) {
    if let Some(Value::Array(records)) = body.get_mut("data") {
        records.retain(|record| record["status"].as_str() == Some(status.as_str()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_params() {
        let filter = TranscriptFilter {
            status: Some(TranscriptStatus::Complete),
            language: Some(Language::French),
            by_default: true,
            sort_by_created: true,
            ..TranscriptFilter::video_id("abc123")
        };
        let params = filter.to_params();
        assert_eq!(params.get("media_file_reference_id"), Some("abc123"));
        assert_eq!(params.get("status"), Some("complete"));
        assert_eq!(params.get("language_id"), Some("5"));
        assert_eq!(params.get("default"), Some("true"));
        assert_eq!(params.get("sort_by"), Some("created_at"));
        assert_eq!(params.get("sort_dir"), None);
        assert_eq!(params.get("id"), None);
    }

    #[test]
    fn test_text_options_params() {
        let options = TextOptions {
            start_seconds: Some("32.012".to_string()),
            clips: vec!["0,10500".to_string(), "21060,28140".to_string()],
            ..TextOptions::default()
        };
        let params = options.to_params();
        assert_eq!(params.get("output_format_id"), Some("7"));
        assert_eq!(params.get("offset"), Some("-32.012s"));
        assert_eq!(
            params.get_all("clips[]").collect::<Vec<_>>(),
            vec!["0,10500", "21060,28140"]
        );

        let params = TextOptions::default().to_params();
        assert_eq!(params.get("offset"), None);
        assert_eq!(params.get("clips[]"), None);
    }

    #[test]
    fn test_retain_status() {
        let mut body = json!({"data": [
            {"id": 1, "status": "complete"},
            {"id": 2, "status": "in_progress"},
            {"id": 3, "status": "complete"}
        ]});
        retain_status(&mut body, TranscriptStatus::Complete);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"][1]["id"], 3);
    }
}
