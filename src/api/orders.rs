//! Order endpoints: transcription, ASR, translation and audio description.
//!
//! Ordering is slow on 3Play's side (often ~10s, spiking to a minute), so the
//! boolean order calls only wait `order_timeout_secs` for a response. `false`
//! means the order should be retried later.

use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde_json::Value;

use super::{order_outcome, Params, RequestOptions, ThreePlayApi};
use crate::error::{Result, ThreePlayError};
use crate::models::{Language, NewMediaFile, TranslationOption, Turnaround, TurnaroundAd, TurnaroundLevel};

/// Options shared by the transcription order calls.
#[derive(Debug, Clone, Default)]
pub struct OrderOptions {
    pub turnaround: Turnaround,
    /// URL 3Play calls when the order completes. Never logged.
    pub callback: Option<String>,
}

impl ThreePlayApi {
    fn order_request_options(&self) -> RequestOptions {
        let secs = self.config().http.order_timeout_secs;
        RequestOptions {
            timeout: (secs > 0).then(|| Duration::from_secs(secs)),
            ..RequestOptions::default()
        }
    }

    /// Creates a media file for the video and orders a transcript on it.
    ///
    /// Returns `(media_file_id, success)`.
    pub async fn order_transcription(&self, new_file: &NewMediaFile, options: &OrderOptions) -> Result<(u64, bool)> {
        let media_file_id = self.create_media_file(new_file).await?;
        let success = self
            .order_transcription_for_media_file(media_file_id, options)
            .await?;
        Ok((media_file_id, success))
    }

    /// Orders a transcript on an existing media file.
    ///
    /// An order that already exists counts as success.
    pub async fn order_transcription_for_media_file(&self, media_file_id: u64, options: &OrderOptions) -> Result<bool> {
        let mut params = Params::new()
            .with("media_file_id", media_file_id)
            .with("turnaround_level_id", options.turnaround.id());
        params.push_opt("callback", options.callback.as_deref());

        self.order_transcription_service("transcription", media_file_id, &params)
            .await
    }

    /// Creates a media file for the video and orders ASR on it.
    ///
    /// Returns `(media_file_id, success)`.
    pub async fn order_asr(&self, new_file: &NewMediaFile, callback: Option<&str>) -> Result<(u64, bool)> {
        let media_file_id = self.create_media_file(new_file).await?;
        let success = self.order_asr_for_media_file(media_file_id, callback).await?;
        Ok((media_file_id, success))
    }

    /// Orders Automated Speech Recognition on an existing media file.
    pub async fn order_asr_for_media_file(&self, media_file_id: u64, callback: Option<&str>) -> Result<bool> {
        let mut params = Params::new().with("media_file_id", media_file_id);
        params.push_opt("callback", callback);

        self.order_transcription_service("asr", media_file_id, &params)
            .await
    }

    async fn order_transcription_service(&self, service: &str, media_file_id: u64, params: &Params) -> Result<bool> {
        let result = self
            .request_with(
                Method::POST,
                &format!("transcripts/order/{service}"),
                params,
                &self.order_request_options(),
            )
            .await;

        order_outcome(
            result,
            StatusCode::BAD_REQUEST,
            &service_label(service),
            media_file_id,
        )
    }

    /// Orders audio description on a media file.
    ///
    /// `extended` orders Extended AD; some platforms (e.g. Wistia) only
    /// support standard. 403 means an order is already in progress.
    pub async fn order_audio_description_for_media_file(
        &self,
        media_file_id: u64,
        turnaround: TurnaroundAd,
        extended: bool,
        callback: Option<&str>,
    ) -> Result<bool> {
        let mut params = Params::new()
            .with("media_file_id", media_file_id)
            .with("extended", extended)
            .with("turnaround_level_id", turnaround.id());
        params.push_opt("callback", callback);

        let result = self
            .request_with(
                Method::POST,
                "audio_descriptions/order",
                &params,
                &self.order_request_options(),
            )
            .await;

        order_outcome(result, StatusCode::FORBIDDEN, "Audio description", media_file_id)
    }

    /// Orders a translation of a media file's transcript.
    ///
    /// # Errors
    /// - `NoTranslationOption` if 3Play does not translate `source` into `target`
    pub async fn order_translation(
        &self,
        media_file_id: u64,
        source: Language,
        target: Language,
        source_transcript_id: Option<u64>,
    ) -> Result<Value> {
        let option_id = TranslationOption::get(source, target).ok_or_else(|| ThreePlayError::NoTranslationOption {
            source_language: source.name().to_string(),
            target_language: target.name().to_string(),
        })?;

        let mut params = Params::new()
            .with("media_file_id", media_file_id)
            .with("translation_service_option_id", option_id);
        params.push_opt("source_transcript_id", source_transcript_id);

        self.post("transcripts/order/translation", &params).await
    }
}

/// `"Transcript"` for transcription, `"Transcript (Asr)"` for other services.
fn service_label(service: &str) -> String {
    if service.to_uppercase().contains("TRANSCRIPT") {
        return "Transcript".to_string();
    }
    let mut chars = service.chars();
    match chars.next() {
        Some(first) => format!(
            "Transcript ({}{})",
            first.to_uppercase(),
            chars.as_str().to_lowercase()
        ),
        None => "Transcript".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_service_label() {
        assert_eq!(service_label("transcription"), "Transcript");
        assert_eq!(service_label("asr"), "Transcript (Asr)");
    }

    #[test]
    fn test_order_timeout() {
        let api = ThreePlayApi::new(Config::with_api_key("k")).unwrap();
        assert_eq!(api.order_request_options().timeout, Some(Duration::from_secs(2)));

        let mut config = Config::with_api_key("k");
        config.http.order_timeout_secs = 0;
        let api = ThreePlayApi::new(config).unwrap();
        assert_eq!(api.order_request_options().timeout, None);
    }

    #[tokio::test]
    async fn test_unknown_translation_pair_fails_before_sending() {
        let api = ThreePlayApi::new(Config::with_api_key("k").base_url("http://127.0.0.1:9")).unwrap();
        let err = api
            .order_translation(1, Language::French, Language::German, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ThreePlayError::NoTranslationOption { .. }));
        assert_eq!(
            err.to_string(),
            "No translation option from French to German"
        );
    }
}
