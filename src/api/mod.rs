//! Client for the 3Play Media REST API (v3).
//!
//! [`ThreePlayApi`] owns the HTTP client and resolved [`Config`]. Every request
//! carries the API key as the `api_key` query parameter, is logged with the key
//! redacted, and is retried on connection failures and retryable statuses.
//! Endpoint wrappers live in the resource submodules:
//! - `files`: media files and their sources
//! - `transcripts`: transcript lookup, text, cancellation and redelivery
//! - `orders`: transcription, ASR, translation and audio description orders
//! - `audio_descriptions`: audio description listing and assets
//! - `catalog`: languages, turnaround levels, integrations and translation options

mod audio_descriptions;
mod catalog;
mod files;
mod orders;
mod transcripts;

use std::time::{Duration, Instant};

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use audio_descriptions::AudioDescriptionFilter;
pub use catalog::{LanguageFilter, TranslationOptionFilter};
pub use files::MediaFileFilter;
pub use orders::OrderOptions;
pub use transcripts::{TextOptions, TranscriptFilter};

use crate::config::Config;
use crate::error::{Result, ThreePlayError};
use crate::models::Pagination;

/// Default page size for list endpoints.
pub const DEFAULT_PER_PAGE: u32 = 100;

/// Query parameters that are never written to the logs.
const REDACTED_PARAMS: &[&str] = &["api_key", "callback"];

/// Query parameters for a request, in insertion order. Keys may repeat (`clips[]`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, builder style.
    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: &str, value: impl ToString) {
        self.0.push((key.to_string(), value.to_string()));
    }

    /// Adds a parameter only when a non-empty value is present.
    pub fn push_opt<T: ToString>(&mut self, key: &str, value: Option<T>) {
        if let Some(value) = value {
            let value = value.to_string();
            if !value.is_empty() {
                self.0.push((key.to_string(), value));
            }
        }
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All values for a repeated key.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// JSON rendering for log lines, without credentials or callback URLs.
    fn for_log(&self) -> String {
        let mut map = serde_json::Map::new();
        for (key, value) in self.iter() {
            if REDACTED_PARAMS.contains(&key) {
                continue;
            }
            let value = Value::String(value.to_string());
            match map.get_mut(key) {
                Some(Value::Array(values)) => values.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    map.insert(key.to_string(), value);
                }
            }
        }
        Value::Object(map).to_string()
    }
}

/// Selects a resource either by the integrated platform's video id or by its 3Play id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRef {
    /// Resolve through the most recent record for this video id
    Video(String),
    /// Use this 3Play id directly
    Id(u64),
}

/// SRT contents uploaded as `captions.srt`.
#[derive(Debug, Clone)]
pub(crate) struct CaptionUpload {
    pub contents: String,
}

/// Per-request options beyond method, path and params.
#[derive(Debug, Clone, Default)]
pub(crate) struct RequestOptions {
    pub timeout: Option<Duration>,
    pub upload: Option<CaptionUpload>,
}

/// Helper to make requests to the 3Play Media API.
#[derive(Debug, Clone)]
pub struct ThreePlayApi {
    client: reqwest::Client,
    config: Config,
}

impl ThreePlayApi {
    /// Creates a client for the given configuration.
    ///
    /// A missing API key is not an error here; each request checks for it.
    ///
    /// # Errors
    /// - If the HTTP client cannot be constructed
    pub fn new(config: Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .connect_timeout(Duration::from_secs(config.http.connect_timeout_secs))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| ThreePlayError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Creates a client from `configure`, the environment and the config file.
    pub fn from_env() -> Result<Self> {
        Self::new(Config::load()?)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Convenience accessor for the higher-level helpers.
    pub fn helper(&self) -> crate::helper::ThreePlayHelper<'_> {
        crate::helper::ThreePlayHelper::new(self)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path.trim_start_matches('/'))
    }

    /// Builds a request with the API key attached, without sending it.
    ///
    /// # Errors
    /// - `MissingApiKey` if no key is configured
    /// - `Request` if the URL or parameters are invalid
    pub fn build_request(&self, method: Method, path: &str, params: &Params) -> Result<reqwest::Request> {
        self.build(&method, path, params, &RequestOptions::default())
    }

    fn build(
        &self,
        method: &Method,
        path: &str,
        params: &Params,
        options: &RequestOptions,
    ) -> Result<reqwest::Request> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(ThreePlayError::MissingApiKey)?;

        let mut query: Vec<(&str, &str)> = Vec::with_capacity(params.0.len() + 1);
        query.push(("api_key", api_key));
        query.extend(params.iter().filter(|(k, _)| *k != "api_key"));

        let mut builder = self
            .client
            .request(method.clone(), self.url(path))
            .query(&query);

        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(upload) = &options.upload {
            let part = reqwest::multipart::Part::text(upload.contents.clone())
                .file_name("captions.srt")
                .mime_str("application/x-subrip")
                .map_err(|e| request_error(method, path, e))?;
            builder = builder.multipart(reqwest::multipart::Form::new().part("caption_file", part));
        }

        builder.build().map_err(|e| request_error(method, path, e))
    }

    /// Sends a request, retrying connection failures and retryable statuses.
    ///
    /// Non-success responses become `Http` errors after logging the body.
    async fn send(
        &self,
        method: &Method,
        path: &str,
        params: &Params,
        options: &RequestOptions,
    ) -> Result<reqwest::Response> {
        let http = &self.config.http;
        let mut attempt: u32 = 0;
        let mut delay = Duration::from_millis(http.backoff_ms);

        loop {
            let request = self.build(method, path, params, options)?;
            let start = Instant::now();

            match self.client.execute(request).await {
                Ok(response) => {
                    let status = response.status();
                    if attempt < http.max_retries && http.retry_statuses.contains(&status.as_u16()) {
                        attempt += 1;
                        tracing::warn!(
                            "{} /{} returned {}; retrying ({}/{}) in {:?}",
                            method, path, status, attempt, http.max_retries, delay
                        );
                        tokio::time::sleep(delay).await;
                        delay = next_backoff(delay);
                        continue;
                    }
                    return self.handle_response(method, path, params, response, start.elapsed()).await;
                }
                Err(e) => {
                    if e.is_connect() && attempt < http.max_retries {
                        attempt += 1;
                        tracing::warn!(
                            "{} /{} failed to connect; retrying ({}/{}) in {:?}",
                            method, path, attempt, http.max_retries, delay
                        );
                        tokio::time::sleep(delay).await;
                        delay = next_backoff(delay);
                        continue;
                    }

                    let kind = if e.is_timeout() {
                        "timeout"
                    } else if e.is_connect() {
                        "connect"
                    } else {
                        "request"
                    };
                    tracing::warn!(
                        "[{:?}] {} /{}, params={}, error={}",
                        start.elapsed(),
                        method,
                        path,
                        params.for_log(),
                        kind
                    );
                    return Err(request_error(method, path, e));
                }
            }
        }
    }

    async fn handle_response(
        &self,
        method: &Method,
        path: &str,
        params: &Params,
        response: reqwest::Response,
        elapsed: Duration,
    ) -> Result<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            tracing::info!(
                "[{:?}] {} /{}, params={}, status={}",
                elapsed,
                method,
                path,
                params.for_log(),
                status.as_u16()
            );
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        tracing::error!(
            "[{:?}] {} /{}, params={}, status={}, reason={}, response={}",
            elapsed,
            method,
            path,
            params.for_log(),
            status.as_u16(),
            status.canonical_reason().unwrap_or("unknown"),
            body
        );

        Err(ThreePlayError::Http {
            method: method.to_string(),
            path: path.to_string(),
            status,
            body,
        })
    }

    /// Requests a single page and parses the JSON body.
    async fn request_page(
        &self,
        method: &Method,
        path: &str,
        params: &Params,
        page: Option<u64>,
        options: &RequestOptions,
    ) -> Result<Value> {
        let paged;
        let params = match page {
            Some(page) => {
                paged = params.clone().with("page", page);
                &paged
            }
            None => params,
        };

        let response = self.send(method, path, params, options).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| request_error(method, path, e))?;

        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Makes a request and returns the parsed JSON body.
    ///
    /// When the response is paginated, the remaining pages are requested in
    /// order and their `data` appended to the first page. A page that fails is
    /// logged and skipped.
    ///
    /// # Errors
    /// - `MissingApiKey` if no key is configured
    /// - `Request` for connection errors and timeouts
    /// - `Http` for 4xx and 5xx responses
    /// - `Decode` if the body is not JSON
    pub async fn request(&self, method: Method, path: &str, params: &Params) -> Result<Value> {
        self.request_with(method, path, params, &RequestOptions::default())
            .await
    }

    pub(crate) async fn request_with(
        &self,
        method: Method,
        path: &str,
        params: &Params,
        options: &RequestOptions,
    ) -> Result<Value> {
        let mut body = self.request_page(&method, path, params, None, options).await?;

        let Some(pagination) = pagination_of(&body) else {
            return Ok(body);
        };

        let pages = pagination.page_count();
        for page in 2..=pages {
            match self
                .request_page(&method, path, params, Some(page), options)
                .await
            {
                Ok(page_body) => merge_page_data(&mut body, page_body),
                Err(e) => {
                    tracing::error!("Page {} generated an exception: ({}) {}", page, e.code(), e);
                }
            }
        }

        Ok(body)
    }

    /// GET request, see [`ThreePlayApi::request`].
    pub async fn get(&self, path: &str, params: &Params) -> Result<Value> {
        self.request(Method::GET, path, params).await
    }

    /// POST request, see [`ThreePlayApi::request`].
    pub async fn post(&self, path: &str, params: &Params) -> Result<Value> {
        self.request(Method::POST, path, params).await
    }

    /// Downloads raw bytes from an absolute URL, e.g. a signed asset link.
    ///
    /// The API key is not attached, since these links are not API endpoints.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let start = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| request_error(&Method::GET, url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("[{:?}] GET {}, status={}", start.elapsed(), url, status.as_u16());
            return Err(ThreePlayError::Http {
                method: "GET".to_string(),
                path: url.to_string(),
                status,
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| request_error(&Method::GET, url, e))?;
        tracing::info!("[{:?}] GET {}, {} bytes", start.elapsed(), url, bytes.len());
        Ok(bytes.to_vec())
    }
}

/// Retry delay after `delay`, doubled and capped at `Duration::MAX`.
fn next_backoff(delay: Duration) -> Duration {
    delay.saturating_mul(2)
}

fn request_error(method: &Method, path: &str, source: reqwest::Error) -> ThreePlayError {
    ThreePlayError::Request {
        method: method.to_string(),
        path: path.to_string(),
        source,
    }
}

/// Parses the `pagination` block of a response body, if any.
fn pagination_of(body: &Value) -> Option<Pagination> {
    body.get("pagination")
        .and_then(|p| serde_json::from_value::<Pagination>(p.clone()).ok())
}

/// Appends the `data` array of a later page to the first page's `data`.
fn merge_page_data(body: &mut Value, mut page_body: Value) {
    let page_data = match page_body.get_mut("data").map(Value::take) {
        Some(Value::Array(items)) => items,
        _ => return,
    };

    match body.get_mut("data") {
        Some(Value::Array(items)) => items.extend(page_data),
        Some(slot) if slot.is_null() => *slot = Value::Array(page_data),
        _ => {}
    }
}

/// Decodes the `data` field of a response body.
pub(crate) fn data_of<T: DeserializeOwned>(mut body: Value) -> Result<T> {
    let data = body.get_mut("data").map(Value::take).unwrap_or(Value::Null);
    Ok(serde_json::from_value(data)?)
}

/// Maps an order attempt onto the boolean the order endpoints report.
///
/// `already_status` is the status 3Play uses for "already ordered", which
/// counts as success. Any other HTTP or transport failure means the order
/// should be retried later and yields `false`.
pub(crate) fn order_outcome(
    result: Result<Value>,
    already_status: StatusCode,
    what: &str,
    media_file_id: u64,
) -> Result<bool> {
    match result {
        Ok(_) => Ok(true),
        Err(ThreePlayError::Http { status, .. }) if status == already_status => {
            tracing::warn!("{} already exists for media file: {}", what, media_file_id);
            Ok(true)
        }
        Err(e @ (ThreePlayError::Http { .. } | ThreePlayError::Request { .. })) => {
            tracing::warn!("{} order for media file {} failed: {}", what, media_file_id, e);
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn api(key: Option<&str>) -> ThreePlayApi {
        let config = Config {
            api_key: key.map(str::to_string),
            ..Config::default()
        };
        ThreePlayApi::new(config).unwrap()
    }

    #[test]
    fn test_params_skip_empty_values() {
        let mut params = Params::new();
        params.push_opt("name", Some("Testing"));
        params.push_opt("attribute1", Some(""));
        params.push_opt::<&str>("attribute2", None);
        params.push("per_page", 100);

        assert_eq!(params.get("name"), Some("Testing"));
        assert_eq!(params.get("attribute1"), None);
        assert_eq!(params.get("attribute2"), None);
        assert_eq!(params.get("per_page"), Some("100"));
    }

    #[test]
    fn test_request_carries_configured_key() {
        let api = api(Some("secret-key"));
        let params = Params::new().with("name_cont", "Testing");
        let request = api.build_request(Method::GET, "/files", &params).unwrap();

        assert_eq!(request.url().path(), "/v3/files");
        let pairs: Vec<(String, String)> = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(pairs[0], ("api_key".to_string(), "secret-key".to_string()));
        assert!(pairs.contains(&("name_cont".to_string(), "Testing".to_string())));
    }

    #[test]
    fn test_configure_sets_and_replaces_key() {
        let key_sent = |api: &ThreePlayApi| {
            let request = api.build_request(Method::GET, "files", &Params::new()).unwrap();
            request
                .url()
                .query_pairs()
                .find(|(k, _)| k == "api_key")
                .map(|(_, v)| v.into_owned())
        };
        let resolve = || Config::resolve(crate::config::configured_api_key(), |_| None, None);

        crate::config::configure("key-a");
        let first = ThreePlayApi::new(resolve()).unwrap();
        assert_eq!(key_sent(&first).as_deref(), Some("key-a"));

        crate::config::configure("key-b");
        let second = ThreePlayApi::new(resolve()).unwrap();
        assert_eq!(key_sent(&second).as_deref(), Some("key-b"));
        // Clients keep the key they were built with.
        assert_eq!(key_sent(&first).as_deref(), Some("key-a"));
    }

    #[test]
    fn test_request_key_cannot_be_overridden_by_params() {
        let api = api(Some("secret-key"));
        let params = Params::new().with("api_key", "other");
        let request = api.build_request(Method::GET, "files", &params).unwrap();
        let keys: Vec<String> = request
            .url()
            .query_pairs()
            .filter(|(k, _)| k == "api_key")
            .map(|(_, v)| v.into_owned())
            .collect();
        assert_eq!(keys, vec!["secret-key".to_string()]);
    }

    #[test]
    fn test_missing_key_fails_before_sending() {
        let api = api(None);
        let err = api
            .build_request(Method::GET, "files", &Params::new())
            .unwrap_err();
        assert!(matches!(err, ThreePlayError::MissingApiKey));
    }

    #[test]
    fn test_repeated_params_kept() {
        let api = api(Some("k"));
        let params = Params::new()
            .with("clips[]", "0,10500")
            .with("clips[]", "21060,28140");
        let request = api.build_request(Method::GET, "transcripts/1/text", &params).unwrap();
        let clips: Vec<String> = request
            .url()
            .query_pairs()
            .filter(|(k, _)| k == "clips[]")
            .map(|(_, v)| v.into_owned())
            .collect();
        assert_eq!(clips, vec!["0,10500", "21060,28140"]);
    }

    #[test]
    fn test_log_params_are_redacted() {
        let params = Params::new()
            .with("api_key", "secret")
            .with("callback", "https://example.com/hook?api_key=secret")
            .with("clips[]", "a")
            .with("clips[]", "b")
            .with("name", "Demo");
        let logged = params.for_log();
        assert!(!logged.contains("secret"));
        let value: Value = serde_json::from_str(&logged).unwrap();
        assert_eq!(value, json!({"clips[]": ["a", "b"], "name": "Demo"}));
    }

    #[test]
    fn test_merge_page_data() {
        let mut body = json!({
            "data": [{"id": 1}, {"id": 2}],
            "pagination": {"per_page": 2, "total_entries": 5, "current_page": 1}
        });
        merge_page_data(&mut body, json!({"data": [{"id": 3}, {"id": 4}]}));
        merge_page_data(&mut body, json!({"data": null}));
        merge_page_data(&mut body, json!({"data": [{"id": 5}]}));

        let ids: Vec<u64> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(pagination_of(&body).unwrap().page_count(), 3);
    }

    #[test]
    fn test_order_outcome() {
        let http = |code: u16| ThreePlayError::Http {
            method: "POST".to_string(),
            path: "transcripts/order/asr".to_string(),
            status: StatusCode::from_u16(code).unwrap(),
            body: String::new(),
        };

        assert!(order_outcome(Ok(Value::Null), StatusCode::BAD_REQUEST, "ASR", 1).unwrap());
        assert!(order_outcome(Err(http(400)), StatusCode::BAD_REQUEST, "ASR", 1).unwrap());
        assert!(!order_outcome(Err(http(503)), StatusCode::BAD_REQUEST, "ASR", 1).unwrap());
        assert!(!order_outcome(Err(http(400)), StatusCode::FORBIDDEN, "AD", 1).unwrap());
        assert!(order_outcome(
            Err(ThreePlayError::MissingApiKey),
            StatusCode::BAD_REQUEST,
            "ASR",
            1
        )
        .is_err());
    }

    #[test]
    fn test_next_backoff_doubles_and_saturates() {
        assert_eq!(next_backoff(Duration::from_millis(500)), Duration::from_secs(1));
        assert_eq!(next_backoff(Duration::MAX), Duration::MAX);

        let mut delay = Duration::from_millis(500);
        for _ in 0..200 {
            delay = next_backoff(delay);
        }
        assert_eq!(delay, Duration::MAX);
    }

    #[test]
    fn test_data_of() {
        let ids: Vec<u64> = data_of(json!({"data": [1, 2, 3]})).unwrap();
        assert_eq!(ids, vec![1, 2, 3]);
        let missing: Option<String> = data_of(json!({})).unwrap();
        assert!(missing.is_none());
    }
}
