//! Error types for the 3Play client.
//!
//! Every fallible library call returns [`Result`]. Transport failures, non-success
//! HTTP statuses and undecodable payloads are surfaced unchanged; the remaining
//! variants describe lookups that the helpers could not satisfy.

use reqwest::StatusCode;

/// Errors raised while talking to the 3Play API.
#[derive(Debug, thiserror::Error)]
pub enum ThreePlayError {
    /// No API key was configured, set in the environment, or found in the config file.
    #[error("No 3Play API key configured. Set 3PLAY_API_KEY or call `configure` first")]
    MissingApiKey,

    /// The request could not be sent or no response was received.
    #[error("Request to 3Play failed ({method} /{path}): {source}")]
    Request {
        method: String,
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a 4xx or 5xx status.
    #[error("3Play API error (status {status}) for {method} /{path}: {body}")]
    Http {
        method: String,
        path: String,
        status: StatusCode,
        body: String,
    },

    /// The response body was not the JSON shape we expected.
    #[error("Failed to parse 3Play response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("No valid media file exist for the video. video_id={video_id}")]
    NoSuchMediaFile { video_id: String },

    #[error("{}", no_such_transcript_message(.video_id, .has_lang_input))]
    NoSuchTranscript {
        video_id: String,
        has_lang_input: bool,
    },

    #[error("Invalid language id for transcript (language_id={language_id}, transcript_id={transcript_id})")]
    InvalidLanguageId {
        language_id: i64,
        transcript_id: u64,
    },

    #[error("Invalid or missing source language ({0})")]
    InvalidSourceLanguage(String),

    #[error("{0} is not a valid turnaround level")]
    InvalidTurnaround(String),

    #[error("No translation option from {source_language} to {target_language}")]
    NoTranslationOption {
        source_language: String,
        target_language: String,
    },

    #[error("Invalid caption timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("The Audio Description is still in progress for the video. video_id={video_id}")]
    AdIsNotComplete { video_id: String },

    /// The configuration file or an override could not be used.
    #[error("Configuration error: {0}")]
    Config(String),
}

fn no_such_transcript_message(video_id: &str, has_lang_input: &bool) -> String {
    let mut msg = String::from("No valid transcripts exist for the video.");
    if *has_lang_input {
        msg.push_str(" Please specify the transcript source language in the request.");
    }
    format!("{msg} video_id={video_id}")
}

impl ThreePlayError {
    /// Short machine-readable name for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingApiKey => "MissingApiKey",
            Self::Request { .. } => "RequestFailed",
            Self::Http { .. } => "HttpError",
            Self::Decode(_) => "DecodeError",
            Self::NoSuchMediaFile { .. } => "NoSuchMediaFile",
            Self::NoSuchTranscript { .. } => "NoSuchTranscript",
            Self::InvalidLanguageId { .. } => "InvalidLanguageId",
            Self::InvalidSourceLanguage(_) => "InvalidSourceLanguage",
            Self::InvalidTurnaround(_) => "InvalidTurnaround",
            Self::NoTranslationOption { .. } => "NoTranslationOption",
            Self::InvalidTimestamp(_) => "InvalidTimestamp",
            Self::AdIsNotComplete { .. } => "ADIsNotComplete",
            Self::Config(_) => "ConfigError",
        }
    }

    /// True when the requested resource does not exist, either locally
    /// determined by a helper or reported by the API as a 404.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NoSuchMediaFile { .. } | Self::NoSuchTranscript { .. } => true,
            Self::Http { status, .. } => *status == StatusCode::NOT_FOUND,
            _ => false,
        }
    }

    /// HTTP status returned by the API, if this error carries one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Request { source, .. } => source.status(),
            _ => None,
        }
    }
}

/// Convenience alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, ThreePlayError>;
