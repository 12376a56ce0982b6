//! Typed wrapper around the 3Play Media REST API (v3).
//!
//! ```no_run
//! # async fn demo() -> three_play::Result<()> {
//! use three_play::{MediaFileFilter, ThreePlayApi};
//!
//! three_play::configure("my-api-key");
//! let api = ThreePlayApi::from_env()?;
//!
//! let files = api.list_media_files(&MediaFileFilter::name_partial("Testing")).await?;
//! for file in files.data {
//!     println!("{} {}", file.id, file.name);
//! }
//!
//! let latest = api.helper().get_latest_media_file("abc123").await?;
//! println!("{}", three_play::MediaFile::url(latest.id));
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod helper;
pub mod models;
pub mod srt;

pub use api::{
    AudioDescriptionFilter, LanguageFilter, MediaFileFilter, OrderOptions, Params, ResourceRef, TextOptions,
    ThreePlayApi, TranscriptFilter, TranslationOptionFilter,
};
pub use config::{configure, Config};
pub use error::{Result, ThreePlayError};
pub use helper::ThreePlayHelper;
pub use models::{
    ApiResponse, AudioDescription, Language, MediaFile, NewMediaFile, Pagination, Transcript, TranscriptFormat,
    TranscriptStatus, TranslationOption, Turnaround, TurnaroundAd, TurnaroundLevel,
};
