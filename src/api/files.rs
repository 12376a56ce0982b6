//! Media file endpoints.

use serde_json::Value;

use super::{data_of, Params, ThreePlayApi, DEFAULT_PER_PAGE};
use crate::error::Result;
use crate::models::{ApiResponse, MediaFile, NewMediaFile};

/// Filters for [`ThreePlayApi::list_media_files`]. Unset fields are not sent.
#[derive(Debug, Clone, Default)]
pub struct MediaFileFilter {
    /// Exact name match
    pub name: Option<String>,
    /// Substring match on the name (`name_cont`)
    pub name_partial: Option<String>,
    /// Integrated platform video id (`reference_id`)
    pub video_id: Option<String>,
    pub attribute1: Option<String>,
    pub attribute2: Option<String>,
    pub attribute3: Option<String>,
    /// Defaults to 100
    pub per_page: Option<u32>,
    pub sort_by_created: bool,
    /// Only applies together with `sort_by_created`
    pub latest_first: bool,
}

impl MediaFileFilter {
    pub fn name_partial(name_partial: impl Into<String>) -> Self {
        Self {
            name_partial: Some(name_partial.into()),
            ..Self::default()
        }
    }

    pub fn video_id(video_id: impl Into<String>) -> Self {
        Self {
            video_id: Some(video_id.into()),
            ..Self::default()
        }
    }

    pub fn to_params(&self) -> Params {
        let mut params = Params::new().with("per_page", self.per_page.unwrap_or(DEFAULT_PER_PAGE));
        params.push_opt("name", self.name.as_deref());
        params.push_opt("name_cont", self.name_partial.as_deref());
        params.push_opt("attribute1", self.attribute1.as_deref());
        params.push_opt("attribute2", self.attribute2.as_deref());
        params.push_opt("attribute3", self.attribute3.as_deref());
        params.push_opt("reference_id", self.video_id.as_deref());
        if self.sort_by_created {
            params.push("sort_by", "created_at");
            if self.latest_first {
                params.push("sort_dir", "desc");
            }
        }
        params
    }
}

impl ThreePlayApi {
    /// Lists media files matching the filter, across all pages.
    ///
    /// Filters are passed to 3Play unmodified; matching happens server-side.
    pub async fn list_media_files(&self, filter: &MediaFileFilter) -> Result<ApiResponse<Vec<MediaFile>>> {
        let body = self.get("files", &filter.to_params()).await?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn get_media_file(&self, media_file_id: u64) -> Result<MediaFile> {
        let body = self.get(&format!("files/{media_file_id}"), &Params::new()).await?;
        data_of(body)
    }

    /// Creates a media file referencing a video on the integrated platform.
    ///
    /// Transcripts can then be ordered on the returned media file id.
    pub async fn create_media_file(&self, new_file: &NewMediaFile) -> Result<u64> {
        let name = new_file
            .file_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&new_file.video_name);
        let integration_id = new_file
            .integration_id
            .as_deref()
            .or(self.config().integration_id.as_deref());

        let mut params = Params::new()
            .with("language_id", new_file.language.id())
            .with("name", name);
        params.push_opt("attribute1", new_file.attribute1.as_deref());
        params.push_opt("attribute2", new_file.attribute2.as_deref());
        params.push_opt("attribute3", new_file.attribute3.as_deref());
        params.push_opt("label", Some(new_file.label_param()));
        params.push("reference_id", &new_file.video_id);
        params.push_opt("integration_id", integration_id);

        let body = self.post("files", &params).await?;
        let created: CreatedFile = data_of(body)?;

        tracing::info!(
            "Created media file {} for video {}",
            created.id,
            new_file.video_id
        );
        Ok(created.id)
    }

    /// Archives one or more media files; returns whether 3Play reported success.
    pub async fn archive_media_files(&self, media_file_ids: &[u64]) -> Result<bool> {
        let ids = media_file_ids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let body = self
            .post("files/archive", &Params::new().with("media_file_id", ids))
            .await?;

        Ok(body["data"]["success"].as_bool() == Some(true))
    }

    /// The media source (e.g. a video URL) of a file, if one is set.
    pub async fn get_source(&self, media_file_id: u64) -> Result<Option<String>> {
        let body = self.get(&format!("files/{media_file_id}"), &Params::new()).await?;
        Ok(body["data"]["source"].as_str().map(str::to_string))
    }

    pub async fn set_source_url(&self, media_file_id: u64, source_url: &str) -> Result<Value> {
        self.post(
            &format!("files/{media_file_id}/source/set_url"),
            &Params::new().with("source_url", source_url),
        )
        .await
    }

    pub async fn delete_source(&self, media_file_id: u64) -> Result<Value> {
        self.request(
            reqwest::Method::DELETE,
            &format!("files/{media_file_id}/source"),
            &Params::new(),
        )
        .await
    }
}

#[derive(Debug, serde::Deserialize)]
struct CreatedFile {
    id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_partial_passed_through() {
        let params = MediaFileFilter::name_partial("Testing").to_params();
        assert_eq!(params.get("name_cont"), Some("Testing"));
        assert_eq!(params.get("name"), None);
        assert_eq!(params.get("per_page"), Some("100"));
        assert_eq!(params.get("sort_by"), None);
    }

    #[test]
    fn test_latest_first_needs_sort() {
        let filter = MediaFileFilter {
            latest_first: true,
            ..MediaFileFilter::video_id("abc123")
        };
        let params = filter.to_params();
        assert_eq!(params.get("reference_id"), Some("abc123"));
        assert_eq!(params.get("sort_dir"), None);

        let filter = MediaFileFilter {
            sort_by_created: true,
            latest_first: true,
            per_page: Some(5),
            ..MediaFileFilter::video_id("abc123")
        };
        let params = filter.to_params();
        assert_eq!(params.get("sort_by"), Some("created_at"));
        assert_eq!(params.get("sort_dir"), Some("desc"));
        assert_eq!(params.get("per_page"), Some("5"));
    }
}
