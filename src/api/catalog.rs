//! Account-level lists: integrations, turnaround levels, languages and
//! translation options. Returned as raw JSON since 3Play's shapes vary.

use serde_json::Value;

use super::{Params, ThreePlayApi};
use crate::error::Result;
use crate::models::Language;

#[derive(Debug, Clone, Default)]
pub struct LanguageFilter {
    pub ids: Vec<i64>,
    pub name: Option<String>,
    /// Sent as `name_cont`
    pub name_partial: Option<String>,
}

impl LanguageFilter {
    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        if !self.ids.is_empty() {
            params.push(
                "id",
                self.ids
                    .iter()
                    .map(i64::to_string)
                    .collect::<Vec<_>>()
                    .join(","),
            );
        }
        params.push_opt("name", self.name.as_deref());
        params.push_opt("name_cont", self.name_partial.as_deref());
        params
    }
}

#[derive(Debug, Clone, Default)]
pub struct TranslationOptionFilter {
    pub source: Option<Language>,
    pub target: Option<Language>,
    pub vendor_name: Option<String>,
    /// Sent as `vendor_name_cont`
    pub vendor_name_partial: Option<String>,
}

impl TranslationOptionFilter {
    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        params.push_opt("source_language_id", self.source.map(Language::id));
        params.push_opt("target_language_id", self.target.map(Language::id));
        params.push_opt("vendor_name", self.vendor_name.as_deref());
        params.push_opt("vendor_name_cont", self.vendor_name_partial.as_deref());
        params
    }
}

impl ThreePlayApi {
    pub async fn list_platform_integrations(&self) -> Result<Value> {
        self.get("video_platform_integrations", &Params::new()).await
    }

    pub async fn list_turnaround_levels(&self, show_prices: bool) -> Result<Value> {
        self.get("turnaround_levels", &Params::new().with("prices", show_prices))
            .await
    }

    /// Language records; an empty list when 3Play returns no `data`.
    pub async fn list_languages(&self, filter: &LanguageFilter) -> Result<Vec<Value>> {
        let body = self.get("languages", &filter.to_params()).await?;
        Ok(match body.get("data") {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        })
    }

    pub async fn list_translation_options(&self, filter: &TranslationOptionFilter) -> Result<Value> {
        self.get("translation_service_options", &filter.to_params())
            .await
    }
}
