//! Account catalog commands: languages, turnaround levels and integrations.

use serde_json::json;
use three_play::{LanguageFilter, ThreePlayApi, Turnaround, TurnaroundAd, TurnaroundLevel};

use super::print_json;

pub async fn handle_languages(api: &ThreePlayApi, name_partial: Option<String>) -> anyhow::Result<()> {
    let filter = LanguageFilter {
        name_partial,
        ..LanguageFilter::default()
    };
    let languages = api.list_languages(&filter).await?;
    print_json(&languages)
}

/// Prints turnaround levels, from 3Play or from the built-in table.
pub async fn handle_turnarounds(api: &ThreePlayApi, show_prices: bool, local: bool) -> anyhow::Result<()> {
    if local {
        return print_json(&json!({
            "transcription": levels_json::<Turnaround>(show_prices),
            "audio_description": levels_json::<TurnaroundAd>(show_prices),
        }));
    }
    let levels = api.list_turnaround_levels(show_prices).await?;
    print_json(&levels)
}

pub async fn handle_integrations(api: &ThreePlayApi) -> anyhow::Result<()> {
    let integrations = api.list_platform_integrations().await?;
    print_json(&integrations)
}

/// Built-in levels, fastest first.
fn levels_json<T: TurnaroundLevel>(show_prices: bool) -> Vec<serde_json::Value> {
    T::sort_by_hours(false)
        .into_iter()
        .map(|level| {
            let mut value = json!({
                "id": level.id(),
                "name": level.title(),
                "hours": level.hours(),
            });
            if show_prices {
                value["price_rate"] = json!(level.price_rate());
            }
            value
        })
        .collect()
}
