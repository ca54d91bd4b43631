use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::{run_timed, LookupInput, ProviderAdapter};
use crate::types::AdapterOutcome;

#[derive(Debug, Deserialize)]
struct FbiWantedResponse {
    #[serde(default)]
    items: Vec<FbiWantedItem>,
}

#[derive(Debug, Deserialize)]
struct FbiWantedItem {
    title: String,
    uid: Option<String>,
    #[serde(default)]
    nationality: Option<String>,
    images: Option<Vec<FbiImage>>,
}

#[derive(Debug, Deserialize)]
struct FbiImage {
    original: Option<String>,
}

/// `watchlist.fbi` (spec.md §4.2): FBI Most Wanted public API, no
/// credential required. The upstream API only supports free-text title
/// search, so matches are narrowed client-side to name parts longer than
/// two characters.
pub struct FbiWatchlistAdapter {
    base_url: String,
}

impl FbiWatchlistAdapter {
    pub fn new() -> Self {
        Self {
            base_url: "https://api.fbi.gov/wanted/v1/list".to_string(),
        }
    }
}

impl Default for FbiWatchlistAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderAdapter for FbiWatchlistAdapter {
    fn name(&self) -> &'static str {
        "watchlist.fbi"
    }

    fn applies_to(&self, input: &LookupInput) -> bool {
        input.full_name().is_some()
    }

    async fn lookup(
        &self,
        input: &LookupInput,
        client: &reqwest::Client,
        timeout: Duration,
    ) -> AdapterOutcome {
        let Some(full_name) = input.full_name() else {
            return AdapterOutcome::not_configured(self.name());
        };

        let url = self.base_url.clone();
        let client = client.clone();
        let name_parts: Vec<String> = full_name
            .split_whitespace()
            .filter(|part| part.len() > 2)
            .map(|part| part.to_lowercase())
            .collect();

        run_timed(self.name(), timeout, async move {
            let response = client
                .get(&url)
                .query(&[("title", full_name.as_str())])
                .send()
                .await
                .map_err(|e| e.to_string())?;
            if !response.status().is_success() {
                return Err(format!("upstream status {}", response.status()));
            }
            let parsed: FbiWantedResponse = response.json().await.map_err(|e| e.to_string())?;
            let matches: Vec<_> = parsed
                .items
                .into_iter()
                .filter(|item| {
                    let title_lower = item.title.to_lowercase();
                    name_parts.iter().any(|part| title_lower.contains(part.as_str()))
                })
                .map(|item| {
                    json!({
                        "uid": item.uid,
                        "title": item.title,
                        "nationality": item.nationality,
                        "photo": item.images.and_then(|imgs| imgs.into_iter().next()).and_then(|i| i.original),
                    })
                })
                .collect();
            Ok(json!({ "matches": matches }))
        })
        .await
    }
}
