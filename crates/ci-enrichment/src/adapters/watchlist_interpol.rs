use async_trait::async_trait;
use chrono::Datelike;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::{run_timed, LookupInput, ProviderAdapter};
use crate::types::AdapterOutcome;

#[derive(Debug, Deserialize)]
struct InterpolResponse {
    #[serde(rename = "_embedded", default)]
    embedded: InterpolEmbedded,
}

#[derive(Debug, Default, Deserialize)]
struct InterpolEmbedded {
    #[serde(default)]
    notices: Vec<InterpolNotice>,
}

#[derive(Debug, Deserialize)]
struct InterpolNotice {
    entity_id: String,
    forename: Option<String>,
    name: Option<String>,
    #[serde(default)]
    nationalities: Vec<String>,
    #[serde(default)]
    charges: Option<Vec<String>>,
    #[serde(default, rename = "_links")]
    links: InterpolLinks,
}

#[derive(Debug, Default, Deserialize)]
struct InterpolLinks {
    #[serde(rename = "thumbnail")]
    thumbnail: Option<InterpolLink>,
}

#[derive(Debug, Deserialize)]
struct InterpolLink {
    href: Option<String>,
}

/// `watchlist.interpol` (spec.md §4.2): INTERPOL Red Notices public API,
/// no credential required. Queries by name and nationality, with an
/// age window of plus-or-minus five years derived from date of birth.
pub struct InterpolAdapter {
    base_url: String,
}

impl InterpolAdapter {
    pub fn new() -> Self {
        Self {
            base_url: "https://ws-public.interpol.int/notices/v1/red".to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/intelligence/interpol/:entityId` (spec.md §6): proxies a
    /// single notice's full detail by its INTERPOL entity id.
    pub async fn entity_details(
        &self,
        entity_id: &str,
        client: &reqwest::Client,
        timeout: Duration,
    ) -> AdapterOutcome {
        let url = format!("{}/{entity_id}", self.base_url);
        let client = client.clone();
        run_timed(self.name(), timeout, async move {
            let response = client.get(&url).send().await.map_err(|e| e.to_string())?;
            if response.status() == reqwest::StatusCode::NOT_FOUND {
                return Err("entity not found".to_string());
            }
            if !response.status().is_success() {
                return Err(format!("upstream status {}", response.status()));
            }
            response.json::<serde_json::Value>().await.map_err(|e| e.to_string())
        })
        .await
    }
}

impl Default for InterpolAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderAdapter for InterpolAdapter {
    fn name(&self) -> &'static str {
        "watchlist.interpol"
    }

    fn applies_to(&self, input: &LookupInput) -> bool {
        input.first_name.is_some() || input.last_name.is_some()
    }

    async fn lookup(
        &self,
        input: &LookupInput,
        client: &reqwest::Client,
        timeout: Duration,
    ) -> AdapterOutcome {
        if !self.applies_to(input) {
            return AdapterOutcome::not_configured(self.name());
        }

        let url = self.base_url.clone();
        let client = client.clone();
        let forename = input.first_name.clone();
        let name = input.last_name.clone();
        let nationality = input.nationality.clone();
        let dob = input.date_of_birth;

        run_timed(self.name(), timeout, async move {
            let mut query: Vec<(&str, String)> = Vec::new();
            if let Some(forename) = &forename {
                query.push(("forename", forename.clone()));
            }
            if let Some(name) = &name {
                query.push(("name", name.clone()));
            }
            if let Some(nationality) = &nationality {
                query.push(("nationality", nationality.clone()));
            }
            if let Some(dob) = dob {
                let age = current_age(dob);
                query.push(("ageMin", (age.saturating_sub(5)).to_string()));
                query.push(("ageMax", (age + 5).to_string()));
            }

            let response = client
                .get(&url)
                .query(&query)
                .send()
                .await
                .map_err(|e| e.to_string())?;
            if !response.status().is_success() {
                return Err(format!("upstream status {}", response.status()));
            }
            let parsed: InterpolResponse = response.json().await.map_err(|e| e.to_string())?;
            let matches: Vec<_> = parsed
                .embedded
                .notices
                .into_iter()
                .map(|notice| {
                    json!({
                        "entity_id": notice.entity_id,
                        "name": format!(
                            "{} {}",
                            notice.forename.unwrap_or_default(),
                            notice.name.unwrap_or_default()
                        )
                        .trim()
                        .to_string(),
                        "nationalities": notice.nationalities,
                        "charges": notice.charges.unwrap_or_default(),
                        "photo": notice.links.thumbnail.and_then(|t| t.href),
                    })
                })
                .collect();
            Ok(json!({ "matches": matches }))
        })
        .await
    }
}

fn current_age(date_of_birth: chrono::NaiveDate) -> u32 {
    let today = chrono::Utc::now().date_naive();
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age.max(0) as u32
}
