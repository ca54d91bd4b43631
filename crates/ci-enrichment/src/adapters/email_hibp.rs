use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::{run_timed, LookupInput, ProviderAdapter};
use crate::types::AdapterOutcome;

#[derive(Debug, Deserialize)]
struct HibpBreach {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "BreachDate")]
    breach_date: Option<String>,
}

/// `email.hibp` (spec.md §4.2): Have I Been Pwned breach lookup. Disabled
/// without `HIBP_API_KEY`. A 404 from upstream means "no breaches", not a
/// failure.
pub struct HibpAdapter {
    api_key: Option<String>,
    base_url: String,
}

impl HibpAdapter {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: "https://haveibeenpwned.com/api/v3/breachedaccount".to_string(),
        }
    }
}

#[async_trait]
impl ProviderAdapter for HibpAdapter {
    fn name(&self) -> &'static str {
        "email.hibp"
    }

    fn applies_to(&self, input: &LookupInput) -> bool {
        input.email.is_some()
    }

    async fn lookup(
        &self,
        input: &LookupInput,
        client: &reqwest::Client,
        timeout: Duration,
    ) -> AdapterOutcome {
        let Some(api_key) = &self.api_key else {
            return AdapterOutcome::not_configured(self.name());
        };
        let Some(email) = &input.email else {
            return AdapterOutcome::not_configured(self.name());
        };

        let url = format!("{}/{}", self.base_url, email);
        let client = client.clone();
        let api_key = api_key.clone();

        run_timed(self.name(), timeout, async move {
            let response = client
                .get(&url)
                .query(&[("truncateResponse", "false")])
                .header("hibp-api-key", api_key)
                .send()
                .await
                .map_err(|e| e.to_string())?;
            if response.status() == reqwest::StatusCode::NOT_FOUND {
                return Ok(json!({
                    "breached": false,
                    "breach_count": 0,
                    "breaches": Vec::<String>::new(),
                }));
            }
            if !response.status().is_success() {
                return Err(format!("upstream status {}", response.status()));
            }
            let breaches: Vec<HibpBreach> = response.json().await.map_err(|e| e.to_string())?;
            Ok(json!({
                "breached": !breaches.is_empty(),
                "breach_count": breaches.len(),
                "breaches": breaches.iter().map(|b| json!({
                    "name": b.name,
                    "breach_date": b.breach_date,
                })).collect::<Vec<_>>(),
            }))
        })
        .await
    }
}
