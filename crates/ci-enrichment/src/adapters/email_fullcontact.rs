use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::{run_timed, LookupInput, ProviderAdapter};
use crate::types::AdapterOutcome;

#[derive(Debug, Deserialize)]
struct FullContactResponse {
    #[serde(rename = "fullName")]
    full_name: Option<String>,
    #[serde(default)]
    phones: Vec<FullContactValue>,
    #[serde(default)]
    photos: Vec<FullContactValue>,
    #[serde(default)]
    locations: Vec<FullContactValue>,
    #[serde(default)]
    employment: Vec<FullContactValue>,
    #[serde(default)]
    social_profiles: Vec<FullContactValue>,
}

#[derive(Debug, Deserialize)]
struct FullContactValue {
    value: String,
}

/// `email.fullcontact` (spec.md §4.2): identity-graph enrichment by email.
/// Disabled without `FULLCONTACT_API_KEY`.
pub struct FullContactAdapter {
    api_key: Option<String>,
    base_url: String,
}

impl FullContactAdapter {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: "https://api.fullcontact.com/v3/person.enrich".to_string(),
        }
    }
}

#[async_trait]
impl ProviderAdapter for FullContactAdapter {
    fn name(&self) -> &'static str {
        "email.fullcontact"
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

        let url = self.base_url.clone();
        let client = client.clone();
        let api_key = api_key.clone();
        let email = email.clone();

        run_timed(self.name(), timeout, async move {
            let response = client
                .post(&url)
                .bearer_auth(api_key)
                .json(&json!({ "email": email }))
                .send()
                .await
                .map_err(|e| e.to_string())?;
            if !response.status().is_success() {
                return Err(format!("upstream status {}", response.status()));
            }
            let parsed: FullContactResponse =
                response.json().await.map_err(|e| e.to_string())?;
            let values = |items: Vec<FullContactValue>| -> Vec<String> {
                items.into_iter().map(|v| v.value).collect()
            };
            Ok(json!({
                "full_name": parsed.full_name,
                "phones": values(parsed.phones),
                "photos": values(parsed.photos),
                "locations": values(parsed.locations),
                "employment": values(parsed.employment),
                "social_profiles": values(parsed.social_profiles),
            }))
        })
        .await
    }
}
