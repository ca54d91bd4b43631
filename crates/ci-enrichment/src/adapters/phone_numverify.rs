use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::{run_timed, LookupInput, ProviderAdapter};
use crate::types::AdapterOutcome;

#[derive(Debug, Deserialize)]
struct NumverifyResponse {
    carrier: Option<String>,
    country_code: Option<String>,
    line_type: Option<String>,
    location: Option<String>,
    valid: Option<bool>,
}

/// `phone.numverify` (spec.md §4.2): carrier/line-type lookup. Disabled
/// without `NUMVERIFY_API_KEY`.
pub struct NumverifyAdapter {
    api_key: Option<String>,
    base_url: String,
}

impl NumverifyAdapter {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: "http://apilayer.net/api/validate".to_string(),
        }
    }
}

#[async_trait]
impl ProviderAdapter for NumverifyAdapter {
    fn name(&self) -> &'static str {
        "phone.numverify"
    }

    fn applies_to(&self, input: &LookupInput) -> bool {
        input.phone.is_some()
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
        let Some(phone) = &input.phone else {
            return AdapterOutcome::not_configured(self.name());
        };

        let url = self.base_url.clone();
        let client = client.clone();
        let api_key = api_key.clone();
        let phone = phone.clone();

        run_timed(self.name(), timeout, async move {
            let response = client
                .get(&url)
                .query(&[("access_key", api_key.as_str()), ("number", phone.as_str())])
                .send()
                .await
                .map_err(|e| e.to_string())?;
            if !response.status().is_success() {
                return Err(format!("upstream status {}", response.status()));
            }
            let parsed: NumverifyResponse =
                response.json().await.map_err(|e| e.to_string())?;
            if parsed.valid == Some(false) {
                return Err("number reported invalid".to_string());
            }
            Ok(json!({
                "carrier": parsed.carrier,
                "country_code": parsed.country_code,
                "line_type": parsed.line_type.unwrap_or_else(|| "unknown".to_string()),
                "location": parsed.location,
            }))
        })
        .await
    }
}
