use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::{run_timed, LookupInput, ProviderAdapter};
use crate::types::AdapterOutcome;

#[derive(Debug, Deserialize)]
struct TruecallerResponse {
    name: Option<String>,
    email: Option<String>,
    photo_url: Option<String>,
    carrier: Option<String>,
    #[serde(default)]
    line_type: Option<String>,
    spam_score: Option<f64>,
    #[serde(default)]
    addresses: Vec<String>,
    #[serde(default)]
    alternate_phones: Vec<String>,
}

/// `phone.truecaller` (spec.md §4.2): caller-id/spam-reputation lookup by
/// E.164 phone. Disabled without `TRUECALLER_INSTALLATION_ID`.
pub struct TruecallerAdapter {
    installation_id: Option<String>,
    base_url: String,
}

impl TruecallerAdapter {
    pub fn new(installation_id: Option<String>) -> Self {
        Self {
            installation_id,
            base_url: "https://api.truecaller.com/v1/search".to_string(),
        }
    }
}

#[async_trait]
impl ProviderAdapter for TruecallerAdapter {
    fn name(&self) -> &'static str {
        "phone.truecaller"
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
        let Some(installation_id) = &self.installation_id else {
            return AdapterOutcome::not_configured(self.name());
        };
        let Some(phone) = &input.phone else {
            return AdapterOutcome::not_configured(self.name());
        };

        let url = self.base_url.clone();
        let client = client.clone();
        let installation_id = installation_id.clone();
        let phone = phone.clone();

        run_timed(self.name(), timeout, async move {
            let response = client
                .get(&url)
                .query(&[("q", phone.as_str())])
                .header("X-Installation-Id", installation_id)
                .send()
                .await
                .map_err(|e| e.to_string())?;
            if !response.status().is_success() {
                return Err(format!("upstream status {}", response.status()));
            }
            let parsed: TruecallerResponse =
                response.json().await.map_err(|e| e.to_string())?;
            Ok(json!({
                "name": parsed.name,
                "email": parsed.email,
                "photo": parsed.photo_url,
                "carrier": parsed.carrier,
                "line_type": parsed.line_type.unwrap_or_else(|| "unknown".to_string()),
                "spam_score": parsed.spam_score,
                "addresses": parsed.addresses,
                "alternate_phones": parsed.alternate_phones,
            }))
        })
        .await
    }
}
