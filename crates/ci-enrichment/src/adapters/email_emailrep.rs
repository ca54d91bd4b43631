use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::{run_timed, LookupInput, ProviderAdapter};
use crate::types::AdapterOutcome;

#[derive(Debug, Deserialize)]
struct EmailRepResponse {
    reputation: Option<String>,
    suspicious: Option<bool>,
    details: Option<EmailRepDetails>,
}

#[derive(Debug, Deserialize)]
struct EmailRepDetails {
    malicious_activity: Option<bool>,
    spam: Option<bool>,
    disposable: Option<bool>,
    #[serde(default)]
    profiles: Vec<String>,
}

/// `email.emailrep` (spec.md §4.2): email reputation lookup. Listed
/// without a credential in the adapter inventory — it runs unconditionally
/// whenever an email is present.
pub struct EmailRepAdapter {
    base_url: String,
}

impl EmailRepAdapter {
    pub fn new() -> Self {
        Self {
            base_url: "https://emailrep.io".to_string(),
        }
    }
}

impl Default for EmailRepAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderAdapter for EmailRepAdapter {
    fn name(&self) -> &'static str {
        "email.emailrep"
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
        let Some(email) = &input.email else {
            return AdapterOutcome::not_configured(self.name());
        };

        let url = format!("{}/{}", self.base_url, email);
        let client = client.clone();

        run_timed(self.name(), timeout, async move {
            let response = client.get(&url).send().await.map_err(|e| e.to_string())?;
            if !response.status().is_success() {
                return Err(format!("upstream status {}", response.status()));
            }
            let parsed: EmailRepResponse = response.json().await.map_err(|e| e.to_string())?;
            let details = parsed.details.unwrap_or(EmailRepDetails {
                malicious_activity: None,
                spam: None,
                disposable: None,
                profiles: Vec::new(),
            });
            Ok(json!({
                "reputation": parsed.reputation.unwrap_or_else(|| "none".to_string()),
                "suspicious": parsed.suspicious.unwrap_or(false),
                "malicious": details.malicious_activity.unwrap_or(false),
                "spam": details.spam.unwrap_or(false),
                "disposable": details.disposable.unwrap_or(false),
                "profiles_found": details.profiles,
            }))
        })
        .await
    }
}
