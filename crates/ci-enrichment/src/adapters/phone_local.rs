use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;
use std::time::Duration;

use super::{LookupInput, ProviderAdapter};
use crate::types::AdapterOutcome;

static E164: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[1-9]\d{6,14}$").unwrap());

const SN_MOBILE_PREFIXES: [&str; 5] = ["70", "75", "76", "77", "78"];
const SN_LANDLINE_PREFIX: &str = "33";

/// `phone.local` (spec.md §4.2): offline E.164-shape and Senegalese
/// numbering-plan check. Runs no network call, so it never fails to be
/// "configured" and always applies when a phone number is present.
pub struct PhoneLocalAdapter;

impl PhoneLocalAdapter {
    pub fn new() -> Self {
        Self
    }

    fn national_significant_number(phone: &str) -> String {
        let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
        match digits.strip_prefix("221") {
            Some(rest) => rest.to_string(),
            None => digits,
        }
    }

    fn classify(nsn: &str) -> &'static str {
        if SN_MOBILE_PREFIXES.iter().any(|p| nsn.starts_with(p)) {
            "mobile"
        } else if nsn.starts_with(SN_LANDLINE_PREFIX) {
            "landline"
        } else {
            "unknown"
        }
    }
}

impl Default for PhoneLocalAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderAdapter for PhoneLocalAdapter {
    fn name(&self) -> &'static str {
        "phone.local"
    }

    fn applies_to(&self, input: &LookupInput) -> bool {
        input.phone.is_some()
    }

    async fn lookup(
        &self,
        input: &LookupInput,
        _client: &reqwest::Client,
        _timeout: Duration,
    ) -> AdapterOutcome {
        let Some(phone) = &input.phone else {
            return AdapterOutcome::not_configured(self.name());
        };

        let started = std::time::Instant::now();
        let valid_shape = E164.is_match(phone);
        let nsn = Self::national_significant_number(phone);
        let line_type = Self::classify(&nsn);

        AdapterOutcome::ok(
            self.name(),
            started.elapsed(),
            json!({
                "valid_shape": valid_shape,
                "line_type": line_type,
                "is_senegalese_numbering_plan": line_type != "unknown",
            }),
        )
    }
}
