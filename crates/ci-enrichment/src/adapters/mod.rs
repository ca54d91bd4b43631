//! One module per external OSINT provider (spec.md §4.2 "Adapter
//! inventory"). Every adapter implements [`ProviderAdapter`]: a uniform
//! `lookup` that never propagates an upstream failure — it is always
//! recovered into an `AdapterOutcome` (spec.md §7).

mod email_emailrep;
mod email_fullcontact;
mod email_hibp;
mod opensanctions;
mod phone_local;
mod phone_numverify;
mod phone_truecaller;
mod watchlist_fbi;
mod watchlist_interpol;

pub use email_emailrep::EmailRepAdapter;
pub use email_fullcontact::FullContactAdapter;
pub use email_hibp::HibpAdapter;
pub use opensanctions::{OpenSanctionsAdapter, OpenSanctionsQuery};
pub use phone_local::PhoneLocalAdapter;
pub use phone_numverify::NumverifyAdapter;
pub use phone_truecaller::TruecallerAdapter;
pub use watchlist_fbi::FbiWatchlistAdapter;
pub use watchlist_interpol::InterpolAdapter;

use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::Duration;

use crate::types::AdapterOutcome;

/// Inputs that might be available to any one adapter. Adapters read only
/// the fields they need; the orchestrator builds one of these per request
/// from whichever of phone/email/name/dob/nationality was supplied.
#[derive(Debug, Clone, Default)]
pub struct LookupInput {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    /// ISO-3166-1 alpha-2 nationality code (spec.md §9 open-question
    /// resolution: strict ISO-2, no free-text substring matching).
    pub nationality: Option<String>,
}

impl LookupInput {
    pub fn full_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(first), None) => Some(first.clone()),
            (None, Some(last)) => Some(last.clone()),
            (None, None) => None,
        }
    }
}

#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this adapter has enough input and configuration to run at
    /// all. The orchestrator skips adapters that return `false` rather
    /// than invoking them (a missing phone number, say, never reaches the
    /// phone adapters).
    fn applies_to(&self, input: &LookupInput) -> bool;

    async fn lookup(&self, input: &LookupInput, client: &reqwest::Client, timeout: Duration)
        -> AdapterOutcome;
}

/// Runs `fut` under `timeout`, turning a timeout or an `Err` into a
/// `success=false` outcome rather than ever propagating (spec.md §5, §7:
/// "it never cancels sibling calls" / "never surfaces as request
/// failure").
pub(crate) async fn run_timed<F>(source_name: &str, timeout: Duration, fut: F) -> AdapterOutcome
where
    F: std::future::Future<Output = Result<serde_json::Value, String>>,
{
    let started = std::time::Instant::now();
    match tokio::time::timeout(timeout, fut).await {
        Ok(Ok(data)) => AdapterOutcome::ok(source_name, started.elapsed(), data),
        Ok(Err(message)) => AdapterOutcome::failed(source_name, started.elapsed(), message),
        Err(_) => AdapterOutcome::failed(source_name, started.elapsed(), "timeout"),
    }
}
