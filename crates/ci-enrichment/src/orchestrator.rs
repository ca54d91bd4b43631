//! Fan-out orchestration for `/api/intelligence/enrich` and
//! `/api/intelligence/verify*` (spec.md §4.2, §6). Every adapter runs
//! concurrently and independently; a slow or failing provider never
//! blocks or fails the request as a whole (spec.md §7).

use std::sync::Arc;
use std::time::Duration;

use ci_config::ProviderCredentials;
use futures::future::join_all;

use crate::adapters::{
    EmailRepAdapter, FbiWatchlistAdapter, FullContactAdapter, HibpAdapter, InterpolAdapter,
    LookupInput, NumverifyAdapter, OpenSanctionsAdapter, OpenSanctionsQuery, PhoneLocalAdapter,
    ProviderAdapter, TruecallerAdapter,
};
use crate::error::{EnrichmentError, EnrichmentResult};
use crate::types::{
    AdapterOutcome, BatchVerificationItem, BatchVerificationResponse, BatchVerificationSummary,
    EnrichmentCategory, EnrichmentRequest, EnrichmentResponse, NormalizedIdentity, ProviderError,
    RiskAssessment, RiskLevel, TaggedValue, VerificationRequest, VerificationResponse,
    VerificationStatus,
};

pub const MAX_BATCH_VERIFY_SIZE: usize = 50;

fn opensanctions_variants() -> Vec<OpenSanctionsQuery> {
    vec![
        OpenSanctionsQuery {
            adapter_name: "sanctions.opensanctions",
            dataset_filter: vec![],
            topic_filter: None,
            min_score: 0.5,
            min_dataset_count: Some(3),
        },
        OpenSanctionsQuery {
            adapter_name: "sanctions.ofac",
            dataset_filter: vec!["us_ofac_sdn", "us_ofac_cons"],
            topic_filter: None,
            min_score: 0.6,
            min_dataset_count: None,
        },
        OpenSanctionsQuery {
            adapter_name: "sanctions.un",
            dataset_filter: vec!["un_sc_sanctions"],
            topic_filter: None,
            min_score: 0.6,
            min_dataset_count: None,
        },
        OpenSanctionsQuery {
            adapter_name: "sanctions.eu",
            dataset_filter: vec!["eu_fsf"],
            topic_filter: None,
            min_score: 0.6,
            min_dataset_count: None,
        },
        OpenSanctionsQuery {
            adapter_name: "sanctions.pep",
            dataset_filter: vec![],
            topic_filter: Some("role.pep"),
            min_score: 0.7,
            min_dataset_count: None,
        },
        OpenSanctionsQuery {
            adapter_name: "watchlist.europol",
            dataset_filter: vec!["eu_most_wanted"],
            topic_filter: None,
            min_score: 0.6,
            min_dataset_count: None,
        },
    ]
}

/// Owns every adapter and the shared HTTP client used to reach them.
/// Constructed once at startup from [`ci_config::Config`] and shared via
/// `Arc` (the same pattern `ci-scoring`'s engine uses for the store).
pub struct EnrichmentOrchestrator {
    client: reqwest::Client,
    timeout: Duration,
    phone_adapters: Vec<Arc<dyn ProviderAdapter>>,
    email_adapters: Vec<Arc<dyn ProviderAdapter>>,
    sanctions_adapters: Vec<Arc<dyn ProviderAdapter>>,
    watchlist_adapters: Vec<Arc<dyn ProviderAdapter>>,
    interpol: Arc<InterpolAdapter>,
    fbi: Arc<FbiWatchlistAdapter>,
    europol: Arc<dyn ProviderAdapter>,
    pep: Arc<dyn ProviderAdapter>,
}

impl EnrichmentOrchestrator {
    pub fn new(credentials: &ProviderCredentials, timeout: Duration) -> Self {
        let client = reqwest::Client::new();

        let phone_adapters: Vec<Arc<dyn ProviderAdapter>> = vec![
            Arc::new(PhoneLocalAdapter::new()),
            Arc::new(TruecallerAdapter::new(
                credentials.truecaller_installation_id.clone(),
            )),
            Arc::new(NumverifyAdapter::new(credentials.numverify_api_key.clone())),
        ];

        let email_adapters: Vec<Arc<dyn ProviderAdapter>> = vec![
            Arc::new(EmailRepAdapter::new()),
            Arc::new(FullContactAdapter::new(
                credentials.fullcontact_api_key.clone(),
            )),
            Arc::new(HibpAdapter::new(credentials.hibp_api_key.clone())),
        ];

        let variants = opensanctions_variants();
        let sanctions_adapters: Vec<Arc<dyn ProviderAdapter>> = variants
            .iter()
            .filter(|q| !q.adapter_name.starts_with("watchlist."))
            .map(|q| {
                Arc::new(OpenSanctionsAdapter::new(
                    q.clone(),
                    credentials.opensanctions_api_key.clone(),
                )) as Arc<dyn ProviderAdapter>
            })
            .collect();

        let pep = sanctions_adapters
            .iter()
            .find(|a| a.name() == "sanctions.pep")
            .cloned()
            .expect("sanctions.pep variant always present");

        let interpol = Arc::new(InterpolAdapter::new());
        let fbi = Arc::new(FbiWatchlistAdapter::new());
        let europol: Arc<dyn ProviderAdapter> = Arc::new(OpenSanctionsAdapter::new(
            variants
                .iter()
                .find(|q| q.adapter_name == "watchlist.europol")
                .cloned()
                .expect("watchlist.europol variant always present"),
            credentials.opensanctions_api_key.clone(),
        ));

        let watchlist_adapters: Vec<Arc<dyn ProviderAdapter>> =
            vec![interpol.clone() as Arc<dyn ProviderAdapter>, fbi.clone() as Arc<dyn ProviderAdapter>, europol.clone()];

        Self {
            client,
            timeout,
            phone_adapters,
            email_adapters,
            sanctions_adapters,
            watchlist_adapters,
            interpol,
            fbi,
            europol,
            pep,
        }
    }

    pub fn interpol_adapter(&self) -> Arc<InterpolAdapter> {
        self.interpol.clone()
    }

    async fn run_group(
        &self,
        adapters: &[Arc<dyn ProviderAdapter>],
        input: &LookupInput,
    ) -> Vec<AdapterOutcome> {
        let tasks = adapters.iter().filter(|a| a.applies_to(input)).map(|adapter| {
            let adapter = adapter.clone();
            let input = input.clone();
            let client = self.client.clone();
            let timeout = self.timeout;
            async move { adapter.lookup(&input, &client, timeout).await }
        });
        join_all(tasks).await
    }

    /// `POST /api/intelligence/phone-lookup` (spec.md §6): runs the phone
    /// adapter group alone, without the rest of `enrich`'s fan-out.
    pub async fn phone_lookup(&self, phone: String) -> EnrichmentResult<Vec<AdapterOutcome>> {
        let input = LookupInput {
            phone: Some(phone),
            email: None,
            first_name: None,
            last_name: None,
            date_of_birth: None,
            nationality: None,
        };
        Ok(self.run_group(&self.phone_adapters, &input).await)
    }

    /// `POST /api/intelligence/email-lookup` (spec.md §6).
    pub async fn email_lookup(&self, email: String) -> EnrichmentResult<Vec<AdapterOutcome>> {
        let input = LookupInput {
            phone: None,
            email: Some(email),
            first_name: None,
            last_name: None,
            date_of_birth: None,
            nationality: None,
        };
        Ok(self.run_group(&self.email_adapters, &input).await)
    }

    /// `POST /api/intelligence/sanctions-check` (spec.md §6): requires a
    /// name, same as `verify`'s sanctions group.
    pub async fn sanctions_check(
        &self,
        first_name: String,
        last_name: String,
        date_of_birth: Option<chrono::NaiveDate>,
        nationality: Option<String>,
    ) -> EnrichmentResult<Vec<AdapterOutcome>> {
        let input = LookupInput {
            phone: None,
            email: None,
            first_name: Some(first_name),
            last_name: Some(last_name),
            date_of_birth,
            nationality,
        };
        Ok(self.run_group(&self.sanctions_adapters, &input).await)
    }

    /// `POST /api/intelligence/watchlist-check` (spec.md §6): INTERPOL,
    /// FBI and EUROPOL together, same group `verify` uses when asked for
    /// every watchlist.
    pub async fn watchlist_check(
        &self,
        first_name: String,
        last_name: String,
        date_of_birth: Option<chrono::NaiveDate>,
        nationality: Option<String>,
    ) -> EnrichmentResult<Vec<AdapterOutcome>> {
        let input = LookupInput {
            phone: None,
            email: None,
            first_name: Some(first_name),
            last_name: Some(last_name),
            date_of_birth,
            nationality,
        };
        Ok(self.run_group(&self.watchlist_adapters, &input).await)
    }

    /// `POST /api/intelligence/pep-check` (spec.md §6): the
    /// `sanctions.pep` OpenSanctions variant alone.
    pub async fn pep_check(
        &self,
        first_name: String,
        last_name: String,
        date_of_birth: Option<chrono::NaiveDate>,
        nationality: Option<String>,
    ) -> EnrichmentResult<AdapterOutcome> {
        let input = LookupInput {
            phone: None,
            email: None,
            first_name: Some(first_name),
            last_name: Some(last_name),
            date_of_birth,
            nationality,
        };
        Ok(self
            .run_group(std::slice::from_ref(&self.pep), &input)
            .await
            .into_iter()
            .next()
            .unwrap_or_else(|| AdapterOutcome::not_configured("sanctions.pep")))
    }

    /// `GET /api/intelligence/interpol/:entityId` (spec.md §6): proxies a
    /// single notice's detail straight through, bypassing `run_group`
    /// entirely since it takes no `LookupInput`.
    pub async fn interpol_entity_details(&self, entity_id: &str) -> AdapterOutcome {
        self.interpol
            .entity_details(entity_id, &self.client, self.timeout)
            .await
    }

    /// `POST /api/intelligence/enrich` (spec.md §4.2, §6).
    pub async fn enrich(&self, request: EnrichmentRequest) -> EnrichmentResult<EnrichmentResponse> {
        if request.phone.is_none() && request.email.is_none() && request.name.is_none() {
            return Err(EnrichmentError::Validation(
                "at least one of phone, email or name is required".to_string(),
            ));
        }

        let (first_name, last_name) = split_name(&request.name);
        let input = LookupInput {
            phone: request.phone.clone(),
            email: request.email.clone(),
            first_name,
            last_name,
            date_of_birth: request.date_of_birth,
            nationality: request.nationality.clone(),
        };

        let mut outcomes = Vec::new();
        if request.options.enabled(EnrichmentCategory::Phone, input.phone.is_some()) {
            outcomes.extend(self.run_group(&self.phone_adapters, &input).await);
        }
        if request.options.enabled(EnrichmentCategory::Email, input.email.is_some()) {
            outcomes.extend(self.run_group(&self.email_adapters, &input).await);
        }
        if request
            .options
            .enabled(EnrichmentCategory::Sanctions, input.full_name().is_some())
        {
            outcomes.extend(self.run_group(&self.sanctions_adapters, &input).await);
        }
        if request
            .options
            .enabled(EnrichmentCategory::Watchlist, input.full_name().is_some())
        {
            outcomes.extend(self.run_group(&self.watchlist_adapters, &input).await);
        }

        let identity = normalize_identity(&outcomes);
        let risk = score_enrichment_risk(&outcomes);
        let errors = collect_errors(&outcomes);

        Ok(EnrichmentResponse {
            identity,
            risk,
            provider_results: outcomes,
            errors,
        })
    }

    /// `POST /api/intelligence/verify` (spec.md §4.2, §6).
    pub async fn verify(&self, request: VerificationRequest) -> VerificationResponse {
        let input = LookupInput {
            phone: None,
            email: None,
            first_name: Some(request.first_name.clone()),
            last_name: Some(request.last_name.clone()),
            date_of_birth: request.date_of_birth,
            nationality: request.nationality.clone(),
        };

        let options = &request.options;
        let mut tasks: Vec<Arc<dyn ProviderAdapter>> = Vec::new();
        if options.run_sanctions() {
            tasks.extend(self.sanctions_adapters.iter().cloned());
        } else if options.run_fbi() || options.run_interpol() || options.run_europol() {
            tasks.push(self.pep.clone());
        }
        if options.run_interpol() {
            tasks.push(self.interpol.clone() as Arc<dyn ProviderAdapter>);
        }
        if options.run_fbi() {
            tasks.push(self.fbi.clone() as Arc<dyn ProviderAdapter>);
        }
        if options.run_europol() {
            tasks.push(self.europol.clone());
        }
        tasks.dedup_by(|a, b| a.name() == b.name());

        let outcomes = self.run_group(&tasks, &input).await;

        let sanctions_checked = options.run_sanctions();
        // `sanctions.pep` is excluded from the sanctions-match set: it
        // contributes only the dedicated PEP increment below, so a
        // PEP-only subject isn't also scored as a sanctions hit (spec.md
        // §4.2 "PEP-only -> review", which sits below flagged/blocked).
        let sanctions_matches =
            collect_matches(&outcomes, |name| name.starts_with("sanctions.") && name != "sanctions.pep");
        let watchlist_matches = collect_matches(&outcomes, |name| name.starts_with("watchlist."));
        let pep_matched = outcomes
            .iter()
            .any(|o| o.source_name == "sanctions.pep" && o.success && has_matches(o));

        let risk = score_verification_risk(&sanctions_matches, &watchlist_matches, &outcomes, pep_matched);
        let status = verification_status(&risk, pep_matched);
        let recommendations = verification_recommendations(&status, &risk);
        let errors = collect_errors(&outcomes);

        VerificationResponse {
            status,
            risk,
            sanctions_checked,
            sanctions_matches,
            watchlist_matches,
            recommendations,
            provider_results: outcomes,
            errors,
        }
    }

    /// `POST /api/intelligence/verify/batch` (spec.md §4.2, §6): at most
    /// [`MAX_BATCH_VERIFY_SIZE`] entries per call.
    pub async fn batch_verify(
        &self,
        requests: Vec<VerificationRequest>,
    ) -> EnrichmentResult<BatchVerificationResponse> {
        if requests.is_empty() {
            return Err(EnrichmentError::Validation(
                "at least one entry is required".to_string(),
            ));
        }
        if requests.len() > MAX_BATCH_VERIFY_SIZE {
            return Err(EnrichmentError::Validation(format!(
                "batch size {} exceeds the maximum of {MAX_BATCH_VERIFY_SIZE}",
                requests.len()
            )));
        }

        let mut summary = BatchVerificationSummary::default();
        let mut results = Vec::with_capacity(requests.len());
        for request in requests {
            let first_name = request.first_name.clone();
            let last_name = request.last_name.clone();
            let response = self.verify(request).await;
            summary.record(&response.status);
            results.push(BatchVerificationItem {
                first_name,
                last_name,
                response,
            });
        }

        Ok(BatchVerificationResponse { results, summary })
    }
}

fn split_name(name: &Option<String>) -> (Option<String>, Option<String>) {
    match name {
        None => (None, None),
        Some(full) => {
            let mut parts = full.split_whitespace();
            let first = parts.next().map(str::to_string);
            let rest: Vec<&str> = parts.collect();
            let last = if rest.is_empty() {
                None
            } else {
                Some(rest.join(" "))
            };
            (first, last)
        }
    }
}

fn has_matches(outcome: &AdapterOutcome) -> bool {
    outcome
        .data
        .as_ref()
        .and_then(|d| d.get("matches"))
        .and_then(|m| m.as_array())
        .map(|arr| !arr.is_empty())
        .unwrap_or(false)
}

fn collect_matches(
    outcomes: &[AdapterOutcome],
    predicate: impl Fn(&str) -> bool,
) -> Vec<serde_json::Value> {
    outcomes
        .iter()
        .filter(|o| predicate(&o.source_name) && o.success)
        .flat_map(|o| {
            o.data
                .as_ref()
                .and_then(|d| d.get("matches"))
                .and_then(|m| m.as_array())
                .cloned()
                .unwrap_or_default()
        })
        .collect()
}

fn collect_errors(outcomes: &[AdapterOutcome]) -> Vec<ProviderError> {
    outcomes
        .iter()
        .filter(|o| !o.success && o.error.as_deref() != Some("not configured"))
        .map(|o| ProviderError {
            source: o.source_name.clone(),
            error: o.error.clone().unwrap_or_default(),
        })
        .collect()
}

fn add_tagged(values: &mut Vec<TaggedValue>, value: Option<String>, source: &str) {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return;
    };
    if let Some(existing) = values.iter_mut().find(|tv| tv.value == value) {
        if !existing.sources.iter().any(|s| s == source) {
            existing.sources.push(source.to_string());
        }
    } else {
        values.push(TaggedValue {
            value,
            sources: vec![source.to_string()],
        });
    }
}

/// Normalizes every successful provider payload into one deduplicated
/// identity view (spec.md §4.2 "Normalisation").
fn normalize_identity(outcomes: &[AdapterOutcome]) -> NormalizedIdentity {
    let mut identity = NormalizedIdentity::default();

    for outcome in outcomes.iter().filter(|o| o.success) {
        let Some(data) = &outcome.data else { continue };
        let source = outcome.source_name.as_str();

        if let Some(name) = data.get("name").and_then(|v| v.as_str()) {
            if !identity.names.iter().any(|n| n == name) {
                identity.names.push(name.to_string());
            }
        }
        if let Some(full_name) = data.get("full_name").and_then(|v| v.as_str()) {
            if !identity.names.iter().any(|n| n == full_name) {
                identity.names.push(full_name.to_string());
            }
        }

        add_tagged(
            &mut identity.emails,
            data.get("email").and_then(|v| v.as_str()).map(str::to_string),
            source,
        );
        add_tagged(
            &mut identity.phones,
            data.get("phone").and_then(|v| v.as_str()).map(str::to_string),
            source,
        );
        for key in ["phones", "alternate_phones"] {
            if let Some(list) = data.get(key).and_then(|v| v.as_array()) {
                for phone in list.iter().filter_map(|v| v.as_str()) {
                    add_tagged(&mut identity.phones, Some(phone.to_string()), source);
                }
            }
        }

        add_tagged(
            &mut identity.photos,
            data.get("photo").and_then(|v| v.as_str()).map(str::to_string),
            source,
        );
        if let Some(list) = data.get("photos").and_then(|v| v.as_array()) {
            for photo in list.iter().filter_map(|v| v.as_str()) {
                add_tagged(&mut identity.photos, Some(photo.to_string()), source);
            }
        }

        for key in ["addresses", "locations"] {
            if let Some(list) = data.get(key).and_then(|v| v.as_array()) {
                for location in list.iter().filter_map(|v| v.as_str()) {
                    add_tagged(&mut identity.locations, Some(location.to_string()), source);
                }
            }
        }
        add_tagged(
            &mut identity.locations,
            data.get("location").and_then(|v| v.as_str()).map(str::to_string),
            source,
        );

        if let Some(list) = data.get("social_profiles").and_then(|v| v.as_array()) {
            for profile in list.iter().filter_map(|v| v.as_str()) {
                add_tagged(&mut identity.social_profiles, Some(profile.to_string()), source);
            }
        }
        if let Some(list) = data.get("profiles_found").and_then(|v| v.as_array()) {
            for profile in list.iter().filter_map(|v| v.as_str()) {
                add_tagged(&mut identity.social_profiles, Some(profile.to_string()), source);
            }
        }
    }

    identity
}

fn match_count(outcome: &AdapterOutcome) -> usize {
    outcome
        .data
        .as_ref()
        .and_then(|d| d.get("matches"))
        .and_then(|m| m.as_array())
        .map(|arr| arr.len())
        .unwrap_or(0)
}

/// `/api/intelligence/enrich` risk score (spec.md §4.2): sanctions and
/// watchlist hits dominate; reputation signals add smaller increments.
fn score_enrichment_risk(outcomes: &[AdapterOutcome]) -> RiskAssessment {
    let mut score: i64 = 0;
    let mut factors = Vec::new();

    let sanctions_hits: usize = outcomes
        .iter()
        .filter(|o| o.source_name.starts_with("sanctions.") && o.success)
        .map(match_count)
        .sum();
    if sanctions_hits > 0 {
        score += 40 + 10 * (sanctions_hits as i64 - 1);
        factors.push(format!("{sanctions_hits} sanctions match(es)"));
    }

    let watchlist_hits: usize = outcomes
        .iter()
        .filter(|o| o.source_name.starts_with("watchlist.") && o.success)
        .map(match_count)
        .sum();
    if watchlist_hits > 0 {
        score += 40 + 10 * (watchlist_hits as i64 - 1);
        factors.push(format!("{watchlist_hits} watchlist match(es)"));
    }

    if let Some(emailrep) = outcomes.iter().find(|o| o.source_name == "email.emailrep" && o.success) {
        if let Some(data) = &emailrep.data {
            if data.get("malicious").and_then(|v| v.as_bool()) == Some(true) {
                score += 25;
                factors.push("email flagged malicious".to_string());
            } else if data.get("suspicious").and_then(|v| v.as_bool()) == Some(true) {
                score += 15;
                factors.push("email flagged suspicious".to_string());
            }
            let spam = data.get("spam").and_then(|v| v.as_bool()) == Some(true);
            let disposable = data.get("disposable").and_then(|v| v.as_bool()) == Some(true);
            if spam || disposable {
                score += 10;
                factors.push("email spam or disposable".to_string());
            }
        }
    }

    if let Some(hibp) = outcomes.iter().find(|o| o.source_name == "email.hibp" && o.success) {
        if let Some(count) = hibp.data.as_ref().and_then(|d| d.get("breach_count")).and_then(|v| v.as_u64()) {
            let contribution = (count as i64 * 2).min(20);
            if contribution > 0 {
                score += contribution;
                factors.push(format!("{count} known breach(es)"));
            }
        }
    }

    let score = score.clamp(0, 100) as u32;
    let level = match score {
        s if s >= 70 => RiskLevel::Critical,
        s if s >= 50 => RiskLevel::High,
        s if s >= 30 => RiskLevel::Medium,
        s if s >= 10 => RiskLevel::Low,
        _ => RiskLevel::Clear,
    };

    RiskAssessment { score, level, factors }
}

/// `/api/intelligence/verify` risk score (spec.md §4.2): a sanctions or
/// watchlist hit alone is enough to move this above review, with
/// INTERPOL presence and PEP status adding further weight.
fn score_verification_risk(
    sanctions_matches: &[serde_json::Value],
    watchlist_matches: &[serde_json::Value],
    outcomes: &[AdapterOutcome],
    pep_matched: bool,
) -> RiskAssessment {
    let mut score: i64 = 0;
    let mut factors = Vec::new();

    if !sanctions_matches.is_empty() {
        let highest_score = sanctions_matches
            .iter()
            .filter_map(|m| m.get("score").and_then(|s| s.as_f64()))
            .fold(0.0_f64, f64::max);
        score += 50 + (highest_score * 100.0 / 2.0).round() as i64;
        factors.push(format!("{} sanctions match(es)", sanctions_matches.len()));
    }

    if !watchlist_matches.is_empty() {
        score += 40 + 15 * watchlist_matches.len() as i64;
        factors.push(format!("{} watchlist match(es)", watchlist_matches.len()));
        let interpol_present = outcomes
            .iter()
            .any(|o| o.source_name == "watchlist.interpol" && o.success && match_count(o) > 0);
        if interpol_present {
            score += 20;
            factors.push("INTERPOL red notice present".to_string());
        }
    }

    if pep_matched {
        score += 20;
        factors.push("politically exposed person".to_string());
    }

    let score = score.clamp(0, 100) as u32;
    let level = match score {
        s if s >= 70 => RiskLevel::Critical,
        s if s >= 50 => RiskLevel::High,
        s if s >= 30 => RiskLevel::Medium,
        s if s >= 10 => RiskLevel::Low,
        _ => RiskLevel::Clear,
    };

    RiskAssessment { score, level, factors }
}

fn verification_status(risk: &RiskAssessment, pep_only: bool) -> VerificationStatus {
    if risk.score >= 70 {
        VerificationStatus::Blocked
    } else if risk.score >= 50 {
        VerificationStatus::Flagged
    } else if pep_only && risk.score > 0 {
        VerificationStatus::Review
    } else if risk.score >= 20 {
        VerificationStatus::Review
    } else {
        VerificationStatus::Clear
    }
}

fn verification_recommendations(status: &VerificationStatus, _risk: &RiskAssessment) -> Vec<String> {
    let mut recommendations = match status {
        VerificationStatus::Blocked => vec![
            "Do not proceed with onboarding until manual review is complete".to_string(),
            "Escalate to compliance officer immediately".to_string(),
        ],
        VerificationStatus::Flagged => vec![
            "Route to enhanced due diligence before approval".to_string(),
        ],
        VerificationStatus::Review => vec![
            "Request additional identity documentation before approval".to_string(),
        ],
        VerificationStatus::Clear => vec!["No further action required".to_string()],
    };
    if recommendations.is_empty() {
        recommendations.push("No further action required".to_string());
    }
    recommendations
}
