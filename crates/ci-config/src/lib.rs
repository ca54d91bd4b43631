//! Startup configuration for the compliance intelligence service.
//!
//! A single [`Config`] is built once in `ci-api::main` from the process
//! environment and handed down as `Arc<Config>` to every component —
//! no module reads `std::env` on its own past this point (REDESIGN FLAGS,
//! spec.md §9).

mod scoring;

pub use scoring::{ScoringConfig, SEASONAL_FACTORS};

use std::env;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingRequired(String),
    #[error("invalid value for {var}: {message}")]
    Invalid { var: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> Self {
        match raw {
            "staging" => Environment::Staging,
            "production" => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

/// Per-adapter provider credentials. Each field absent means the
/// corresponding adapter is disabled, not that startup fails (spec.md §6,
/// §7: "Missing credentials disable only that adapter").
#[derive(Debug, Clone, Default)]
pub struct ProviderCredentials {
    pub truecaller_installation_id: Option<String>,
    pub numverify_api_key: Option<String>,
    pub fullcontact_api_key: Option<String>,
    pub hibp_api_key: Option<String>,
    pub opensanctions_api_key: Option<String>,
}

/// Cron expressions for the three scheduled jobs, overridable via env.
#[derive(Debug, Clone)]
pub struct JobSchedules {
    pub daily_risk_update: String,
    pub weekly_report: String,
    pub monthly_trend_analysis: String,
}

impl Default for JobSchedules {
    fn default() -> Self {
        Self {
            daily_risk_update: "0 0 2 * * *".to_string(),
            weekly_report: "0 0 6 * * Mon".to_string(),
            monthly_trend_analysis: "0 0 4 1 * *".to_string(),
        }
    }
}

/// Process-wide configuration, constructed once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub store_url: String,
    pub store_credential: String,
    pub port: u16,
    pub environment: Environment,
    pub enable_scheduled_jobs: bool,
    pub schedules: JobSchedules,
    pub credentials: ProviderCredentials,
    pub adapter_timeout: std::time::Duration,
    pub scoring: ScoringConfig,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// `SUPABASE_URL` and one of `SUPABASE_SERVICE_KEY`/`SUPABASE_ANON_KEY`
    /// are required; everything else has a default (spec.md §6).
    pub fn from_env() -> Result<Self, ConfigError> {
        let store_url = env::var("SUPABASE_URL")
            .map_err(|_| ConfigError::MissingRequired("SUPABASE_URL".to_string()))?;

        let store_credential = env::var("SUPABASE_SERVICE_KEY")
            .or_else(|_| env::var("SUPABASE_ANON_KEY"))
            .map_err(|_| {
                ConfigError::MissingRequired(
                    "SUPABASE_SERVICE_KEY or SUPABASE_ANON_KEY".to_string(),
                )
            })?;

        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3003);

        let environment = env::var("NODE_ENV")
            .map(|v| Environment::parse(&v))
            .unwrap_or(Environment::Development);

        let enable_scheduled_jobs = env::var("ENABLE_SCHEDULED_JOBS")
            .map(|v| v != "false")
            .unwrap_or(true);

        let schedules = JobSchedules {
            daily_risk_update: env::var("DAILY_RISK_UPDATE_SCHEDULE")
                .unwrap_or_else(|_| JobSchedules::default().daily_risk_update),
            weekly_report: env::var("WEEKLY_REPORT_SCHEDULE")
                .unwrap_or_else(|_| JobSchedules::default().weekly_report),
            monthly_trend_analysis: env::var("MONTHLY_TREND_ANALYSIS_SCHEDULE")
                .unwrap_or_else(|_| JobSchedules::default().monthly_trend_analysis),
        };

        let credentials = ProviderCredentials {
            truecaller_installation_id: env::var("TRUECALLER_INSTALLATION_ID").ok(),
            numverify_api_key: env::var("NUMVERIFY_API_KEY").ok(),
            fullcontact_api_key: env::var("FULLCONTACT_API_KEY").ok(),
            hibp_api_key: env::var("HIBP_API_KEY").ok(),
            opensanctions_api_key: env::var("OPENSANCTIONS_API_KEY").ok(),
        };

        let adapter_timeout_secs: u64 = env::var("ADAPTER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        Ok(Self {
            store_url,
            store_credential,
            port,
            environment,
            enable_scheduled_jobs,
            schedules,
            credentials,
            adapter_timeout: std::time::Duration::from_secs(adapter_timeout_secs),
            scoring: ScoringConfig::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_defaults_to_development() {
        assert_eq!(Environment::parse("anything"), Environment::Development);
        assert_eq!(Environment::parse("production"), Environment::Production);
    }

    #[test]
    fn job_schedules_default_matches_spec() {
        let schedules = JobSchedules::default();
        assert_eq!(schedules.daily_risk_update, "0 0 2 * * *");
        assert_eq!(schedules.weekly_report, "0 0 6 * * Mon");
        assert_eq!(schedules.monthly_trend_analysis, "0 0 4 1 * *");
    }
}
