//! Deterministic, weighted multi-factor risk scoring and analytics engine
//! (spec.md §4.1): landlord/listing/area scoring, hotspot clustering,
//! revenue forecasting and seasonal pattern analysis.
//!
//! Each scorer is a pure function of plain inputs (see `landlord`,
//! `listing`, `area`, `hotspot`, `forecast`, `seasonal`); [`engine`] wires
//! those pure functions to the [`ci_query::ComplianceStore`] query layer.

pub mod area;
pub mod engine;
pub mod error;
pub mod forecast;
pub mod hotspot;
pub mod landlord;
pub mod level;
pub mod listing;
pub mod seasonal;

pub use area::{assess_area, AreaInputs};
pub use error::{ScoringError, ScoringResult};
pub use forecast::forecast_revenue;
pub use hotspot::detect_hotspots;
pub use landlord::score_landlord;
pub use level::{inverted_risk_level, landlord_listing_risk_level};
pub use listing::{estimated_annual_revenue, score_listing};
pub use seasonal::analyze_seasonality;
