//! Shared score-clamping and risk-level bucketing helpers. Kept in one
//! place because every scorer in spec.md §4.1 uses an `[0,100]` scale but
//! two distinct polarities: landlord/listing scores run high-is-safe,
//! while area/verification/enrichment scores run high-is-risky.

use ci_types::RiskLevel;

pub fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

/// Landlord overall-score bands (spec.md §4.1.1): higher score = lower
/// risk. `>=80` low, `>=60` medium, `>=40` high, else critical.
pub fn landlord_listing_risk_level(overall_score: f64) -> RiskLevel {
    if overall_score >= 80.0 {
        RiskLevel::Low
    } else if overall_score >= 60.0 {
        RiskLevel::Medium
    } else if overall_score >= 40.0 {
        RiskLevel::High
    } else {
        RiskLevel::Critical
    }
}

/// Listing investigation-priority bands (spec.md §4.1.2): the inverted
/// `risk` value, higher = more risk. `>=80` critical, `>=60` high, `>=40`
/// medium, else low.
pub fn inverted_risk_level(risk: f64) -> RiskLevel {
    if risk >= 80.0 {
        RiskLevel::Critical
    } else if risk >= 60.0 {
        RiskLevel::High
    } else if risk >= 40.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_bounds_both_directions() {
        assert_eq!(clamp_score(-5.0), 0.0);
        assert_eq!(clamp_score(150.0), 100.0);
        assert_eq!(clamp_score(42.0), 42.0);
    }

    #[test]
    fn landlord_bands_match_spec() {
        assert_eq!(landlord_listing_risk_level(80.0), RiskLevel::Low);
        assert_eq!(landlord_listing_risk_level(60.0), RiskLevel::Medium);
        assert_eq!(landlord_listing_risk_level(40.0), RiskLevel::High);
        assert_eq!(landlord_listing_risk_level(39.9), RiskLevel::Critical);
    }

    #[test]
    fn inverted_bands_match_spec() {
        assert_eq!(inverted_risk_level(80.0), RiskLevel::Critical);
        assert_eq!(inverted_risk_level(60.0), RiskLevel::High);
        assert_eq!(inverted_risk_level(40.0), RiskLevel::Medium);
        assert_eq!(inverted_risk_level(39.9), RiskLevel::Low);
    }
}
