//! Externalised scoring weights, thresholds and the seasonal factor table
//! (spec.md §4.1, §6, REDESIGN FLAGS: "externalise all weights, thresholds,
//! and the 12-entry seasonal table into a configuration struct").

/// Monthly seasonal multiplier table, indexed January (0) through
/// December (11). Used both by the revenue forecaster's seasonality term
/// and as the fallback pattern when a landlord/city has too little booking
/// history for the seasonal analyser to compute its own index.
pub const SEASONAL_FACTORS: [f64; 12] = [
    0.85, 0.90, 1.00, 1.10, 1.05, 1.20, 1.30, 1.35, 1.15, 1.00, 0.85, 0.95,
];

/// Weights for the six landlord risk factors (spec.md §4.1.1). Sum to 1.0.
#[derive(Debug, Clone, Copy)]
pub struct LandlordWeights {
    pub payment_history: f64,
    pub registration_compliance: f64,
    pub portfolio_size: f64,
    pub account_age: f64,
    pub compliance_history: f64,
    pub response_time: f64,
}

impl Default for LandlordWeights {
    fn default() -> Self {
        Self {
            payment_history: 0.25,
            registration_compliance: 0.20,
            portfolio_size: 0.10,
            account_age: 0.10,
            compliance_history: 0.20,
            response_time: 0.15,
        }
    }
}

/// Weights for the six listing risk factors (spec.md §4.1.2). Sum to 1.0.
#[derive(Debug, Clone, Copy)]
pub struct ListingWeights {
    pub match_status: f64,
    pub activity_level: f64,
    pub revenue_estimate: f64,
    pub listing_age: f64,
    pub host_profile: f64,
    pub location_risk: f64,
}

impl Default for ListingWeights {
    fn default() -> Self {
        Self {
            match_status: 0.25,
            activity_level: 0.20,
            revenue_estimate: 0.20,
            listing_age: 0.10,
            host_profile: 0.15,
            location_risk: 0.10,
        }
    }
}

/// Weights for the five area risk factors (spec.md §4.1.3). Sum to 1.0.
#[derive(Debug, Clone, Copy)]
pub struct AreaWeights {
    pub compliance_rate: f64,
    pub unregistered_density: f64,
    pub revenue_impact: f64,
    pub enforcement_history: f64,
    pub growth_trend: f64,
}

impl Default for AreaWeights {
    fn default() -> Self {
        Self {
            compliance_rate: 0.30,
            unregistered_density: 0.25,
            revenue_impact: 0.20,
            enforcement_history: 0.15,
            growth_trend: 0.10,
        }
    }
}

/// Hotspot clustering parameters (spec.md §4.1.4).
#[derive(Debug, Clone, Copy)]
pub struct HotspotConfig {
    /// Clustering radius in degrees (~1km at the latitudes this service
    /// targets).
    pub epsilon_degrees: f64,
    pub min_cluster_size: usize,
}

impl Default for HotspotConfig {
    fn default() -> Self {
        Self {
            epsilon_degrees: 0.01,
            min_cluster_size: 3,
        }
    }
}

/// Revenue forecast smoothing/confidence parameters (spec.md §4.1.5).
#[derive(Debug, Clone, Copy)]
pub struct ForecastConfig {
    pub smoothing_alpha: f64,
    pub min_history_months: usize,
    pub slope_window_months: usize,
    pub base_confidence: f64,
    pub confidence_decay_per_month: f64,
    pub min_confidence: f64,
    pub margin_z_score: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            smoothing_alpha: 0.3,
            min_history_months: 3,
            slope_window_months: 6,
            base_confidence: 0.95,
            confidence_decay_per_month: 0.05,
            min_confidence: 0.5,
            margin_z_score: 1.96,
        }
    }
}

/// Seasonal analysis thresholds (spec.md §4.1.6).
#[derive(Debug, Clone, Copy)]
pub struct SeasonalConfig {
    pub high_season_index_threshold: f64,
    /// 30 nights/month x 100% occupancy cap used when computing
    /// avg_occupancy from booked nights.
    pub monthly_night_capacity: f64,
}

impl Default for SeasonalConfig {
    fn default() -> Self {
        Self {
            high_season_index_threshold: 1.15,
            monthly_night_capacity: 30.0 * 100.0,
        }
    }
}

/// Top-level scoring configuration bundle, built once and shared across
/// every scorer.
#[derive(Debug, Clone, Default)]
pub struct ScoringConfig {
    pub landlord_weights: LandlordWeights,
    pub listing_weights: ListingWeights,
    pub area_weights: AreaWeights,
    pub hotspot: HotspotConfig,
    pub forecast: ForecastConfig,
    pub seasonal: SeasonalConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_one(sum: f64) -> bool {
        (sum - 1.0).abs() < 1e-6
    }

    #[test]
    fn landlord_weights_sum_to_one() {
        let w = LandlordWeights::default();
        let sum = w.payment_history
            + w.registration_compliance
            + w.portfolio_size
            + w.account_age
            + w.compliance_history
            + w.response_time;
        assert!(approx_one(sum), "sum was {sum}");
    }

    #[test]
    fn listing_weights_sum_to_one() {
        let w = ListingWeights::default();
        let sum = w.match_status
            + w.activity_level
            + w.revenue_estimate
            + w.listing_age
            + w.host_profile
            + w.location_risk;
        assert!(approx_one(sum), "sum was {sum}");
    }

    #[test]
    fn area_weights_sum_to_one() {
        let w = AreaWeights::default();
        let sum = w.compliance_rate
            + w.unregistered_density
            + w.revenue_impact
            + w.enforcement_history
            + w.growth_trend;
        assert!(approx_one(sum), "sum was {sum}");
    }

    #[test]
    fn seasonal_factor_table_matches_spec() {
        assert_eq!(SEASONAL_FACTORS.len(), 12);
        assert!((SEASONAL_FACTORS[6] - 1.30).abs() < 1e-9);
        assert!((SEASONAL_FACTORS[7] - 1.35).abs() < 1e-9);
    }
}
