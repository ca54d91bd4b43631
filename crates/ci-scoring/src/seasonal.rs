//! Seasonal pattern analyser (spec.md §4.1.6): groups bookings by calendar
//! month across years and derives an occupancy/revenue profile plus a
//! year-over-year trend.

use chrono::{Datelike, NaiveDate};
use ci_config::ScoringConfig;
use ci_types::{Booking, SeasonalAnalysis, SeasonalMonthSummary};
use std::collections::HashSet;

struct MonthAccumulator {
    years: HashSet<i32>,
    total_nights: u32,
    total_revenue: f64,
    booking_count: u32,
}

impl MonthAccumulator {
    fn new() -> Self {
        Self {
            years: HashSet::new(),
            total_nights: 0,
            total_revenue: 0.0,
            booking_count: 0,
        }
    }
}

fn coefficient_of_variation(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if n == 0.0 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / n;
    if mean == 0.0 {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt() / mean
}

/// Analyses a booking history into a twelve-month seasonal profile. When a
/// calendar month has no observed bookings, its revenue index falls back
/// to the fixed `SEASONAL_FACTORS` table entry (spec.md §6).
pub fn analyze_seasonality(
    bookings: &[Booking],
    as_of: NaiveDate,
    config: &ScoringConfig,
) -> SeasonalAnalysis {
    let mut accumulators: Vec<MonthAccumulator> = (0..12).map(|_| MonthAccumulator::new()).collect();
    for booking in bookings {
        let month_idx = booking.check_in_date.month0() as usize;
        let acc = &mut accumulators[month_idx];
        acc.years.insert(booking.check_in_date.year());
        acc.total_nights += booking.total_nights;
        acc.total_revenue += booking.revenue;
        acc.booking_count += 1;
    }

    let capacity_nights_per_occurrence = config.seasonal.monthly_night_capacity / 100.0;

    let avg_revenue_per_month: Vec<Option<f64>> = accumulators
        .iter()
        .map(|acc| {
            if acc.years.is_empty() {
                None
            } else {
                Some(acc.total_revenue / acc.years.len() as f64)
            }
        })
        .collect();

    let observed_avgs: Vec<f64> = avg_revenue_per_month.iter().filter_map(|v| *v).collect();
    let overall_avg_revenue = if observed_avgs.is_empty() {
        1.0
    } else {
        observed_avgs.iter().sum::<f64>() / observed_avgs.len() as f64
    };

    let months: Vec<SeasonalMonthSummary> = accumulators
        .iter()
        .enumerate()
        .map(|(idx, acc)| {
            let occurrences = acc.years.len() as f64;
            let (avg_occupancy, avg_bookings, revenue_index) = if occurrences > 0.0 {
                let occupancy = (acc.total_nights as f64
                    / (occurrences * capacity_nights_per_occurrence)
                    * 100.0)
                    .min(100.0);
                let bookings_avg = acc.booking_count as f64 / occurrences;
                let index = avg_revenue_per_month[idx].unwrap() / overall_avg_revenue;
                (occupancy, bookings_avg, index)
            } else {
                (0.0, 0.0, ci_config::SEASONAL_FACTORS[idx])
            };
            SeasonalMonthSummary {
                month: idx as u32 + 1,
                avg_occupancy,
                avg_bookings,
                revenue_index,
                is_high_season: revenue_index >= config.seasonal.high_season_index_threshold,
            }
        })
        .collect();

    let revenue_indices: Vec<f64> = months.iter().map(|m| m.revenue_index).collect();
    let seasonality_index = coefficient_of_variation(&revenue_indices);
    let peak_months: Vec<u32> = months
        .iter()
        .filter(|m| m.is_high_season)
        .map(|m| m.month)
        .collect();

    let this_year = as_of.year();
    let day_of_year = as_of.ordinal();
    let this_year_to_date: f64 = bookings
        .iter()
        .filter(|b| b.check_in_date.year() == this_year && b.check_in_date.ordinal() <= day_of_year)
        .map(|b| b.revenue)
        .sum();
    let last_year_same_span: f64 = bookings
        .iter()
        .filter(|b| {
            b.check_in_date.year() == this_year - 1 && b.check_in_date.ordinal() <= day_of_year
        })
        .map(|b| b.revenue)
        .sum();
    let year_over_year_trend_pct = if last_year_same_span > 0.0 {
        (this_year_to_date - last_year_same_span) / last_year_same_span * 100.0
    } else {
        0.0
    };

    SeasonalAnalysis {
        months,
        seasonality_index,
        year_over_year_trend_pct,
        peak_months,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(check_in: NaiveDate, nights: u32, revenue: f64) -> Booking {
        Booking {
            check_in_date: check_in,
            check_out_date: check_in + chrono::Duration::days(nights as i64),
            total_nights: nights,
            revenue,
        }
    }

    /// Scenario 10 from spec.md §8: synthetic 2-year input with a single
    /// spike month.
    #[test]
    fn spike_month_is_reported_as_peak() {
        let mut bookings = Vec::new();
        for year in [2024, 2025] {
            for month in 1..=12u32 {
                let day = NaiveDate::from_ymd_opt(year, month, 5).unwrap();
                let revenue = if month == 8 { 10_000.0 } else { 1_000.0 };
                bookings.push(booking(day, 10, revenue));
            }
        }
        let config = ci_config::ScoringConfig::default();
        let as_of = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();

        let analysis = analyze_seasonality(&bookings, as_of, &config);

        assert!(analysis.peak_months.contains(&8));
        let august = analysis.months.iter().find(|m| m.month == 8).unwrap();
        assert!(august.is_high_season);
        assert!(august.revenue_index > 1.15);
    }

    #[test]
    fn months_without_data_fall_back_to_seasonal_table() {
        let bookings = vec![booking(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), 5, 500.0)];
        let config = ci_config::ScoringConfig::default();
        let as_of = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let analysis = analyze_seasonality(&bookings, as_of, &config);
        let march = analysis.months.iter().find(|m| m.month == 3).unwrap();
        assert!((march.revenue_index - ci_config::SEASONAL_FACTORS[2]).abs() < 1e-9);
    }
}
