//! Revenue forecaster (spec.md §4.1.5): simple exponential smoothing plus
//! a linear trend term and a fixed monthly seasonal multiplier.

use chrono::{Datelike, NaiveDate};
use ci_config::ScoringConfig;
use ci_types::RevenueForecastPoint;

fn smoothed_level(history: &[f64], alpha: f64) -> f64 {
    let mut level = history[0];
    for value in &history[1..] {
        level = alpha * value + (1.0 - alpha) * level;
    }
    level
}

fn linear_slope(window: &[f64]) -> f64 {
    let n = window.len() as f64;
    if n < 2.0 {
        return 0.0;
    }
    let xs: Vec<f64> = (0..window.len()).map(|i| i as f64).collect();
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = window.iter().sum::<f64>() / n;
    let numerator: f64 = xs
        .iter()
        .zip(window)
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();
    let denominator: f64 = xs.iter().map(|x| (x - mean_x).powi(2)).sum();
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

fn stdev(history: &[f64]) -> f64 {
    let n = history.len() as f64;
    if n < 2.0 {
        return 0.0;
    }
    let mean = history.iter().sum::<f64>() / n;
    let variance = history.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt()
}

fn month_label(start: NaiveDate, months_ahead: u32) -> (String, usize) {
    let total_months0 = start.month0() as i64 + months_ahead as i64;
    let year = start.year() + (total_months0 / 12) as i32;
    let month0 = (total_months0 % 12) as u32;
    (format!("{year:04}-{:02}", month0 + 1), month0 as usize)
}

/// Forecasts `horizon_months` ahead of `history`'s final month (`as_of`).
/// `history` holds monthly totals of completed payments, oldest first.
/// Returns an empty vec when `history.len() < min_history_months`
/// (spec.md §4.1.5).
pub fn forecast_revenue(
    history: &[f64],
    horizon_months: u32,
    as_of: NaiveDate,
    config: &ScoringConfig,
) -> Vec<RevenueForecastPoint> {
    let cfg = &config.forecast;
    if history.len() < cfg.min_history_months {
        return Vec::new();
    }

    let smoothed = smoothed_level(history, cfg.smoothing_alpha);
    let window_len = history.len().min(cfg.slope_window_months);
    let slope = linear_slope(&history[history.len() - window_len..]);
    let history_stdev = stdev(history);

    (1..=horizon_months)
        .map(|m| {
            let (month, month0) = month_label(as_of, m);
            let seasonal = ci_config::SEASONAL_FACTORS[month0];
            let predicted = (smoothed + slope * m as f64) * seasonal;
            let confidence = (cfg.base_confidence - cfg.confidence_decay_per_month * m as f64)
                .max(cfg.min_confidence);
            let margin = history_stdev * (1.0 + 0.1 * m as f64) * cfg.margin_z_score;
            RevenueForecastPoint {
                month_offset: m,
                month,
                predicted,
                confidence,
                lower_bound: (predicted - margin).max(0.0),
                upper_bound: predicted + margin,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scenario 4 from spec.md §8.
    #[test]
    fn six_month_history_forecasts_three_months_with_expected_confidence() {
        let history = vec![1000.0, 1100.0, 1200.0, 1100.0, 1300.0, 1400.0];
        let config = ci_config::ScoringConfig::default();
        let as_of = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();

        let forecasts = forecast_revenue(&history, 3, as_of, &config);

        assert_eq!(forecasts.len(), 3);
        let expected_confidence = [0.90, 0.85, 0.80];
        for (point, expected) in forecasts.iter().zip(expected_confidence) {
            assert!(point.predicted > 0.0);
            assert!((point.confidence - expected).abs() < 1e-9);
            assert!(point.lower_bound <= point.predicted);
            assert!(point.predicted <= point.upper_bound);
        }
    }

    #[test]
    fn bounds_widen_and_lower_bound_never_negative() {
        let history = vec![500.0, 100.0, 900.0, 50.0, 1200.0];
        let config = ci_config::ScoringConfig::default();
        let as_of = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let forecasts = forecast_revenue(&history, 5, as_of, &config);

        assert_eq!(forecasts.len(), 5);
        for point in &forecasts {
            assert!(point.lower_bound >= 0.0);
        }
        let first_width = forecasts[0].upper_bound - forecasts[0].lower_bound;
        let last_width = forecasts[4].upper_bound - forecasts[4].lower_bound;
        assert!(last_width >= first_width);
    }

    #[test]
    fn too_little_history_returns_empty() {
        let config = ci_config::ScoringConfig::default();
        let as_of = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert!(forecast_revenue(&[100.0, 200.0], 3, as_of, &config).is_empty());
    }
}
