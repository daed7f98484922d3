//! Interchangeable forecasting strategies.
//!
//! All four methods share one contract: `(series, horizon)` in, an integer
//! per-period forecast plus a 0–100 confidence out. Forecast values are
//! floored at 0 and rounded to the nearest whole unit. Whenever a method's
//! minimum-data precondition fails it degrades to the flat-average fallback
//! at confidence 15.

use serde::{Deserialize, Serialize};

use stocklens_core::stats;

/// Holt level smoothing constant.
const HOLT_ALPHA: f64 = 0.3;
/// Holt trend smoothing constant.
const HOLT_BETA: f64 = 0.1;
/// Croston smoothing constant for sizes and intervals.
const CROSTON_ALPHA: f64 = 0.2;
/// Confidence assigned when a method falls back to the flat average.
const FALLBACK_CONFIDENCE: u32 = 15;

/// Forecast for a fixed horizon: one value per future period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forecast {
    pub values: Vec<u32>,
    /// 0–100.
    pub confidence: u32,
}

/// The four demand-shape-specific strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    /// Holt double exponential smoothing, for smooth demand.
    DoubleExponentialSmoothing,
    /// Croston's intermittent-demand method.
    CrostonsMethod,
    /// Recency-weighted moving average, for erratic demand.
    WeightedMovingAverage,
    /// Conservative high-side blend, for lumpy demand.
    MaxLevelBlend,
}

impl ForecastMethod {
    pub fn name(&self) -> &'static str {
        match self {
            ForecastMethod::DoubleExponentialSmoothing => "double_exponential_smoothing",
            ForecastMethod::CrostonsMethod => "crostons_method",
            ForecastMethod::WeightedMovingAverage => "weighted_moving_average",
            ForecastMethod::MaxLevelBlend => "max_level_blend",
        }
    }

    pub fn forecast(&self, series: &[f64], horizon: usize) -> Forecast {
        match self {
            ForecastMethod::DoubleExponentialSmoothing => holt(series, horizon),
            ForecastMethod::CrostonsMethod => croston(series, horizon),
            ForecastMethod::WeightedMovingAverage => weighted_moving_average(series, horizon),
            ForecastMethod::MaxLevelBlend => max_level_blend(series, horizon),
        }
    }
}

/// Flat forecast at the historical average.
pub fn fallback_forecast(series: &[f64], horizon: usize) -> Forecast {
    let level = stats::mean(series);
    Forecast {
        values: vec![to_units(level); horizon],
        confidence: FALLBACK_CONFIDENCE,
    }
}

fn to_units(value: f64) -> u32 {
    value.max(0.0).round() as u32
}

fn clamp_confidence(value: f64) -> u32 {
    value.round().clamp(0.0, 100.0) as u32
}

/// Holt double exponential smoothing (level α=0.3, trend β=0.1).
///
/// Confidence is `max(10, 100 − MAPE)` where MAPE compares one-step-ahead
/// fitted values against actuals, skipping zero-demand periods.
fn holt(series: &[f64], horizon: usize) -> Forecast {
    if series.len() < 3 {
        return fallback_forecast(series, horizon);
    }

    let mut level = series[0];
    let mut trend = series[1] - series[0];
    let mut fitted = Vec::with_capacity(series.len() - 1);

    for &observed in &series[1..] {
        fitted.push(level + trend);
        let next_level = HOLT_ALPHA * observed + (1.0 - HOLT_ALPHA) * (level + trend);
        trend = HOLT_BETA * (next_level - level) + (1.0 - HOLT_BETA) * trend;
        level = next_level;
    }

    let values = (1..=horizon)
        .map(|step| to_units(level + trend * step as f64))
        .collect();

    let error = stats::mape(&series[1..], &fitted);
    Forecast {
        values,
        confidence: clamp_confidence((100.0 - error).max(10.0)),
    }
}

/// Croston's method (α=0.2): smooth non-zero demand sizes and the intervals
/// between them separately; per-period forecast = size / interval.
///
/// Confidence scales with the fraction of periods that saw any demand,
/// capped at 70.
fn croston(series: &[f64], horizon: usize) -> Forecast {
    let occurrences: Vec<(usize, f64)> = series
        .iter()
        .enumerate()
        .filter(|(_, v)| **v > 0.0)
        .map(|(i, v)| (i, *v))
        .collect();

    if occurrences.len() < 2 {
        return fallback_forecast(series, horizon);
    }

    let gaps: Vec<f64> = occurrences
        .windows(2)
        .map(|pair| (pair[1].0 - pair[0].0) as f64)
        .collect();

    let mut size = occurrences[0].1;
    for &(_, demand) in &occurrences[1..] {
        size = CROSTON_ALPHA * demand + (1.0 - CROSTON_ALPHA) * size;
    }

    let mut interval = gaps[0];
    for &gap in &gaps[1..] {
        interval = CROSTON_ALPHA * gap + (1.0 - CROSTON_ALPHA) * interval;
    }

    let per_period = if interval > 0.0 { size / interval } else { 0.0 };
    let demand_fraction = occurrences.len() as f64 / series.len() as f64;

    Forecast {
        values: vec![to_units(per_period); horizon],
        confidence: clamp_confidence((demand_fraction * 100.0).min(70.0)),
    }
}

/// Weighted moving average over the last `min(6, len)` periods with
/// exponentially doubling weights, most recent highest.
///
/// Confidence shrinks as overall series variation grows:
/// `max(10, 60 − CV·20)`.
fn weighted_moving_average(series: &[f64], horizon: usize) -> Forecast {
    if series.is_empty() {
        return fallback_forecast(series, horizon);
    }

    let window = &series[series.len() - series.len().min(6)..];
    let mut weighted = 0.0;
    let mut weight_sum = 0.0;
    for (i, value) in window.iter().enumerate() {
        let weight = (1u64 << i) as f64;
        weighted += weight * value;
        weight_sum += weight;
    }
    let level = weighted / weight_sum;

    let cv = stats::coefficient_of_variation(series);
    Forecast {
        values: vec![to_units(level); horizon],
        confidence: clamp_confidence((60.0 - cv * 20.0).max(10.0)),
    }
}

/// Lumpy-demand blend: `0.7·max(last 6) + 0.3·overall average`.
///
/// Deliberately high-side (lumpy demand risks stockouts); confidence is a
/// fixed low 30.
fn max_level_blend(series: &[f64], horizon: usize) -> Forecast {
    if series.is_empty() {
        return fallback_forecast(series, horizon);
    }

    let recent = &series[series.len() - series.len().min(6)..];
    let peak = recent.iter().copied().fold(0.0f64, f64::max);
    let level = 0.7 * peak + 0.3 * stats::mean(series);

    Forecast {
        values: vec![to_units(level); horizon],
        confidence: 30,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holt_follows_a_linear_trend() {
        let series = vec![10.0, 12.0, 14.0, 16.0, 18.0, 20.0];
        let forecast = ForecastMethod::DoubleExponentialSmoothing.forecast(&series, 3);

        assert_eq!(forecast.values.len(), 3);
        // A clean upward trend keeps projecting upward.
        assert!(forecast.values[0] >= 20);
        assert!(forecast.values[2] >= forecast.values[0]);
        // Perfectly linear data fits well.
        assert!(forecast.confidence > 80, "confidence={}", forecast.confidence);
    }

    #[test]
    fn holt_needs_three_points() {
        let forecast = ForecastMethod::DoubleExponentialSmoothing.forecast(&[5.0, 7.0], 2);
        assert_eq!(forecast.confidence, 15);
        assert_eq!(forecast.values, vec![6, 6]);
    }

    #[test]
    fn croston_flat_forecast_near_demand_over_interval() {
        // Demand every 3rd month, sizes around 5.
        let series = vec![0.0, 0.0, 5.0, 0.0, 0.0, 6.0, 0.0, 0.0, 4.0, 0.0, 0.0, 5.0];
        let forecast = ForecastMethod::CrostonsMethod.forecast(&series, 3);

        // Smoothed size ≈ 5, smoothed interval = 3 → ≈ 1.67 → rounds to 2.
        assert_eq!(forecast.values, vec![2, 2, 2]);
        // 4 demand months out of 12 → 33%.
        assert_eq!(forecast.confidence, 33);
    }

    #[test]
    fn croston_confidence_caps_at_70() {
        let series = vec![3.0, 4.0, 0.0, 5.0, 6.0, 4.0, 5.0, 3.0];
        let forecast = ForecastMethod::CrostonsMethod.forecast(&series, 1);
        assert_eq!(forecast.confidence, 70);
    }

    #[test]
    fn croston_falls_back_on_single_demand_month() {
        let series = vec![0.0, 0.0, 8.0, 0.0];
        let forecast = ForecastMethod::CrostonsMethod.forecast(&series, 2);
        assert_eq!(forecast.confidence, 15);
        assert_eq!(forecast.values, vec![2, 2]);
    }

    #[test]
    fn weighted_average_leans_toward_recent_months() {
        let series = vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 10.0, 10.0];
        let forecast = ForecastMethod::WeightedMovingAverage.forecast(&series, 1);
        // Last two months dominate the doubling weights.
        assert!(forecast.values[0] >= 7, "values={:?}", forecast.values);
    }

    #[test]
    fn max_level_blend_stays_high_side() {
        let series = vec![0.0, 0.0, 20.0, 0.0, 0.0, 0.0, 0.0, 2.0];
        let forecast = ForecastMethod::MaxLevelBlend.forecast(&series, 2);

        // 0.7·max(last 6) + 0.3·avg = 0.7·20 + 0.3·2.75 ≈ 14.8.
        assert_eq!(forecast.values, vec![15, 15]);
        assert_eq!(forecast.confidence, 30);
    }

    #[test]
    fn forecasts_never_go_negative() {
        let series = vec![30.0, 20.0, 10.0, 5.0, 1.0, 0.0];
        for method in [
            ForecastMethod::DoubleExponentialSmoothing,
            ForecastMethod::CrostonsMethod,
            ForecastMethod::WeightedMovingAverage,
            ForecastMethod::MaxLevelBlend,
        ] {
            let forecast = method.forecast(&series, 6);
            assert_eq!(forecast.values.len(), 6);
            // u32 already enforces the floor; confidence stays in range.
            assert!(forecast.confidence <= 100);
        }
    }
}
