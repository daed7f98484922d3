//! Monte Carlo stockout-risk simulation.
//!
//! Repeated random depletion trials per product build an empirical
//! distribution of the day stock runs out. Daily demand is drawn from a
//! normal fitted to the monthly series (monthly / 30), clamped at zero.
//! Randomness comes through the injectable [`RandomSource`] so a fixed seed
//! reproduces the exact distribution.

use serde::{Deserialize, Serialize};
use tracing::debug;

use stocklens_core::error::{EngineError, EngineResult};
use stocklens_core::random::RandomSource;
use stocklens_core::records::{OrderRecord, ProductSnapshot};
use stocklens_core::series::{AnalysisWindow, monthly_sales_series};
use stocklens_core::stats;

/// 95% service level factor for safety stock.
const SERVICE_LEVEL_Z: f64 = 1.645;
/// Depletion horizon per trial. The report days (7..90) assume this value;
/// trials that never stock out record `HORIZON_DAYS + 1`.
const HORIZON_DAYS: u32 = 90;
/// Histogram bucket width in days.
const BUCKET_DAYS: u32 = 5;

/// Simulation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockoutConfig {
    pub simulation_count: usize,
    pub lead_time_days: u32,
}

impl Default for StockoutConfig {
    fn default() -> Self {
        Self {
            simulation_count: 500,
            lead_time_days: 14,
        }
    }
}

impl StockoutConfig {
    pub fn with_simulation_count(mut self, count: usize) -> Self {
        self.simulation_count = count;
        self
    }

    pub fn with_lead_time_days(mut self, days: u32) -> Self {
        self.lead_time_days = days;
        self
    }

    fn validate(&self) -> EngineResult<()> {
        if self.simulation_count == 0 {
            return Err(EngineError::invalid_parameter(
                "simulation_count must be at least 1",
            ));
        }
        if self.lead_time_days == 0 {
            return Err(EngineError::invalid_parameter(
                "lead_time_days must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Empirical stockout probabilities at the standard report horizons (0–1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockoutProbabilities {
    pub day_7: f64,
    pub day_14: f64,
    pub day_30: f64,
    pub day_60: f64,
    pub day_90: f64,
}

/// One 5-day histogram bucket of simulated stockout days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramBucket {
    pub from_day: u32,
    pub to_day: u32,
    pub trials: usize,
}

/// Four-level risk classification keyed off the 30-day probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockoutRiskLevel {
    Critical,
    High,
    Medium,
    Low,
}

impl StockoutRiskLevel {
    fn from_day30_probability(p: f64) -> Self {
        if p >= 0.8 {
            StockoutRiskLevel::Critical
        } else if p >= 0.5 {
            StockoutRiskLevel::High
        } else if p >= 0.2 {
            StockoutRiskLevel::Medium
        } else {
            StockoutRiskLevel::Low
        }
    }
}

/// Per-product simulation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockoutRisk {
    pub product_id: String,
    pub current_stock: u32,
    pub avg_daily_demand: f64,
    pub daily_std_dev: f64,
    pub probabilities: StockoutProbabilities,
    /// Median simulated stockout day; `horizon + 1` means the median trial
    /// survived the whole horizon.
    pub median_stockout_day: u32,
    /// 95%-service-level buffer over the configured lead time.
    pub safety_stock: u32,
    pub histogram: Vec<HistogramBucket>,
    /// Trials that never stocked out within the horizon.
    pub survived_trials: usize,
    pub risk: StockoutRiskLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockoutAnalysis {
    pub items: Vec<StockoutRisk>,
    /// Mean 30-day stockout probability across simulated products, 0–100.
    pub aggregate_risk_score: u32,
}

/// Simulate stockout-day distributions for every product with positive
/// stock and at least one month of recorded sales.
pub fn simulate_stockouts(
    inventory: &[ProductSnapshot],
    orders: &[OrderRecord],
    window: &AnalysisWindow,
    config: &StockoutConfig,
    random: &mut dyn RandomSource,
) -> EngineResult<StockoutAnalysis> {
    config.validate()?;

    let series_by_product = monthly_sales_series(orders, window);

    let mut items = Vec::new();
    for product in inventory {
        if product.quantity == 0 {
            continue;
        }
        let Some(series) = series_by_product.get(&product.product_id) else {
            continue;
        };
        if !series.iter().any(|v| *v > 0.0) {
            continue;
        }
        items.push(simulate_product(product, series, config, random));
    }

    let aggregate_risk_score = if items.is_empty() {
        0
    } else {
        let total: f64 = items.iter().map(|i| i.probabilities.day_30).sum();
        (total / items.len() as f64 * 100.0).round() as u32
    };
    debug!(
        products = items.len(),
        trials = config.simulation_count,
        aggregate_risk_score,
        "simulated stockout distributions"
    );

    Ok(StockoutAnalysis {
        items,
        aggregate_risk_score,
    })
}

fn simulate_product(
    product: &ProductSnapshot,
    series: &[f64],
    config: &StockoutConfig,
    random: &mut dyn RandomSource,
) -> StockoutRisk {
    let daily_mean = stats::mean(series) / 30.0;
    let daily_std = stats::std_dev(series) / 30.0;

    let mut stockout_days = Vec::with_capacity(config.simulation_count);
    for _ in 0..config.simulation_count {
        stockout_days.push(run_trial(
            product.quantity as f64,
            daily_mean,
            daily_std,
            random,
        ));
    }
    stockout_days.sort_unstable();

    let probabilities = StockoutProbabilities {
        day_7: probability_by(&stockout_days, 7),
        day_14: probability_by(&stockout_days, 14),
        day_30: probability_by(&stockout_days, 30),
        day_60: probability_by(&stockout_days, 60),
        day_90: probability_by(&stockout_days, 90),
    };

    let median_stockout_day = stockout_days[stockout_days.len() / 2];
    let safety_stock = (SERVICE_LEVEL_Z * daily_std * (config.lead_time_days as f64).sqrt())
        .round() as u32;
    let survived_trials = stockout_days.iter().filter(|d| **d > HORIZON_DAYS).count();

    StockoutRisk {
        product_id: product.product_id.clone(),
        current_stock: product.quantity,
        avg_daily_demand: daily_mean,
        daily_std_dev: daily_std,
        probabilities,
        median_stockout_day,
        safety_stock,
        histogram: build_histogram(&stockout_days),
        survived_trials,
        risk: StockoutRiskLevel::from_day30_probability(probabilities.day_30),
    }
}

/// One depletion trial; returns the day stock hit zero, or `HORIZON_DAYS + 1`.
fn run_trial(
    starting_stock: f64,
    daily_mean: f64,
    daily_std: f64,
    random: &mut dyn RandomSource,
) -> u32 {
    let mut stock = starting_stock;
    for day in 1..=HORIZON_DAYS {
        let demand = random.next_normal(daily_mean, daily_std).max(0.0);
        stock -= demand;
        if stock <= 0.0 {
            return day;
        }
    }
    HORIZON_DAYS + 1
}

fn probability_by(sorted_days: &[u32], day: u32) -> f64 {
    let hits = sorted_days.partition_point(|d| *d <= day);
    hits as f64 / sorted_days.len() as f64
}

fn build_histogram(sorted_days: &[u32]) -> Vec<HistogramBucket> {
    let mut buckets = Vec::new();
    let mut from = 1u32;
    while from <= HORIZON_DAYS {
        let to = (from + BUCKET_DAYS - 1).min(HORIZON_DAYS);
        let trials = sorted_days
            .iter()
            .filter(|d| (from..=to).contains(*d))
            .count();
        buckets.push(HistogramBucket {
            from_day: from,
            to_day: to,
            trials,
        });
        from = to + 1;
    }
    buckets
}
