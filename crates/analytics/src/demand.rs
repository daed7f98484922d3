//! Demand pattern classification and forecast routing.
//!
//! Classifies each product's demand shape on the Syntetos–Boylan grid
//! (average demand interval × squared coefficient of variation) and routes
//! it to the one forecasting method suited to that shape, so a
//! trend-smoothing model never runs on sparse or bursty data.

use serde::{Deserialize, Serialize};
use tracing::debug;

use stocklens_core::records::OrderRecord;
use stocklens_core::series::{AnalysisWindow, monthly_sales_series};
use stocklens_core::stats;

use crate::forecast::{Forecast, ForecastMethod};

/// ADI cut point between regular and intermittent arrivals.
const ADI_CUTOFF: f64 = 1.32;
/// CV² cut point between low and high size variability.
const CV2_CUTOFF: f64 = 0.49;
/// ADI sentinel for products with no demand in the window.
const ADI_NO_DEMAND: f64 = 999.0;
/// CV² sentinel when fewer than 2 non-zero observations exist.
const CV2_INSUFFICIENT: f64 = 4.0;
/// Periods forecast ahead for every product.
const FORECAST_HORIZON: usize = 3;

/// Demand shape on the ADI × CV² grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemandPattern {
    Smooth,
    Intermittent,
    Erratic,
    Lumpy,
}

impl DemandPattern {
    /// Closed lower bounds: exactly ADI=1.32 lands in the `>=` branch.
    fn from_measures(adi: f64, cv_squared: f64) -> Self {
        match (adi < ADI_CUTOFF, cv_squared < CV2_CUTOFF) {
            (true, true) => DemandPattern::Smooth,
            (false, true) => DemandPattern::Intermittent,
            (true, false) => DemandPattern::Erratic,
            (false, false) => DemandPattern::Lumpy,
        }
    }

    /// The one forecasting method suited to this shape.
    pub fn forecast_method(&self) -> ForecastMethod {
        match self {
            DemandPattern::Smooth => ForecastMethod::DoubleExponentialSmoothing,
            DemandPattern::Intermittent => ForecastMethod::CrostonsMethod,
            DemandPattern::Erratic => ForecastMethod::WeightedMovingAverage,
            DemandPattern::Lumpy => ForecastMethod::MaxLevelBlend,
        }
    }
}

/// Per-product classification result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandClassification {
    pub product_id: String,
    pub pattern: DemandPattern,
    /// Average demand interval; 999 when the window saw no demand.
    pub adi: f64,
    /// Squared CV of non-zero demand sizes; 4 when fewer than 2 exist.
    pub cv_squared: f64,
    /// Name of the routed forecasting method.
    pub method: String,
    /// 3-period-ahead forecast.
    pub forecast: Vec<u32>,
    /// 0–100.
    pub confidence: u32,
    /// The raw monthly series, oldest first (for charting).
    pub monthly_series: Vec<f64>,
}

/// Aggregate counts plus the simple average of per-product confidences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandSummary {
    pub smooth: usize,
    pub intermittent: usize,
    pub erratic: usize,
    pub lumpy: usize,
    /// 0–100.
    pub avg_confidence: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandAnalysis {
    pub items: Vec<DemandClassification>,
    pub summary: DemandSummary,
}

/// Classify every product appearing in `orders` and forecast 3 periods ahead.
pub fn classify_demand(orders: &[OrderRecord], window: &AnalysisWindow) -> DemandAnalysis {
    let series_by_product = monthly_sales_series(orders, window);

    let mut items: Vec<DemandClassification> = series_by_product
        .into_iter()
        .map(|(product_id, series)| classify_product(product_id, series))
        .collect();
    // HashMap iteration order is arbitrary; fix it for stable output.
    items.sort_by(|a, b| a.product_id.cmp(&b.product_id));

    let summary = summarize(&items);
    debug!(
        products = items.len(),
        smooth = summary.smooth,
        intermittent = summary.intermittent,
        erratic = summary.erratic,
        lumpy = summary.lumpy,
        "classified demand patterns"
    );

    DemandAnalysis { items, summary }
}

fn classify_product(product_id: String, series: Vec<f64>) -> DemandClassification {
    let (adi, cv_squared) = demand_measures(&series);
    let pattern = DemandPattern::from_measures(adi, cv_squared);
    let method = pattern.forecast_method();
    let Forecast { values, confidence } = method.forecast(&series, FORECAST_HORIZON);

    DemandClassification {
        product_id,
        pattern,
        adi,
        cv_squared,
        method: method.name().to_string(),
        forecast: values,
        confidence,
        monthly_series: series,
    }
}

/// (ADI, CV²) with the documented sentinels for insufficient data.
fn demand_measures(series: &[f64]) -> (f64, f64) {
    let non_zero: Vec<f64> = series.iter().copied().filter(|v| *v > 0.0).collect();

    let adi = if non_zero.is_empty() {
        ADI_NO_DEMAND
    } else {
        series.len() as f64 / non_zero.len() as f64
    };

    let cv_squared = if non_zero.len() < 2 {
        CV2_INSUFFICIENT
    } else {
        let cv = stats::coefficient_of_variation(&non_zero);
        cv * cv
    };

    (adi, cv_squared)
}

fn summarize(items: &[DemandClassification]) -> DemandSummary {
    let mut summary = DemandSummary::default();
    for item in items {
        match item.pattern {
            DemandPattern::Smooth => summary.smooth += 1,
            DemandPattern::Intermittent => summary.intermittent += 1,
            DemandPattern::Erratic => summary.erratic += 1,
            DemandPattern::Lumpy => summary.lumpy += 1,
        }
    }
    if !items.is_empty() {
        let total: u32 = items.iter().map(|i| i.confidence).sum();
        summary.avg_confidence = (total as f64 / items.len() as f64).round() as u32;
    }
    summary
}
