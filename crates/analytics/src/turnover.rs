//! Inventory turnover rate and supply-days classification.

use serde::{Deserialize, Serialize};

use stocklens_core::records::{OrderRecord, ProductSnapshot};
use stocklens_core::series::{AnalysisWindow, monthly_sales_series};
use stocklens_core::stats::round2;

/// Sentinel supply-days when stock never turns.
const NO_TURNOVER_DAYS: u32 = 999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnoverClass {
    /// Turns 8+ times a year.
    Fast,
    /// 4–8 turns a year.
    Normal,
    /// 1–4 turns a year.
    Slow,
    /// Under one turn a year.
    Stagnant,
}

impl TurnoverClass {
    fn from_rate(rate: f64) -> Self {
        if rate >= 8.0 {
            TurnoverClass::Fast
        } else if rate >= 4.0 {
            TurnoverClass::Normal
        } else if rate >= 1.0 {
            TurnoverClass::Slow
        } else {
            TurnoverClass::Stagnant
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnoverItem {
    pub product_id: String,
    pub name: String,
    /// Window sales annualized, valued at cost.
    pub annual_cogs: f64,
    /// On-hand stock valued at cost.
    pub stock_value: f64,
    pub turnover_rate: f64,
    pub class: TurnoverClass,
    /// `365 / turnover_rate`; 999 when stock never turns.
    pub supply_days: u32,
}

/// Turnover per product, slowest movers last (sorted by rate descending).
pub fn analyze_turnover(
    inventory: &[ProductSnapshot],
    orders: &[OrderRecord],
    window: &AnalysisWindow,
) -> Vec<TurnoverItem> {
    let series_by_product = monthly_sales_series(orders, window);
    let annualize = 12.0 / window.months() as f64;

    let mut items: Vec<TurnoverItem> = inventory
        .iter()
        .map(|product| {
            let window_quantity: f64 = series_by_product
                .get(&product.product_id)
                .map(|series| series.iter().sum())
                .unwrap_or(0.0);
            let annual_cogs = window_quantity * annualize * product.cost_price;
            let stock_value = product.quantity as f64 * product.cost_price;

            let rate = annual_cogs / stock_value.max(1.0);
            let supply_days = if rate > 0.0 {
                (365.0 / rate).round() as u32
            } else {
                NO_TURNOVER_DAYS
            };

            TurnoverItem {
                product_id: product.product_id.clone(),
                name: product.name.clone(),
                annual_cogs: round2(annual_cogs),
                stock_value: round2(stock_value),
                turnover_rate: round2(rate),
                class: TurnoverClass::from_rate(rate),
                supply_days,
            }
        })
        .collect();

    items.sort_by(|a, b| b.turnover_rate.total_cmp(&a.turnover_rate));
    items
}
