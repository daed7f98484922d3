//! EOQ-based reorder policy optimization.
//!
//! Computes economic order quantity, safety stock, and reorder point per
//! product, then projects annual cost savings against the current reorder
//! behavior (batching by `min_quantity`). Zero-demand products still get a
//! row: every formula degrades through its floor instead of erroring, so a
//! stocked-out item with no sales history is reported rather than skipped.

use serde::{Deserialize, Serialize};
use tracing::debug;

use stocklens_core::records::{OrderRecord, ProductSnapshot};
use stocklens_core::series::{AnalysisWindow, monthly_sales_series};
use stocklens_core::stats::{self, round2};

/// Ordering cost as a share of unit cost.
const ORDER_COST_RATE: f64 = 0.05;
/// Annual holding cost as a share of unit cost.
const HOLDING_COST_RATE: f64 = 0.20;
/// 95% service level factor.
const SERVICE_LEVEL_Z: f64 = 1.645;
/// Replenishment lead time assumed for safety stock and reorder point.
const LEAD_TIME_DAYS: f64 = 14.0;

/// Reorder policy for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderItem {
    pub product_id: String,
    pub sku: String,
    pub current_stock: u32,
    pub min_quantity: u32,
    pub avg_daily_demand: f64,
    /// Economic order quantity, never below 1.
    pub eoq: u32,
    /// 95%-service-level buffer, never below 1.
    pub safety_stock: u32,
    /// Stock level that should trigger a purchase order.
    pub reorder_point: u32,
    pub needs_reorder: bool,
    /// Annual ordering + holding cost under the current batch size.
    pub current_annual_cost: f64,
    /// Annual ordering + holding cost under EOQ batching.
    pub optimized_annual_cost: f64,
    /// Percentage saved by switching to EOQ, 0–100.
    pub savings_pct: f64,
}

/// Compute reorder policies for every product in the snapshot.
///
/// Sorted with reorder-needed items first, then by ascending current stock.
pub fn optimize_reorders(
    inventory: &[ProductSnapshot],
    orders: &[OrderRecord],
    window: &AnalysisWindow,
) -> Vec<ReorderItem> {
    let series_by_product = monthly_sales_series(orders, window);
    let empty_series = vec![0.0; window.months()];

    let mut items: Vec<ReorderItem> = inventory
        .iter()
        .map(|product| {
            let series = series_by_product
                .get(&product.product_id)
                .unwrap_or(&empty_series);
            optimize_product(product, series)
        })
        .collect();

    items.sort_by(|a, b| {
        b.needs_reorder
            .cmp(&a.needs_reorder)
            .then(a.current_stock.cmp(&b.current_stock))
    });
    debug!(
        products = items.len(),
        flagged = items.iter().filter(|i| i.needs_reorder).count(),
        "optimized reorder policies"
    );
    items
}

fn optimize_product(product: &ProductSnapshot, series: &[f64]) -> ReorderItem {
    let daily_demand = stats::mean(series) / 30.0;
    let daily_std = stats::std_dev(series) / 30.0;
    let annual_demand = daily_demand * 365.0;

    let order_cost = ORDER_COST_RATE * product.cost_price;
    let holding_cost = HOLDING_COST_RATE * product.cost_price;

    let eoq = if annual_demand > 0.0 && holding_cost > 0.0 {
        ((2.0 * annual_demand * order_cost / holding_cost).sqrt().round() as u32).max(1)
    } else {
        1
    };

    let safety_stock =
        ((SERVICE_LEVEL_Z * daily_std * LEAD_TIME_DAYS.sqrt()).round() as u32).max(1);
    let reorder_point = (daily_demand * LEAD_TIME_DAYS + safety_stock as f64).ceil() as u32;

    let current_batch = if product.min_quantity > 0 {
        product.min_quantity
    } else {
        eoq
    };
    let current_annual_cost = annual_policy_cost(annual_demand, current_batch, order_cost, holding_cost);
    let optimized_annual_cost = annual_policy_cost(annual_demand, eoq, order_cost, holding_cost);
    let savings_pct = if current_annual_cost > 0.0 {
        round2((current_annual_cost - optimized_annual_cost) / current_annual_cost * 100.0)
    } else {
        0.0
    };

    ReorderItem {
        product_id: product.product_id.clone(),
        sku: product.sku.clone(),
        current_stock: product.quantity,
        min_quantity: product.min_quantity,
        avg_daily_demand: round2(daily_demand),
        eoq,
        safety_stock,
        reorder_point,
        needs_reorder: product.quantity <= reorder_point,
        current_annual_cost: round2(current_annual_cost),
        optimized_annual_cost: round2(optimized_annual_cost),
        savings_pct,
    }
}

/// Annual ordering cost + average holding cost for a fixed batch size.
fn annual_policy_cost(annual_demand: f64, batch: u32, order_cost: f64, holding_cost: f64) -> f64 {
    if annual_demand <= 0.0 || batch == 0 {
        return 0.0;
    }
    (annual_demand / batch as f64) * order_cost + (batch as f64 / 2.0) * holding_cost
}
