//! Dead-stock, overstock, and margin analysis with savings recommendations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use stocklens_core::records::{OrderRecord, ProductSnapshot};
use stocklens_core::series::AnalysisWindow;
use stocklens_core::stats::round2;

/// Days without a sale before stock counts as dead.
const DEAD_STOCK_DAYS: i64 = 60;
/// Sentinel for products that never sold.
const NEVER_SOLD_DAYS: u32 = 999;
/// Stock above `min_quantity * 3` counts as overstock.
const OVERSTOCK_FACTOR: u32 = 3;
/// Margins below this fraction are flagged.
const LOW_MARGIN_THRESHOLD: f64 = 0.10;
/// Recommendations reported at most.
const MAX_RECOMMENDATIONS: usize = 5;

/// Positive-quantity item that has not sold recently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeadStockItem {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    /// Stock valued at cost price.
    pub value: f64,
    /// Days since the last sale; 999 when the product never sold.
    pub days_since_last_sale: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverstockItem {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub min_quantity: u32,
    /// Units above `min_quantity * 3`.
    pub excess_quantity: u32,
    /// Excess units valued at cost price.
    pub excess_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginItem {
    pub product_id: String,
    pub name: String,
    pub unit_price: f64,
    pub cost_price: f64,
    /// `(unit - cost) / unit`, 0–1 fraction (negative when sold at a loss).
    pub margin: f64,
}

/// Average margin and trailing sale revenue for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMargin {
    pub category: String,
    /// Mean item margin, 0–1 fraction.
    pub avg_margin: f64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationPriority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRecommendation {
    pub priority: RecommendationPriority,
    pub message: String,
    pub estimated_savings: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostAnalysis {
    /// Sorted by tied-up value, highest first.
    pub dead_stock: Vec<DeadStockItem>,
    pub overstock: Vec<OverstockItem>,
    pub low_margin: Vec<MarginItem>,
    pub category_margins: Vec<CategoryMargin>,
    /// Priority-sorted, capped at 5.
    pub recommendations: Vec<CostRecommendation>,
}

/// Run the full cost analysis against `window.as_of()` as the reference day.
pub fn analyze_costs(
    inventory: &[ProductSnapshot],
    orders: &[OrderRecord],
    window: &AnalysisWindow,
) -> CostAnalysis {
    let last_sale = last_sale_dates(orders);

    let mut dead_stock = Vec::new();
    let mut overstock = Vec::new();
    let mut low_margin = Vec::new();

    for product in inventory {
        let days_since = last_sale
            .get(product.product_id.as_str())
            .map(|sold| {
                window
                    .as_of()
                    .signed_duration_since(*sold)
                    .num_days()
                    .clamp(0, NEVER_SOLD_DAYS as i64) as u32
            })
            .unwrap_or(NEVER_SOLD_DAYS);

        if product.quantity > 0 && days_since as i64 >= DEAD_STOCK_DAYS {
            dead_stock.push(DeadStockItem {
                product_id: product.product_id.clone(),
                name: product.name.clone(),
                quantity: product.quantity,
                value: round2(product.quantity as f64 * product.cost_price),
                days_since_last_sale: days_since,
            });
        }

        let ceiling = product.min_quantity * OVERSTOCK_FACTOR;
        if product.quantity > ceiling {
            let excess = product.quantity - ceiling;
            overstock.push(OverstockItem {
                product_id: product.product_id.clone(),
                name: product.name.clone(),
                quantity: product.quantity,
                min_quantity: product.min_quantity,
                excess_quantity: excess,
                excess_value: round2(excess as f64 * product.cost_price),
            });
        }

        if product.unit_price > 0.0 {
            let margin = (product.unit_price - product.cost_price) / product.unit_price;
            if margin < LOW_MARGIN_THRESHOLD {
                low_margin.push(MarginItem {
                    product_id: product.product_id.clone(),
                    name: product.name.clone(),
                    unit_price: product.unit_price,
                    cost_price: product.cost_price,
                    margin,
                });
            }
        }
    }

    dead_stock.sort_by(|a, b| b.value.total_cmp(&a.value));
    overstock.sort_by(|a, b| b.excess_value.total_cmp(&a.excess_value));
    low_margin.sort_by(|a, b| a.margin.total_cmp(&b.margin));

    let category_margins = category_margins(inventory, orders, window);
    let recommendations =
        build_recommendations(&dead_stock, &overstock, &low_margin, &category_margins);
    debug!(
        dead = dead_stock.len(),
        overstocked = overstock.len(),
        low_margin = low_margin.len(),
        "analyzed cost structure"
    );

    CostAnalysis {
        dead_stock,
        overstock,
        low_margin,
        category_margins,
        recommendations,
    }
}

fn last_sale_dates(orders: &[OrderRecord]) -> BTreeMap<&str, chrono::NaiveDate> {
    let mut last: BTreeMap<&str, chrono::NaiveDate> = BTreeMap::new();
    for order in orders.iter().filter(|o| o.is_sale()) {
        last.entry(order.product_id.as_str())
            .and_modify(|d| *d = (*d).max(order.order_date))
            .or_insert(order.order_date);
    }
    last
}

fn category_margins(
    inventory: &[ProductSnapshot],
    orders: &[OrderRecord],
    window: &AnalysisWindow,
) -> Vec<CategoryMargin> {
    let mut margins: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    let mut revenue: BTreeMap<&str, f64> = BTreeMap::new();

    for product in inventory {
        if product.unit_price > 0.0 {
            margins
                .entry(product.category.as_str())
                .or_default()
                .push((product.unit_price - product.cost_price) / product.unit_price);
        }
        let product_revenue: f64 = orders
            .iter()
            .filter(|o| {
                o.is_sale() && o.product_id == product.product_id && window.contains(o.order_date)
            })
            .map(|o| o.total_price)
            .sum();
        *revenue.entry(product.category.as_str()).or_insert(0.0) += product_revenue;
    }

    margins
        .into_iter()
        .map(|(category, values)| CategoryMargin {
            category: category.to_string(),
            avg_margin: stocklens_core::stats::mean(&values),
            revenue: round2(revenue.get(category).copied().unwrap_or(0.0)),
        })
        .collect()
}

fn build_recommendations(
    dead_stock: &[DeadStockItem],
    overstock: &[OverstockItem],
    low_margin: &[MarginItem],
    categories: &[CategoryMargin],
) -> Vec<CostRecommendation> {
    let mut recommendations = Vec::new();

    if !dead_stock.is_empty() {
        let value: f64 = dead_stock.iter().map(|i| i.value).sum();
        recommendations.push(CostRecommendation {
            priority: RecommendationPriority::High,
            message: format!(
                "Liquidate or discount {} dead-stock item(s) to free tied-up capital",
                dead_stock.len()
            ),
            estimated_savings: round2(value),
        });
    }

    if !overstock.is_empty() {
        let value: f64 = overstock.iter().map(|i| i.excess_value).sum();
        recommendations.push(CostRecommendation {
            priority: RecommendationPriority::Medium,
            message: format!(
                "Cut replenishment on {} overstocked item(s) until excess drains",
                overstock.len()
            ),
            estimated_savings: round2(value),
        });
    }

    if !low_margin.is_empty() {
        // Gain from repricing current stock to the 10% margin floor.
        let gain: f64 = low_margin
            .iter()
            .map(|i| {
                let target_price = i.cost_price / (1.0 - LOW_MARGIN_THRESHOLD);
                (target_price - i.unit_price).max(0.0)
            })
            .sum();
        recommendations.push(CostRecommendation {
            priority: RecommendationPriority::Medium,
            message: format!(
                "Reprice {} low-margin item(s) toward a 10% margin floor",
                low_margin.len()
            ),
            estimated_savings: round2(gain),
        });
    }

    let weak_categories: Vec<&CategoryMargin> = categories
        .iter()
        .filter(|c| c.avg_margin < LOW_MARGIN_THRESHOLD)
        .collect();
    if !weak_categories.is_empty() {
        let uplift: f64 = weak_categories
            .iter()
            .map(|c| c.revenue * (LOW_MARGIN_THRESHOLD - c.avg_margin).max(0.0))
            .sum();
        recommendations.push(CostRecommendation {
            priority: RecommendationPriority::Low,
            message: format!(
                "Review pricing across {} low-margin categor(ies)",
                weak_categories.len()
            ),
            estimated_savings: round2(uplift),
        });
    }

    recommendations.sort_by(|a, b| a.priority.cmp(&b.priority));
    recommendations.truncate(MAX_RECOMMENDATIONS);
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use stocklens_core::records::OrderKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn window() -> AnalysisWindow {
        AnalysisWindow::new(date(2026, 12, 15))
    }

    fn product(id: &str, quantity: u32, min_quantity: u32, unit: f64, cost: f64) -> ProductSnapshot {
        ProductSnapshot {
            product_id: id.to_string(),
            name: format!("Product {id}"),
            sku: format!("SKU-{id}"),
            category: "widgets".to_string(),
            quantity,
            min_quantity,
            unit_price: unit,
            cost_price: cost,
        }
    }

    fn sale(product_id: &str, on: NaiveDate) -> OrderRecord {
        OrderRecord {
            product_id: product_id.to_string(),
            quantity: 2,
            unit_price: 20.0,
            total_price: 40.0,
            order_date: on,
            kind: OrderKind::Sale,
        }
    }

    #[test]
    fn stale_stock_is_dead_and_valued_at_cost() {
        let inventory = vec![product("STALE", 10, 5, 20.0, 12.0)];
        let orders = vec![sale("STALE", date(2026, 8, 1))]; // 136 days before as_of

        let analysis = analyze_costs(&inventory, &orders, &window());
        let item = &analysis.dead_stock[0];

        assert_eq!(item.days_since_last_sale, 136);
        assert_eq!(item.value, 120.0);
    }

    #[test]
    fn never_sold_stock_carries_the_sentinel() {
        let inventory = vec![product("GHOST", 4, 2, 20.0, 10.0)];
        let analysis = analyze_costs(&inventory, &[], &window());

        assert_eq!(analysis.dead_stock[0].days_since_last_sale, 999);
    }

    #[test]
    fn recently_sold_stock_is_not_dead() {
        let inventory = vec![product("FRESH", 10, 5, 20.0, 12.0)];
        let orders = vec![sale("FRESH", date(2026, 12, 1))];

        let analysis = analyze_costs(&inventory, &orders, &window());
        assert!(analysis.dead_stock.is_empty());
    }

    #[test]
    fn zero_quantity_never_counts_as_dead_stock() {
        // A stocked-out product is a reorder problem, not dead capital.
        let inventory = vec![product("OUT", 0, 5, 20.0, 12.0)];
        let analysis = analyze_costs(&inventory, &[], &window());
        assert!(analysis.dead_stock.is_empty());
    }

    #[test]
    fn overstock_is_excess_above_three_times_minimum() {
        let inventory = vec![
            product("HEAVY", 100, 10, 20.0, 8.0),
            product("OK", 25, 10, 20.0, 8.0),
        ];
        let analysis = analyze_costs(&inventory, &[], &window());

        assert_eq!(analysis.overstock.len(), 1);
        let item = &analysis.overstock[0];
        assert_eq!(item.product_id, "HEAVY");
        assert_eq!(item.excess_quantity, 70);
        assert_eq!(item.excess_value, 560.0);
    }

    #[test]
    fn thin_margins_are_flagged_as_fractions() {
        let inventory = vec![
            product("THIN", 5, 2, 100.0, 95.0), // 5% margin
            product("FAT", 5, 2, 100.0, 50.0),  // 50% margin
        ];
        let analysis = analyze_costs(&inventory, &[], &window());

        assert_eq!(analysis.low_margin.len(), 1);
        let item = &analysis.low_margin[0];
        assert_eq!(item.product_id, "THIN");
        assert!((item.margin - 0.05).abs() < 1e-9);
    }

    #[test]
    fn free_items_do_not_divide_by_zero() {
        let inventory = vec![product("FREE", 5, 2, 0.0, 3.0)];
        let analysis = analyze_costs(&inventory, &[], &window());
        assert!(analysis.low_margin.is_empty());
    }

    #[test]
    fn recommendations_sort_by_priority_and_cap_at_five() {
        let inventory = vec![
            product("DEAD", 50, 5, 100.0, 95.0),
            product("HEAVY", 200, 10, 100.0, 95.0),
        ];
        let analysis = analyze_costs(&inventory, &[], &window());

        assert!(analysis.recommendations.len() <= 5);
        assert_eq!(
            analysis.recommendations[0].priority,
            RecommendationPriority::High
        );
        for pair in analysis.recommendations.windows(2) {
            assert!(pair[0].priority <= pair[1].priority);
        }
        assert!(analysis.recommendations.iter().all(|r| r.estimated_savings >= 0.0));
    }

    #[test]
    fn empty_inputs_produce_an_empty_analysis() {
        let analysis = analyze_costs(&[], &[], &window());
        assert_eq!(analysis, CostAnalysis::default());
    }
}
