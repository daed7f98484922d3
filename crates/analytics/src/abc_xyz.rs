//! ABC × XYZ matrix classification.
//!
//! ABC ranks products by revenue concentration over the trailing window
//! (cumulative-share cut points 80% / 95%); XYZ grades demand variability
//! from the CV of the monthly quantity series. The 9-cell matrix maps each
//! combination to a stocking recommendation.

use serde::{Deserialize, Serialize};

use stocklens_core::records::{OrderRecord, ProductSnapshot};
use stocklens_core::series::{AnalysisWindow, monthly_sales_series};
use stocklens_core::stats::{self, round2};

/// Cumulative revenue share boundaries for A and B.
const ABC_A_SHARE: f64 = 0.8;
const ABC_B_SHARE: f64 = 0.95;
/// CV boundaries for X and Y.
const XYZ_X_CV: f64 = 0.5;
const XYZ_Y_CV: f64 = 1.0;
/// CV sentinel when a product has no demand data; forces class Z.
const XYZ_NO_DATA_CV: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbcClass {
    A,
    B,
    C,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum XyzClass {
    X,
    Y,
    Z,
}

/// Per-product matrix cell with the revenue/variability measures behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbcXyzItem {
    pub product_id: String,
    pub name: String,
    pub revenue: f64,
    /// This product's share of total revenue, 0–1.
    pub revenue_share: f64,
    /// Running share including this product, 0–1, non-decreasing.
    pub cumulative_share: f64,
    pub abc: AbcClass,
    /// CV of the monthly quantity series; 2 when no demand data exists.
    pub demand_cv: f64,
    pub xyz: XyzClass,
    pub recommendation: String,
}

fn recommendation_for(abc: AbcClass, xyz: XyzClass) -> &'static str {
    match (abc, xyz) {
        (AbcClass::A, XyzClass::X) => {
            "Top earner with steady demand: automate replenishment, keep safety stock tight"
        }
        (AbcClass::A, XyzClass::Y) => {
            "Top earner with swinging demand: review weekly, size buffer dynamically"
        }
        (AbcClass::A, XyzClass::Z) => {
            "Top earner with irregular demand: plan manually, order against firm demand"
        }
        (AbcClass::B, XyzClass::X) => {
            "Mid earner with steady demand: periodic review on a standard policy"
        }
        (AbcClass::B, XyzClass::Y) => {
            "Mid earner with swinging demand: hold buffer stock, review quarterly"
        }
        (AbcClass::B, XyzClass::Z) => {
            "Mid earner with irregular demand: order to demand where lead time allows"
        }
        (AbcClass::C, XyzClass::X) => {
            "Low earner with steady demand: bulk order infrequently, minimal oversight"
        }
        (AbcClass::C, XyzClass::Y) => {
            "Low earner with swinging demand: simple min/max policy is enough"
        }
        (AbcClass::C, XyzClass::Z) => {
            "Low earner with irregular demand: candidate for delisting or make-to-order"
        }
    }
}

/// Classify every product on the ABC × XYZ matrix.
///
/// Items come back in revenue order (descending), the order the cumulative
/// share was accumulated in.
pub fn classify_abc_xyz(
    inventory: &[ProductSnapshot],
    orders: &[OrderRecord],
    window: &AnalysisWindow,
) -> Vec<AbcXyzItem> {
    let series_by_product = monthly_sales_series(orders, window);

    // Trailing-window sale revenue per product.
    let mut ranked: Vec<(&ProductSnapshot, f64)> = inventory
        .iter()
        .map(|product| {
            let revenue: f64 = orders
                .iter()
                .filter(|o| {
                    o.is_sale()
                        && o.product_id == product.product_id
                        && window.contains(o.order_date)
                })
                .map(|o| o.total_price)
                .sum();
            (product, revenue)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let total_revenue: f64 = ranked.iter().map(|(_, r)| r).sum();

    let mut items = Vec::with_capacity(ranked.len());
    let mut cumulative = 0.0;
    for (product, revenue) in ranked {
        let share = if total_revenue > 0.0 {
            revenue / total_revenue
        } else {
            0.0
        };
        cumulative += share;

        let abc = if total_revenue <= 0.0 {
            // No revenue anywhere: nothing concentrates, everything is C.
            AbcClass::C
        } else if cumulative <= ABC_A_SHARE {
            AbcClass::A
        } else if cumulative <= ABC_B_SHARE {
            AbcClass::B
        } else {
            AbcClass::C
        };

        let demand_cv = match series_by_product.get(&product.product_id) {
            Some(series) if series.iter().any(|v| *v > 0.0) => {
                stats::coefficient_of_variation(series)
            }
            _ => XYZ_NO_DATA_CV,
        };
        let xyz = if demand_cv <= XYZ_X_CV {
            XyzClass::X
        } else if demand_cv <= XYZ_Y_CV {
            XyzClass::Y
        } else {
            XyzClass::Z
        };

        items.push(AbcXyzItem {
            product_id: product.product_id.clone(),
            name: product.name.clone(),
            revenue: round2(revenue),
            revenue_share: share,
            cumulative_share: cumulative,
            abc,
            demand_cv,
            xyz,
            recommendation: recommendation_for(abc, xyz).to_string(),
        });
    }

    items
}
