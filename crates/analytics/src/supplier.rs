//! Supplier performance scorecards.
//!
//! Aggregates supplier order history into a composite 0–100 score: delivery
//! punctuality (40%), lead-time consistency (25%), price stability (20%),
//! and fulfillment (15%), mapped to a letter grade.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use stocklens_core::records::SupplierOrderRecord;
use stocklens_core::stats::{self, round2};

/// Deliveries within this many days count as on time.
const ON_TIME_DAYS: f64 = 14.0;

const WEIGHT_ON_TIME: f64 = 0.40;
const WEIGHT_LEAD_CONSISTENCY: f64 = 0.25;
const WEIGHT_PRICE_STABILITY: f64 = 0.20;
const WEIGHT_FULFILLMENT: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupplierGrade {
    A,
    B,
    C,
    D,
    F,
}

impl SupplierGrade {
    fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            SupplierGrade::A
        } else if score >= 75.0 {
            SupplierGrade::B
        } else if score >= 60.0 {
            SupplierGrade::C
        } else if score >= 40.0 {
            SupplierGrade::D
        } else {
            SupplierGrade::F
        }
    }

    fn recommendation(&self) -> &'static str {
        match self {
            SupplierGrade::A => "Preferred supplier: route additional volume here",
            SupplierGrade::B => "Reliable: keep current allocation, review quarterly",
            SupplierGrade::C => "Acceptable: negotiate service-level commitments",
            SupplierGrade::D => "At risk: qualify a backup supplier",
            SupplierGrade::F => "Underperforming: shift orders to alternatives",
        }
    }
}

/// Composite scorecard for one supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierScore {
    pub supplier_id: String,
    pub supplier_name: String,
    pub total_orders: usize,
    pub delivered_orders: usize,
    /// Delivered orders with lead time <= 14 days, as a fraction 0–1.
    pub on_time_rate: f64,
    pub avg_lead_time_days: f64,
    /// `max(0, 100 - σ_lead · 10)`.
    pub lead_time_consistency: f64,
    /// `1 - CV(order amounts)`, clamped to [0, 1].
    pub price_stability: f64,
    /// Delivered / total, 0–1.
    pub fulfillment_rate: f64,
    /// Weighted composite, 0–100.
    pub composite_score: f64,
    pub grade: SupplierGrade,
    pub recommendation: String,
}

/// Score every supplier in the order history, best composite first.
pub fn score_suppliers(orders: &[SupplierOrderRecord]) -> Vec<SupplierScore> {
    let mut by_supplier: BTreeMap<&str, Vec<&SupplierOrderRecord>> = BTreeMap::new();
    for order in orders {
        by_supplier
            .entry(order.supplier_id.as_str())
            .or_default()
            .push(order);
    }

    let mut scores: Vec<SupplierScore> = by_supplier
        .into_iter()
        .map(|(supplier_id, orders)| score_supplier(supplier_id, &orders))
        .collect();
    scores.sort_by(|a, b| b.composite_score.total_cmp(&a.composite_score));
    debug!(suppliers = scores.len(), "scored supplier performance");
    scores
}

fn score_supplier(supplier_id: &str, orders: &[&SupplierOrderRecord]) -> SupplierScore {
    let total = orders.len();
    let lead_times: Vec<f64> = orders.iter().filter_map(|o| o.lead_time_days()).collect();
    let delivered = lead_times.len();

    let on_time_rate = if delivered > 0 {
        lead_times.iter().filter(|d| **d <= ON_TIME_DAYS).count() as f64 / delivered as f64
    } else {
        0.0
    };
    let lead_time_consistency = (100.0 - stats::std_dev(&lead_times) * 10.0).max(0.0);
    let amounts: Vec<f64> = orders.iter().map(|o| o.total_amount).collect();
    let price_stability = (1.0 - stats::coefficient_of_variation(&amounts)).clamp(0.0, 1.0);
    let fulfillment_rate = if total > 0 {
        delivered as f64 / total as f64
    } else {
        0.0
    };

    let composite_score = round2(
        on_time_rate * 100.0 * WEIGHT_ON_TIME
            + lead_time_consistency * WEIGHT_LEAD_CONSISTENCY
            + price_stability * 100.0 * WEIGHT_PRICE_STABILITY
            + fulfillment_rate * 100.0 * WEIGHT_FULFILLMENT,
    );
    let grade = SupplierGrade::from_score(composite_score);

    SupplierScore {
        supplier_id: supplier_id.to_string(),
        supplier_name: orders
            .first()
            .map(|o| o.supplier_name.clone())
            .unwrap_or_default(),
        total_orders: total,
        delivered_orders: delivered,
        on_time_rate,
        avg_lead_time_days: round2(stats::mean(&lead_times)),
        lead_time_consistency: round2(lead_time_consistency),
        price_stability,
        fulfillment_rate,
        composite_score,
        grade,
        recommendation: grade.recommendation().to_string(),
    }
}
