//! Month-over-month demand and cost anomaly detection.
//!
//! Builds per-month aggregates per product straight off the order log (map
//! accumulation, not the fixed window) and z-scores the latest month
//! against the whole series. Demand anomalies flag at |z| > 1.5, purchase
//! cost changes at |z| > 2.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use stocklens_core::records::OrderRecord;
use stocklens_core::series::month_key;
use stocklens_core::stats::{self, round2};

/// Minimum months of history before a z-score means anything.
const MIN_MONTHS: usize = 3;
const DEMAND_Z_THRESHOLD: f64 = 1.5;
const COST_Z_THRESHOLD: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    DemandSpike,
    DemandDrop,
    CostChange,
}

/// Ordered most severe first so a plain sort puts critical on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalySeverity {
    Critical,
    Warning,
    Info,
}

impl AnomalySeverity {
    fn from_z(z: f64) -> Self {
        let magnitude = z.abs();
        if magnitude > 3.0 {
            AnomalySeverity::Critical
        } else if magnitude > 2.0 {
            AnomalySeverity::Warning
        } else {
            AnomalySeverity::Info
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyItem {
    pub product_id: String,
    pub kind: AnomalyKind,
    pub severity: AnomalySeverity,
    /// `YYYY-MM` of the flagged month (always the latest with data).
    pub month: String,
    pub observed: f64,
    /// Series mean the observation was scored against.
    pub expected: f64,
    pub z_score: f64,
}

#[derive(Debug, Default)]
struct MonthAggregates {
    /// Sale quantity per month.
    demand: BTreeMap<String, f64>,
    /// Purchase unit prices per month (averaged on read).
    costs: BTreeMap<String, Vec<f64>>,
}

/// Flag demand spikes/drops and purchase cost changes, critical first.
pub fn detect_anomalies(orders: &[OrderRecord]) -> Vec<AnomalyItem> {
    let mut per_product: HashMap<&str, MonthAggregates> = HashMap::new();
    for order in orders {
        let aggregates = per_product.entry(order.product_id.as_str()).or_default();
        let key = month_key(order.order_date);
        if order.is_sale() {
            *aggregates.demand.entry(key).or_insert(0.0) += order.quantity as f64;
        } else {
            aggregates.costs.entry(key).or_default().push(order.unit_price);
        }
    }

    let mut items = Vec::new();
    for (product_id, aggregates) in &per_product {
        check_demand(product_id, &aggregates.demand, &mut items);
        check_costs(product_id, &aggregates.costs, &mut items);
    }

    items.sort_by(|a, b| {
        a.severity
            .cmp(&b.severity)
            .then_with(|| b.z_score.abs().total_cmp(&a.z_score.abs()))
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    debug!(anomalies = items.len(), "detected month-over-month anomalies");
    items
}

fn check_demand(product_id: &str, demand: &BTreeMap<String, f64>, items: &mut Vec<AnomalyItem>) {
    if demand.len() < MIN_MONTHS {
        return;
    }
    let values: Vec<f64> = demand.values().copied().collect();
    let (latest_month, latest) = demand.iter().next_back().map(|(k, v)| (k.clone(), *v)).unwrap_or_default();

    let mean = stats::mean(&values);
    let std = stats::std_dev(&values);
    let z = stats::z_score(latest, mean, std);

    let kind = if z > DEMAND_Z_THRESHOLD {
        AnomalyKind::DemandSpike
    } else if z < -DEMAND_Z_THRESHOLD {
        AnomalyKind::DemandDrop
    } else {
        return;
    };

    items.push(AnomalyItem {
        product_id: product_id.to_string(),
        kind,
        severity: AnomalySeverity::from_z(z),
        month: latest_month,
        observed: latest,
        expected: round2(mean),
        z_score: round2(z),
    });
}

fn check_costs(
    product_id: &str,
    costs: &BTreeMap<String, Vec<f64>>,
    items: &mut Vec<AnomalyItem>,
) {
    if costs.len() < MIN_MONTHS {
        return;
    }
    let monthly_avg: Vec<f64> = costs.values().map(|prices| stats::mean(prices)).collect();
    let (latest_month, latest) = match costs.iter().next_back() {
        Some((k, prices)) => (k.clone(), stats::mean(prices)),
        None => return,
    };

    let mean = stats::mean(&monthly_avg);
    let std = stats::std_dev(&monthly_avg);
    let z = stats::z_score(latest, mean, std);
    if z.abs() <= COST_Z_THRESHOLD {
        return;
    }

    items.push(AnomalyItem {
        product_id: product_id.to_string(),
        kind: AnomalyKind::CostChange,
        severity: AnomalySeverity::from_z(z),
        month: latest_month,
        observed: round2(latest),
        expected: round2(mean),
        z_score: round2(z),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use stocklens_core::records::OrderKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sale(product_id: &str, qty: u32, on: NaiveDate) -> OrderRecord {
        OrderRecord {
            product_id: product_id.to_string(),
            quantity: qty,
            unit_price: 10.0,
            total_price: 10.0 * qty as f64,
            order_date: on,
            kind: OrderKind::Sale,
        }
    }

    fn purchase(product_id: &str, unit_price: f64, on: NaiveDate) -> OrderRecord {
        OrderRecord {
            product_id: product_id.to_string(),
            quantity: 10,
            unit_price,
            total_price: unit_price * 10.0,
            order_date: on,
            kind: OrderKind::Purchase,
        }
    }

    #[test]
    fn latest_month_surge_flags_a_demand_spike() {
        let mut orders: Vec<OrderRecord> = (1..=8)
            .map(|m| sale("P1", 10, date(2026, m, 5)))
            .collect();
        orders.push(sale("P1", 60, date(2026, 9, 5)));

        let items = detect_anomalies(&orders);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, AnomalyKind::DemandSpike);
        assert_eq!(items[0].month, "2026-09");
        assert_eq!(items[0].observed, 60.0);
    }

    #[test]
    fn latest_month_collapse_flags_a_demand_drop() {
        let mut orders: Vec<OrderRecord> = (1..=8)
            .map(|m| sale("P1", 50, date(2026, m, 5)))
            .collect();
        orders.push(sale("P1", 1, date(2026, 9, 5)));

        let items = detect_anomalies(&orders);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, AnomalyKind::DemandDrop);
        assert!(items[0].z_score < -1.5);
    }

    #[test]
    fn steady_demand_raises_nothing() {
        let orders: Vec<OrderRecord> = (1..=9)
            .map(|m| sale("P1", 20, date(2026, m, 5)))
            .collect();
        assert!(detect_anomalies(&orders).is_empty());
    }

    #[test]
    fn two_months_of_history_is_not_enough() {
        let orders = vec![
            sale("P1", 10, date(2026, 1, 5)),
            sale("P1", 500, date(2026, 2, 5)),
        ];
        assert!(detect_anomalies(&orders).is_empty());
    }

    #[test]
    fn purchase_price_jump_flags_a_cost_change() {
        let mut orders: Vec<OrderRecord> = (1..=8)
            .map(|m| purchase("P1", 10.0, date(2026, m, 3)))
            .collect();
        orders.push(purchase("P1", 30.0, date(2026, 9, 3)));

        let items = detect_anomalies(&orders);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, AnomalyKind::CostChange);
        assert!(items[0].z_score > 2.0);
    }

    #[test]
    fn critical_anomalies_sort_first() {
        // P-HUGE: extreme spike (z > 3); P-MILD: moderate spike.
        let mut orders: Vec<OrderRecord> = (1..=11)
            .map(|m| sale("P-HUGE", 10, date(2026, m, 5)))
            .collect();
        orders.push(sale("P-HUGE", 500, date(2026, 12, 5)));
        for m in 1..=8 {
            orders.push(sale("P-MILD", 10 + m, date(2026, m as u32, 6)));
        }
        orders.push(sale("P-MILD", 22, date(2026, 9, 6)));

        let items = detect_anomalies(&orders);
        assert!(!items.is_empty());
        assert_eq!(items[0].product_id, "P-HUGE");
        assert_eq!(items[0].severity, AnomalySeverity::Critical);
        for window in items.windows(2) {
            assert!(window[0].severity <= window[1].severity);
        }
    }
}
