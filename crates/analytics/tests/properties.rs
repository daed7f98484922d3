//! Cross-analyzer property tests over generated order histories.

use chrono::NaiveDate;
use proptest::prelude::*;

use stocklens_analytics::abc_xyz::classify_abc_xyz;
use stocklens_analytics::demand::{DemandPattern, classify_demand};
use stocklens_analytics::reorder::optimize_reorders;
use stocklens_analytics::stockout::{StockoutConfig, simulate_stockouts};
use stocklens_core::records::{OrderKind, OrderRecord, ProductSnapshot};
use stocklens_core::series::AnalysisWindow;
use stocklens_core::StdRandomSource;

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 12, 15).unwrap()
}

fn window() -> AnalysisWindow {
    AnalysisWindow::new(as_of())
}

/// One sale row per non-zero month (Jan..Dec 2026).
fn orders_from_monthly(product_id: &str, monthly: &[u32]) -> Vec<OrderRecord> {
    monthly
        .iter()
        .enumerate()
        .filter(|(_, q)| **q > 0)
        .map(|(month0, q)| OrderRecord {
            product_id: product_id.to_string(),
            quantity: *q,
            unit_price: 25.0,
            total_price: 25.0 * *q as f64,
            order_date: NaiveDate::from_ymd_opt(2026, month0 as u32 + 1, 10).unwrap(),
            kind: OrderKind::Sale,
        })
        .collect()
}

fn snapshot(product_id: &str, quantity: u32, min_quantity: u32) -> ProductSnapshot {
    ProductSnapshot {
        product_id: product_id.to_string(),
        name: format!("Product {product_id}"),
        sku: format!("SKU-{product_id}"),
        category: "generated".to_string(),
        quantity,
        min_quantity,
        unit_price: 40.0,
        cost_price: 22.0,
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        ..ProptestConfig::default()
    })]

    /// Every product lands in exactly one pattern; ADI >= 1 whenever any
    /// month saw demand; forecasts are present and bounded.
    #[test]
    fn classifier_is_total(monthly in prop::collection::vec(0u32..50, 12)) {
        let orders = orders_from_monthly("P", &monthly);
        let analysis = classify_demand(&orders, &window());

        if monthly.iter().all(|q| *q == 0) {
            prop_assert!(analysis.items.is_empty());
        } else {
            let item = &analysis.items[0];
            prop_assert!(item.adi >= 1.0);
            prop_assert!(matches!(
                item.pattern,
                DemandPattern::Smooth
                    | DemandPattern::Intermittent
                    | DemandPattern::Erratic
                    | DemandPattern::Lumpy
            ));
            prop_assert_eq!(item.forecast.len(), 3);
            prop_assert!(item.confidence <= 100);
        }
    }

    /// EOQ floors at 1 and the reorder point always covers safety stock.
    #[test]
    fn reorder_policy_invariants(
        monthly in prop::collection::vec(0u32..80, 12),
        quantity in 0u32..500,
        min_quantity in 0u32..50,
    ) {
        let orders = orders_from_monthly("P", &monthly);
        let inventory = vec![snapshot("P", quantity, min_quantity)];

        let items = optimize_reorders(&inventory, &orders, &window());
        prop_assert_eq!(items.len(), 1);
        prop_assert!(items[0].eoq >= 1);
        prop_assert!(items[0].safety_stock >= 1);
        prop_assert!(items[0].reorder_point >= items[0].safety_stock);
    }

    /// Stockout probability never decreases with the horizon.
    #[test]
    fn stockout_probabilities_are_monotone(
        monthly in prop::collection::vec(1u32..60, 12),
        quantity in 1u32..300,
        seed in any::<u64>(),
    ) {
        let orders = orders_from_monthly("P", &monthly);
        let inventory = vec![snapshot("P", quantity, 5)];
        let config = StockoutConfig::default().with_simulation_count(50);
        let mut random = StdRandomSource::seeded(seed);

        let analysis =
            simulate_stockouts(&inventory, &orders, &window(), &config, &mut random).unwrap();
        let p = analysis.items[0].probabilities;
        prop_assert!(p.day_7 <= p.day_14);
        prop_assert!(p.day_14 <= p.day_30);
        prop_assert!(p.day_30 <= p.day_60);
        prop_assert!(p.day_60 <= p.day_90);
    }

    /// Cumulative revenue share is non-decreasing and ends at 1 whenever
    /// any revenue exists.
    #[test]
    fn abc_cumulative_share_is_well_formed(
        quantities in prop::collection::vec(0u32..40, 1..8),
    ) {
        let mut inventory = Vec::new();
        let mut orders = Vec::new();
        for (i, q) in quantities.iter().enumerate() {
            let id = format!("P{i}");
            inventory.push(snapshot(&id, 50, 5));
            orders.extend(orders_from_monthly(&id, &vec![*q; 12]));
        }

        let items = classify_abc_xyz(&inventory, &orders, &window());
        let mut previous = 0.0;
        for item in &items {
            prop_assert!(item.cumulative_share >= previous - 1e-12);
            previous = item.cumulative_share;
        }
        if quantities.iter().any(|q| *q > 0) {
            prop_assert!((items.last().unwrap().cumulative_share - 1.0).abs() < 1e-9);
        }
    }
}
