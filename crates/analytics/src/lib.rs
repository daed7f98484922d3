//! `stocklens-analytics` — the inventory analytics engine.
//!
//! Pure, synchronous analyzers over two flat input collections (current
//! inventory snapshots, historical order lines). Each module is an
//! independent consumer of the shared series aggregator and statistical
//! primitives in `stocklens-core`; none call each other. A driving caller
//! gathers inputs, invokes whichever analyses it needs, and hands the
//! result records to the presentation layer.

pub mod abc_xyz;
pub mod anomaly;
pub mod basket;
pub mod cost;
pub mod demand;
pub mod forecast;
pub mod reorder;
pub mod stockout;
pub mod supplier;
pub mod turnover;
pub mod whatif;

pub use abc_xyz::{AbcClass, AbcXyzItem, XyzClass, classify_abc_xyz};
pub use anomaly::{AnomalyItem, AnomalyKind, AnomalySeverity, detect_anomalies};
pub use basket::{AssociationRule, BasketAnalysis, BasketConfig, FrequentPair, mine_baskets};
pub use cost::{CostAnalysis, CostRecommendation, DeadStockItem, MarginItem, OverstockItem, analyze_costs};
pub use demand::{DemandAnalysis, DemandClassification, DemandPattern, DemandSummary, classify_demand};
pub use forecast::{Forecast, ForecastMethod};
pub use reorder::{ReorderItem, optimize_reorders};
pub use stockout::{StockoutAnalysis, StockoutConfig, StockoutRisk, StockoutRiskLevel, simulate_stockouts};
pub use supplier::{SupplierGrade, SupplierScore, score_suppliers};
pub use turnover::{TurnoverClass, TurnoverItem, analyze_turnover};
pub use whatif::{WhatIfBaseline, WhatIfProjection, WhatIfScenario, project_what_if};
