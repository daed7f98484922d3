//! What-if re-projection under demand and lead-time multipliers.
//!
//! Pure O(1) arithmetic over a precomputed baseline so UI sliders can
//! recompute interactively. No simulation re-run: the demand distribution
//! scales linearly with the demand multiplier, and safety stock follows the
//! same service-level formula the reorder optimizer uses.

use serde::{Deserialize, Serialize};

use stocklens_core::error::{EngineError, EngineResult};

/// 95% service level factor, matching the reorder optimizer.
const SERVICE_LEVEL_Z: f64 = 1.645;
/// Stockout-day sentinel when projected demand is zero.
const NO_DEPLETION_DAY: u32 = 999;

/// Precomputed per-product baseline the caller already derived from the
/// reorder and stockout analyses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatIfBaseline {
    pub product_id: String,
    pub current_stock: u32,
    pub avg_daily_demand: f64,
    pub demand_std_dev: f64,
    pub lead_time_days: f64,
    pub safety_stock: u32,
    pub reorder_point: u32,
    /// Days until stockout under baseline demand.
    pub stockout_day: u32,
}

/// User-supplied scenario multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WhatIfScenario {
    pub demand_multiplier: f64,
    pub lead_time_multiplier: f64,
}

impl Default for WhatIfScenario {
    fn default() -> Self {
        Self {
            demand_multiplier: 1.0,
            lead_time_multiplier: 1.0,
        }
    }
}

impl WhatIfScenario {
    fn validate(&self) -> EngineResult<()> {
        for (name, value) in [
            ("demand_multiplier", self.demand_multiplier),
            ("lead_time_multiplier", self.lead_time_multiplier),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(EngineError::invalid_parameter(format!(
                    "{name} must be a finite positive number"
                )));
            }
        }
        Ok(())
    }
}

/// Projection plus signed deltas against the baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatIfProjection {
    pub product_id: String,
    pub safety_stock: u32,
    pub reorder_point: u32,
    pub stockout_day: u32,
    pub safety_stock_delta: i64,
    pub reorder_point_delta: i64,
    pub stockout_day_delta: i64,
}

/// Re-project safety stock, reorder point, and days-until-stockout under
/// the scenario multipliers.
pub fn project_what_if(
    baseline: &WhatIfBaseline,
    scenario: &WhatIfScenario,
) -> EngineResult<WhatIfProjection> {
    scenario.validate()?;

    let demand = baseline.avg_daily_demand * scenario.demand_multiplier;
    let std_dev = baseline.demand_std_dev * scenario.demand_multiplier;
    let lead_time = baseline.lead_time_days * scenario.lead_time_multiplier;

    let safety_stock = ((SERVICE_LEVEL_Z * std_dev * lead_time.sqrt()).round() as u32).max(1);
    let reorder_point = (demand * lead_time + safety_stock as f64).ceil() as u32;
    let stockout_day = if demand > 0.0 {
        ((baseline.current_stock as f64 / demand).round() as u32).min(NO_DEPLETION_DAY)
    } else {
        NO_DEPLETION_DAY
    };

    Ok(WhatIfProjection {
        product_id: baseline.product_id.clone(),
        safety_stock,
        reorder_point,
        stockout_day,
        safety_stock_delta: safety_stock as i64 - baseline.safety_stock as i64,
        reorder_point_delta: reorder_point as i64 - baseline.reorder_point as i64,
        stockout_day_delta: stockout_day as i64 - baseline.stockout_day as i64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline() -> WhatIfBaseline {
        WhatIfBaseline {
            product_id: "P1".to_string(),
            current_stock: 120,
            avg_daily_demand: 4.0,
            demand_std_dev: 1.5,
            lead_time_days: 14.0,
            safety_stock: 9,
            reorder_point: 65,
            stockout_day: 30,
        }
    }

    #[test]
    fn identity_multipliers_reproduce_the_baseline() {
        let projection = project_what_if(&baseline(), &WhatIfScenario::default()).unwrap();

        // 1.645 * 1.5 * sqrt(14) ≈ 9.23 -> 9.
        assert_eq!(projection.safety_stock, 9);
        assert_eq!(projection.reorder_point, 65);
        assert_eq!(projection.stockout_day, 30);
        assert_eq!(projection.safety_stock_delta, 0);
        assert_eq!(projection.reorder_point_delta, 0);
        assert_eq!(projection.stockout_day_delta, 0);
    }

    #[test]
    fn doubled_demand_halves_runway_and_raises_the_reorder_point() {
        let scenario = WhatIfScenario {
            demand_multiplier: 2.0,
            lead_time_multiplier: 1.0,
        };
        let projection = project_what_if(&baseline(), &scenario).unwrap();

        assert_eq!(projection.stockout_day, 15);
        assert_eq!(projection.stockout_day_delta, -15);
        assert!(projection.reorder_point > 65);
        assert!(projection.safety_stock_delta > 0);
    }

    #[test]
    fn longer_lead_time_needs_more_buffer() {
        let scenario = WhatIfScenario {
            demand_multiplier: 1.0,
            lead_time_multiplier: 2.0,
        };
        let projection = project_what_if(&baseline(), &scenario).unwrap();

        assert!(projection.safety_stock > 9);
        assert!(projection.reorder_point > 65);
        // Lead time does not change depletion speed.
        assert_eq!(projection.stockout_day_delta, 0);
    }

    #[test]
    fn zero_demand_baseline_hits_the_sentinel() {
        let mut base = baseline();
        base.avg_daily_demand = 0.0;
        base.demand_std_dev = 0.0;
        base.stockout_day = NO_DEPLETION_DAY;

        let projection = project_what_if(&base, &WhatIfScenario::default()).unwrap();
        assert_eq!(projection.stockout_day, NO_DEPLETION_DAY);
        assert_eq!(projection.stockout_day_delta, 0);
    }

    #[test]
    fn non_finite_multiplier_is_rejected() {
        let scenario = WhatIfScenario {
            demand_multiplier: f64::NAN,
            lead_time_multiplier: 1.0,
        };
        let err = project_what_if(&baseline(), &scenario).unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter(_)));

        let scenario = WhatIfScenario {
            demand_multiplier: 1.0,
            lead_time_multiplier: 0.0,
        };
        assert!(project_what_if(&baseline(), &scenario).is_err());
    }
}
