//! Caller-supplied input records.
//!
//! All inputs are immutable snapshots owned by the caller. The engine never
//! mutates them and keeps no reference to them beyond the `product_id` /
//! `sku` join keys carried into output records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Current on-hand state for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    /// Stable caller-assigned identifier (join key for all outputs).
    pub product_id: String,
    pub name: String,
    pub sku: String,
    pub category: String,
    /// Current on-hand count.
    pub quantity: u32,
    /// Reorder floor configured by the caller (may be 0 when unset).
    pub min_quantity: u32,
    pub unit_price: f64,
    pub cost_price: f64,
}

/// Direction of an order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    Purchase,
    Sale,
}

/// One historical transaction line.
///
/// A flat event log; no ordering is assumed. Every analyzer that cares
/// about order sorts internally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub product_id: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub total_price: f64,
    pub order_date: NaiveDate,
    pub kind: OrderKind,
}

impl OrderRecord {
    pub fn is_sale(&self) -> bool {
        self.kind == OrderKind::Sale
    }

    pub fn is_purchase(&self) -> bool {
        self.kind == OrderKind::Purchase
    }
}

/// One purchase order placed with a supplier.
///
/// An order counts as *delivered* when `delivery_date` is set; lead time is
/// the day span between order and delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierOrderRecord {
    pub supplier_id: String,
    pub supplier_name: String,
    pub order_date: NaiveDate,
    pub delivery_date: Option<NaiveDate>,
    pub total_amount: f64,
}

impl SupplierOrderRecord {
    pub fn is_delivered(&self) -> bool {
        self.delivery_date.is_some()
    }

    /// Lead time in days, `None` until the order is delivered.
    /// Deliveries recorded before the order date clamp to 0.
    pub fn lead_time_days(&self) -> Option<f64> {
        self.delivery_date
            .map(|d| d.signed_duration_since(self.order_date).num_days().max(0) as f64)
    }
}
