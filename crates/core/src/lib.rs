//! `stocklens-core` — analytics engine foundation building blocks.
//!
//! This crate contains the **pure computational** primitives shared by every
//! analyzer: input record types, statistical helpers, the monthly demand
//! series aggregator, and the injectable random source for simulation. No
//! I/O, no wall-clock reads; a reference date is always supplied by the
//! caller.

pub mod error;
pub mod random;
pub mod records;
pub mod series;
pub mod stats;

pub use error::{EngineError, EngineResult};
pub use random::{RandomSource, StdRandomSource};
pub use records::{OrderKind, OrderRecord, ProductSnapshot, SupplierOrderRecord};
pub use series::{AnalysisWindow, DEFAULT_WINDOW_MONTHS, monthly_sales_series};
