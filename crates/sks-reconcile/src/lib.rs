//! sks-reconcile
//!
//! Reconciliation engine: supplier feed vs platform catalog.
//!
//! Architectural decisions:
//! - Join on SKU; only the intersection of both snapshots is considered
//! - At most one mutation instruction per SKU per run
//! - Price change dominates stock change
//! - Duplicate join keys fail the run, never resolved silently
//! - Validation is all-or-nothing; no mutation set from dirty data
//!
//! Deterministic, pure logic. No IO. No network calls.

mod engine;
mod feed_adapter;
mod money;
mod pricing;
mod types;

pub use engine::reconcile;
pub use feed_adapter::{normalize_catalog, normalize_supplier, DataValidationError, FeedSide};
pub use money::{format_micros, price_to_micros, MoneyError};
pub use pricing::{PricingError, PricingPolicy};
pub use types::*;
