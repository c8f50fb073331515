//! sks-schemas
//!
//! Boundary row types handed from the fetch stages (sks-supplier,
//! sks-catalog) to the reconciliation adapter, plus the fetch-outcome types
//! that make feed completeness explicit.
//!
//! IMPORTANT: Prices cross this boundary as decimal strings so downstream
//! conversion to integer micros is deterministic. No floats anywhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Supplier side
// ---------------------------------------------------------------------------

/// One supplier feed row, exactly as the fetch stage hands it over.
///
/// `sku` is the natural key; uniqueness is enforced later by the
/// reconciliation engine, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierRow {
    /// Supplier SKU (natural key across both systems).
    pub sku: String,
    /// Wholesale/cost price as a decimal string (e.g. `"449.95"`).
    pub price: String,
    /// Units in stock at the supplier. Must be >= 0; the adapter enforces it.
    pub quantity: i64,
    /// Last modification timestamp reported by the supplier.
    /// Informational only; never consulted by delta logic.
    pub updated_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Catalog side
// ---------------------------------------------------------------------------

/// One catalog variant row, exactly as the fetch stage hands it over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRow {
    /// Platform-assigned, stable variant identifier (mutation target).
    pub variant_id: String,
    /// SKU recorded on the variant (join key).
    pub sku: String,
    /// Current customer-facing price as a decimal string.
    pub price: String,
    /// Current recorded cost as a decimal string. Expected to mirror the
    /// supplier price when the catalog is in sync.
    pub cost: String,
    /// Inventory quantity recorded on the platform. Must be >= 0; the
    /// adapter enforces it.
    pub inventory_quantity: i64,
}

// ---------------------------------------------------------------------------
// Fetch outcome
// ---------------------------------------------------------------------------

/// Whether a fetch stage materialized the full remote record set.
///
/// A partial set is never silently truncated into `Complete`; the caller
/// must look at this value and decide whether to proceed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchCompleteness {
    /// Every page was retrieved.
    Complete,
    /// Pagination aborted early. `pages_fetched` pages made it into the row
    /// set; `reason` carries the upstream failure for logging.
    Partial { pages_fetched: u32, reason: String },
}

impl FetchCompleteness {
    pub fn is_complete(&self) -> bool {
        matches!(self, FetchCompleteness::Complete)
    }

    pub fn is_partial(&self) -> bool {
        !self.is_complete()
    }
}

/// A materialized record set from one fetch stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome<T> {
    pub rows: Vec<T>,
    pub completeness: FetchCompleteness,
    /// When the fetch finished, for run attribution.
    pub fetched_at_utc: DateTime<Utc>,
}

impl<T> FetchOutcome<T> {
    pub fn complete(rows: Vec<T>, fetched_at_utc: DateTime<Utc>) -> Self {
        Self {
            rows,
            completeness: FetchCompleteness::Complete,
            fetched_at_utc,
        }
    }

    pub fn partial(
        rows: Vec<T>,
        pages_fetched: u32,
        reason: impl Into<String>,
        fetched_at_utc: DateTime<Utc>,
    ) -> Self {
        Self {
            rows,
            completeness: FetchCompleteness::Partial {
                pages_fetched,
                reason: reason.into(),
            },
            fetched_at_utc,
        }
    }
}
