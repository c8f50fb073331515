use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pricing::PricingError;

/// Micros scale (1e-6) used for all prices in the core.
pub const MICROS_SCALE: i64 = 1_000_000;

/// One validated supplier feed record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SupplierRecord {
    /// Natural key, unique within one feed snapshot.
    pub sku: String,
    /// Wholesale/cost price quoted by the supplier, in micros. Always >= 0.
    pub price_micros: i64,
    /// Units in stock at the supplier. Always >= 0.
    pub stock: i64,
    /// Informational only; the delta logic never reads it.
    pub last_modified: Option<DateTime<Utc>>,
}

impl SupplierRecord {
    pub fn new(sku: impl Into<String>, price_micros: i64, stock: i64) -> Self {
        Self {
            sku: sku.into(),
            price_micros,
            stock,
            last_modified: None,
        }
    }
}

/// One validated platform catalog variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogVariant {
    /// Platform-assigned, stable identifier; the mutation target.
    pub variant_id: String,
    /// Join key, unique within one catalog snapshot.
    pub sku: String,
    /// Current customer-facing price, in micros. Always >= 0.
    pub price_micros: i64,
    /// Current recorded cost, in micros. Mirrors the supplier price when the
    /// catalog is in sync. Always >= 0.
    pub cost_micros: i64,
    /// Inventory quantity recorded on the platform. Always >= 0.
    pub inventory_quantity: i64,
}

impl CatalogVariant {
    pub fn new(
        variant_id: impl Into<String>,
        sku: impl Into<String>,
        price_micros: i64,
        cost_micros: i64,
        inventory_quantity: i64,
    ) -> Self {
        Self {
            variant_id: variant_id.into(),
            sku: sku.into(),
            price_micros,
            cost_micros,
            inventory_quantity,
        }
    }
}

/// The minimal field changes needed to bring one variant in sync.
///
/// Every field except `variant_id` is tri-state: `None` means "no change
/// requested", `Some(v)` means "set to v". Absent fields are omitted from
/// serialized output entirely; there is no sentinel null that could be
/// mistaken for "clear this value".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationInstruction {
    pub variant_id: String,
    /// New customer-facing price, in micros.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_micros: Option<i64>,
    /// New recorded cost, in micros.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_micros: Option<i64>,
    /// New inventory quantity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory_quantity: Option<i64>,
}

/// Per-run join statistics. Unmatched SKUs are excluded from mutation
/// output by contract; the counts here are the operator-facing record of
/// that exclusion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileStats {
    pub supplier_records: usize,
    pub catalog_variants: usize,
    pub matched: usize,
    pub supplier_only: usize,
    pub catalog_only: usize,
    pub unchanged: usize,
    pub stock_only_mutations: usize,
    pub price_mutations: usize,
}

impl ReconcileStats {
    pub fn mutations_emitted(&self) -> usize {
        self.stock_only_mutations + self.price_mutations
    }
}

/// Full result of one reconciliation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Mutation instructions in ascending SKU order.
    pub mutations: Vec<MutationInstruction>,
    pub stats: ReconcileStats,
}

/// Errors the engine itself can produce. Input validation failures are
/// [`crate::DataValidationError`] and happen before the engine runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReconcileError {
    /// Two supplier records share the same SKU.
    DuplicateSupplierSku { sku: String },
    /// Two catalog variants share the same SKU.
    DuplicateCatalogSku { sku: String },
    /// The pricing transform rejected a supplier cost.
    Pricing(PricingError),
}

impl std::fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReconcileError::DuplicateSupplierSku { sku } => {
                write!(f, "duplicate SKU '{sku}' in supplier feed")
            }
            ReconcileError::DuplicateCatalogSku { sku } => {
                write!(f, "duplicate SKU '{sku}' in catalog snapshot")
            }
            ReconcileError::Pricing(e) => write!(f, "pricing failed: {e}"),
        }
    }
}

impl std::error::Error for ReconcileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReconcileError::Pricing(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PricingError> for ReconcileError {
    fn from(e: PricingError) -> Self {
        ReconcileError::Pricing(e)
    }
}
