//! Feed adapter — validate boundary rows and normalize to engine types.
//!
//! The fetch stages hand over [`sks_schemas::SupplierRow`] /
//! [`sks_schemas::CatalogRow`] values with decimal-string prices. This module
//! converts them into the engine's micros-based types and is the single place
//! where malformed records are rejected.
//!
//! Validation is all-or-nothing per side: the first bad record fails the
//! whole batch, identifying the offending SKU (or row index when the SKU
//! itself is missing). A partial mutation set built from half-validated data
//! is worse than no mutation set.

use sks_schemas::{CatalogRow, SupplierRow};

use crate::money::{price_to_micros, MoneyError};
use crate::types::{CatalogVariant, SupplierRecord};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Which input record set a validation error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSide {
    Supplier,
    Catalog,
}

impl FeedSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedSide::Supplier => "supplier",
            FeedSide::Catalog => "catalog",
        }
    }
}

/// All record-level malformations the adapter rejects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataValidationError {
    /// A record has an empty/blank SKU. `row` is the 0-based position in the
    /// input batch, the only identity such a record has.
    MissingSku { side: FeedSide, row: usize },
    /// A catalog row has an empty/blank variant id.
    MissingVariantId { sku: String },
    /// A price string could not be converted to micros.
    InvalidPrice {
        side: FeedSide,
        sku: String,
        source: MoneyError,
    },
    /// A price parsed fine but is negative where a non-negative value is
    /// required.
    NegativePrice {
        side: FeedSide,
        sku: String,
        field: &'static str,
        micros: i64,
    },
    /// A quantity is negative where a non-negative value is required.
    NegativeQuantity {
        side: FeedSide,
        sku: String,
        quantity: i64,
    },
}

impl std::fmt::Display for DataValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataValidationError::MissingSku { side, row } => {
                write!(f, "{} record at row {row} has an empty SKU", side.as_str())
            }
            DataValidationError::MissingVariantId { sku } => {
                write!(f, "catalog variant for SKU '{sku}' has an empty variant id")
            }
            DataValidationError::InvalidPrice { side, sku, source } => {
                write!(f, "{} record '{sku}': {source}", side.as_str())
            }
            DataValidationError::NegativePrice {
                side,
                sku,
                field,
                micros,
            } => {
                write!(
                    f,
                    "{} record '{sku}': field '{field}' must be >= 0, got {micros} micros",
                    side.as_str()
                )
            }
            DataValidationError::NegativeQuantity {
                side,
                sku,
                quantity,
            } => {
                write!(
                    f,
                    "{} record '{sku}': quantity must be >= 0, got {quantity}",
                    side.as_str()
                )
            }
        }
    }
}

impl std::error::Error for DataValidationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataValidationError::InvalidPrice { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

fn require_non_negative_price(
    side: FeedSide,
    sku: &str,
    field: &'static str,
    raw: &str,
) -> Result<i64, DataValidationError> {
    let micros =
        price_to_micros(raw, field).map_err(|source| DataValidationError::InvalidPrice {
            side,
            sku: sku.to_string(),
            source,
        })?;
    if micros < 0 {
        return Err(DataValidationError::NegativePrice {
            side,
            sku: sku.to_string(),
            field,
            micros,
        });
    }
    Ok(micros)
}

/// Validate and normalize a batch of supplier rows.
///
/// All-or-nothing: returns the records only if every row is clean.
pub fn normalize_supplier(
    rows: &[SupplierRow],
) -> Result<Vec<SupplierRecord>, DataValidationError> {
    let mut out = Vec::with_capacity(rows.len());
    for (row_idx, row) in rows.iter().enumerate() {
        let sku = row.sku.trim();
        if sku.is_empty() {
            return Err(DataValidationError::MissingSku {
                side: FeedSide::Supplier,
                row: row_idx,
            });
        }

        let price_micros =
            require_non_negative_price(FeedSide::Supplier, sku, "price", &row.price)?;

        if row.quantity < 0 {
            return Err(DataValidationError::NegativeQuantity {
                side: FeedSide::Supplier,
                sku: sku.to_string(),
                quantity: row.quantity,
            });
        }

        out.push(SupplierRecord {
            sku: sku.to_string(),
            price_micros,
            stock: row.quantity,
            last_modified: row.updated_at,
        });
    }
    Ok(out)
}

/// Validate and normalize a batch of catalog rows.
///
/// All-or-nothing, same contract as [`normalize_supplier`].
pub fn normalize_catalog(rows: &[CatalogRow]) -> Result<Vec<CatalogVariant>, DataValidationError> {
    let mut out = Vec::with_capacity(rows.len());
    for (row_idx, row) in rows.iter().enumerate() {
        let sku = row.sku.trim();
        if sku.is_empty() {
            return Err(DataValidationError::MissingSku {
                side: FeedSide::Catalog,
                row: row_idx,
            });
        }

        let variant_id = row.variant_id.trim();
        if variant_id.is_empty() {
            return Err(DataValidationError::MissingVariantId {
                sku: sku.to_string(),
            });
        }

        let price_micros = require_non_negative_price(FeedSide::Catalog, sku, "price", &row.price)?;
        let cost_micros = require_non_negative_price(FeedSide::Catalog, sku, "cost", &row.cost)?;

        if row.inventory_quantity < 0 {
            return Err(DataValidationError::NegativeQuantity {
                side: FeedSide::Catalog,
                sku: sku.to_string(),
                quantity: row.inventory_quantity,
            });
        }

        out.push(CatalogVariant {
            variant_id: variant_id.to_string(),
            sku: sku.to_string(),
            price_micros,
            cost_micros,
            inventory_quantity: row.inventory_quantity,
        });
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
