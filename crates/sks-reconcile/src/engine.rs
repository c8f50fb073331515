use std::collections::BTreeMap;

use crate::pricing::PricingPolicy;
use crate::types::{
    CatalogVariant, MutationInstruction, ReconcileError, ReconcileOutcome, ReconcileStats,
    SupplierRecord,
};

fn index_suppliers(
    records: &[SupplierRecord],
) -> Result<BTreeMap<&str, &SupplierRecord>, ReconcileError> {
    let mut index: BTreeMap<&str, &SupplierRecord> = BTreeMap::new();
    for rec in records {
        if index.insert(rec.sku.as_str(), rec).is_some() {
            return Err(ReconcileError::DuplicateSupplierSku {
                sku: rec.sku.clone(),
            });
        }
    }
    Ok(index)
}

fn index_catalog(
    variants: &[CatalogVariant],
) -> Result<BTreeMap<&str, &CatalogVariant>, ReconcileError> {
    let mut index: BTreeMap<&str, &CatalogVariant> = BTreeMap::new();
    for var in variants {
        if index.insert(var.sku.as_str(), var).is_some() {
            return Err(ReconcileError::DuplicateCatalogSku {
                sku: var.sku.clone(),
            });
        }
    }
    Ok(index)
}

/// Deterministic reconciliation:
/// - both inputs are indexed by SKU; a repeated key on either side fails the run
/// - only the key intersection is walked, in ascending SKU order
/// - an in-sync SKU emits nothing; a price change dominates a stock change
///
/// Calling this twice with identical inputs yields identical, identically
/// ordered output.
pub fn reconcile(
    suppliers: &[SupplierRecord],
    catalog: &[CatalogVariant],
    policy: &PricingPolicy,
) -> Result<ReconcileOutcome, ReconcileError> {
    let supplier_index = index_suppliers(suppliers)?;
    let catalog_index = index_catalog(catalog)?;

    let mut mutations: Vec<MutationInstruction> = Vec::new();
    let mut stats = ReconcileStats {
        supplier_records: suppliers.len(),
        catalog_variants: catalog.len(),
        ..ReconcileStats::default()
    };

    // BTreeMap iteration gives the ascending-SKU walk; output order follows.
    for (sku, supplier) in &supplier_index {
        let variant = match catalog_index.get(sku) {
            Some(v) => v,
            None => {
                stats.supplier_only += 1;
                continue;
            }
        };
        stats.matched += 1;

        let stock_changed = supplier.stock != variant.inventory_quantity;
        let price_changed = supplier.price_micros != variant.cost_micros;

        if price_changed {
            let sale_micros = policy.compute_sale_price(supplier.price_micros)?;
            mutations.push(MutationInstruction {
                variant_id: variant.variant_id.clone(),
                price_micros: Some(sale_micros),
                cost_micros: Some(supplier.price_micros),
                inventory_quantity: stock_changed.then_some(supplier.stock),
            });
            stats.price_mutations += 1;
        } else if stock_changed {
            mutations.push(MutationInstruction {
                variant_id: variant.variant_id.clone(),
                price_micros: None,
                cost_micros: None,
                inventory_quantity: Some(supplier.stock),
            });
            stats.stock_only_mutations += 1;
        } else {
            stats.unchanged += 1;
        }
    }

    stats.catalog_only = catalog_index.len() - stats.matched;

    Ok(ReconcileOutcome { mutations, stats })
}
