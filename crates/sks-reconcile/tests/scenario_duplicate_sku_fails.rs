use sks_reconcile::*;

#[test]
fn scenario_duplicate_catalog_sku_fails_the_run() {
    let suppliers = vec![SupplierRecord::new("A", 100 * MICROS_SCALE, 5)];
    let catalog = vec![
        CatalogVariant::new("v1", "A", 160 * MICROS_SCALE, 100 * MICROS_SCALE, 5),
        CatalogVariant::new("v2", "A", 160 * MICROS_SCALE, 100 * MICROS_SCALE, 5),
    ];

    let err = reconcile(&suppliers, &catalog, &PricingPolicy::default()).unwrap_err();
    assert_eq!(
        err,
        ReconcileError::DuplicateCatalogSku {
            sku: "A".to_string()
        }
    );
}

#[test]
fn scenario_duplicate_supplier_sku_fails_the_run() {
    let suppliers = vec![
        SupplierRecord::new("A", 100 * MICROS_SCALE, 5),
        SupplierRecord::new("A", 90 * MICROS_SCALE, 4),
    ];
    let catalog = vec![CatalogVariant::new(
        "v1",
        "A",
        160 * MICROS_SCALE,
        100 * MICROS_SCALE,
        5,
    )];

    let err = reconcile(&suppliers, &catalog, &PricingPolicy::default()).unwrap_err();
    assert_eq!(
        err,
        ReconcileError::DuplicateSupplierSku {
            sku: "A".to_string()
        }
    );
}
