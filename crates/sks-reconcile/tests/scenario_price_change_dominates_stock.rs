use sks_reconcile::*;

#[test]
fn scenario_price_change_with_unchanged_stock_omits_quantity() {
    // Supplier price 120 vs recorded cost 100; stock equal on both sides.
    let suppliers = vec![SupplierRecord::new("B", 120 * MICROS_SCALE, 10)];
    let catalog = vec![CatalogVariant::new(
        "v2",
        "B",
        160 * MICROS_SCALE,
        100 * MICROS_SCALE,
        10,
    )];

    let out = reconcile(&suppliers, &catalog, &PricingPolicy::default()).unwrap();
    assert_eq!(
        out.mutations,
        vec![MutationInstruction {
            variant_id: "v2".to_string(),
            price_micros: Some(192 * MICROS_SCALE),
            cost_micros: Some(120 * MICROS_SCALE),
            inventory_quantity: None,
        }]
    );
}

#[test]
fn scenario_price_and_stock_change_carries_both() {
    let suppliers = vec![SupplierRecord::new("B", 120 * MICROS_SCALE, 7)];
    let catalog = vec![CatalogVariant::new(
        "v2",
        "B",
        160 * MICROS_SCALE,
        100 * MICROS_SCALE,
        10,
    )];

    let out = reconcile(&suppliers, &catalog, &PricingPolicy::default()).unwrap();
    assert_eq!(
        out.mutations,
        vec![MutationInstruction {
            variant_id: "v2".to_string(),
            price_micros: Some(192 * MICROS_SCALE),
            cost_micros: Some(120 * MICROS_SCALE),
            inventory_quantity: Some(7),
        }]
    );
    // Price dominates: this is a price mutation, never a stock-only one.
    assert_eq!(out.stats.price_mutations, 1);
    assert_eq!(out.stats.stock_only_mutations, 0);
}
