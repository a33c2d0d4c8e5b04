use prodscope::model::{CanonicalField, NormalizedProductRow};
use prodscope::reconcile::{group_by_identity, FieldResolution, GroupKeyKind};

fn row(table: &str) -> NormalizedProductRow {
    NormalizedProductRow::new(table)
}

#[test]
fn test_same_barcode_across_tables_groups() {
    let rows = vec![
        row("raw_supplier_a")
            .with(CanonicalField::Barcode, "5410000000017")
            .with(CanonicalField::Description, "Cordless drill"),
        row("products")
            .with(CanonicalField::Barcode, "5410000000017")
            .with(CanonicalField::Name, "Drill 18V")
            .with(CanonicalField::Brand, "Acme"),
    ];

    let groups = group_by_identity(&rows);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].group_key, "5410000000017");
    assert_eq!(groups[0].kind, GroupKeyKind::Barcode);
    assert_eq!(groups[0].members.len(), 2);
    assert_eq!(groups[0].source_tables(), vec!["raw_supplier_a", "products"]);
}

#[test]
fn test_barcode_matches_ean_in_other_table() {
    let rows = vec![
        row("raw_a").with(CanonicalField::Barcode, "5410000000017"),
        row("raw_b").with(CanonicalField::Ean, " 5410000000017 "),
    ];

    let groups = group_by_identity(&rows);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].members.len(), 2);
}

#[test]
fn test_id_only_rows_never_merge_across_tables() {
    let rows = vec![
        row("raw_a").with(CanonicalField::Id, 1_i64),
        row("raw_b").with(CanonicalField::Id, 1_i64),
        row("raw_a").with(CanonicalField::Id, 2_i64),
    ];

    let groups = group_by_identity(&rows);

    assert_eq!(groups.len(), 3);
    assert!(groups.iter().all(|g| g.members.len() == 1));
    assert!(groups.iter().all(|g| g.kind == GroupKeyKind::Reference));
    let keys: Vec<&str> = groups.iter().map(|g| g.group_key.as_str()).collect();
    assert_eq!(keys, vec!["1@raw_a", "2@raw_a", "1@raw_b"]);
}

#[test]
fn test_rows_without_identity_stay_apart() {
    let rows = vec![
        row("raw_a").with(CanonicalField::Name, "Hammer"),
        row("raw_a").with(CanonicalField::Name, "Hammer"),
    ];

    let groups = group_by_identity(&rows);
    assert_eq!(groups.len(), 2);
    assert_ne!(groups[0].group_key, groups[1].group_key);
}

#[test]
fn test_supplier_code_groups() {
    let rows = vec![
        row("raw_a").with(CanonicalField::SupplierCode, "BOS-123"),
        row("raw_b").with(CanonicalField::SupplierCode, "BOS-123"),
        row("raw_c").with(CanonicalField::SupplierCode, "BOS-999"),
    ];

    let groups = group_by_identity(&rows);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].group_key, "BOS-123");
    assert_eq!(groups[0].kind, GroupKeyKind::SupplierCode);
}

#[test]
fn test_largest_group_first() {
    let rows = vec![
        row("raw_a").with(CanonicalField::Barcode, "111"),
        row("raw_a").with(CanonicalField::Barcode, "222"),
        row("raw_b").with(CanonicalField::Barcode, "222"),
        row("raw_c").with(CanonicalField::Barcode, "222"),
        row("raw_c").with(CanonicalField::Barcode, "111"),
    ];

    let groups = group_by_identity(&rows);
    assert_eq!(groups[0].group_key, "222");
    assert_eq!(groups[0].members.len(), 3);
    assert_eq!(groups[1].group_key, "111");
    assert_eq!(groups[1].members.len(), 2);
}

#[test]
fn test_price_conflict_is_flagged() {
    let rows = vec![
        row("raw_a")
            .with(CanonicalField::Barcode, "5410000000017")
            .with(CanonicalField::Price, 19.99),
        row("raw_b")
            .with(CanonicalField::Barcode, "5410000000017")
            .with(CanonicalField::Price, 24.99),
    ];

    let group = &group_by_identity(&rows)[0];
    assert!(group.is_conflicting(CanonicalField::Price));
    assert_eq!(group.conflicts(), vec![CanonicalField::Price]);

    let product = group.consolidate();
    assert_eq!(
        product.resolution(CanonicalField::Price),
        &FieldResolution::Conflicting(vec!["19.99".to_string(), "24.99".to_string()])
    );
    assert_eq!(
        product.resolution(CanonicalField::Barcode),
        &FieldResolution::Single("5410000000017".to_string())
    );
    assert_eq!(product.resolution(CanonicalField::Stock), &FieldResolution::Missing);
    assert_eq!(product.conflicting_fields(), vec![CanonicalField::Price]);
}

#[test]
fn test_primary_row_is_most_complete() {
    let rows = vec![
        row("raw_a").with(CanonicalField::Barcode, "111"),
        row("raw_b")
            .with(CanonicalField::Barcode, "111")
            .with(CanonicalField::Name, "Drill")
            .with(CanonicalField::Stock, 0_i64),
        row("raw_c")
            .with(CanonicalField::Barcode, "111")
            .with(CanonicalField::Brand, "Acme")
            .with(CanonicalField::Price, 9.5),
    ];

    let group = &group_by_identity(&rows)[0];
    assert_eq!(group.primary_index(), 2);
    assert_eq!(group.primary().source_table, "raw_c");
    assert_eq!(group.consolidate().primary_index, 2);
}

#[test]
fn test_interleaved_tables_keep_result_order() {
    let rows = vec![
        row("raw_a")
            .with(CanonicalField::Barcode, "111")
            .with(CanonicalField::Price, 10_i64),
        row("raw_b")
            .with(CanonicalField::Barcode, "111")
            .with(CanonicalField::Price, 12_i64),
        row("raw_a")
            .with(CanonicalField::Barcode, "111")
            .with(CanonicalField::Price, 11_i64),
    ];

    let group = &group_by_identity(&rows)[0];
    assert_eq!(group.members, rows);
    assert_eq!(group.source_tables(), vec!["raw_a", "raw_b"]);
    assert_eq!(group.primary_index(), 0);
    assert_eq!(
        group.values(CanonicalField::Price),
        vec!["10".to_string(), "12".to_string(), "11".to_string()]
    );
}

#[test]
fn test_barcode_and_supplier_code_with_same_text_stay_apart() {
    let rows = vec![
        row("raw_a").with(CanonicalField::Barcode, "123"),
        row("raw_b").with(CanonicalField::SupplierCode, "123"),
    ];

    let groups = group_by_identity(&rows);
    assert_eq!(groups.len(), 2);
    assert!(groups.iter().all(|g| g.group_key == "123"));
    assert_eq!(groups[0].kind, GroupKeyKind::Barcode);
    assert_eq!(groups[1].kind, GroupKeyKind::SupplierCode);
}
