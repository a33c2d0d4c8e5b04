use prodscope::mapping::{default_field_rules, ColumnMapper};
use prodscope::model::{CanonicalField, ColumnMapping};

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_auto_map_mixed_language_table() {
    let mapper = ColumnMapper::new();
    let mapping = mapper.auto_map(&columns(&["id", "code_article", "desc_fr", "marque_nom"]));

    let mut expected = ColumnMapping::new();
    expected.insert(CanonicalField::Id, "id".to_string());
    expected.insert(CanonicalField::Reference, "code_article".to_string());
    expected.insert(CanonicalField::Description, "desc_fr".to_string());
    expected.insert(CanonicalField::Brand, "marque_nom".to_string());
    assert_eq!(mapping, expected);
}

#[test]
fn test_auto_map_is_deterministic() {
    let mapper = ColumnMapper::new();
    let cols = columns(&["EANNR", "omschrijving", "merk", "prijs", "voorraad", "locatie"]);

    let first = mapper.auto_map(&cols);
    let second = mapper.auto_map(&cols);
    assert_eq!(first, second);

    assert_eq!(first[&CanonicalField::Ean], "EANNR");
    assert_eq!(first[&CanonicalField::Description], "omschrijving");
    assert_eq!(first[&CanonicalField::Brand], "merk");
    assert_eq!(first[&CanonicalField::Price], "prijs");
    assert_eq!(first[&CanonicalField::Stock], "voorraad");
    assert_eq!(first[&CanonicalField::Location], "locatie");
}

#[test]
fn test_auto_map_unmatched_fields_are_absent() {
    let mapper = ColumnMapper::new();
    let mapping = mapper.auto_map(&columns(&["foo", "bar"]));
    assert!(mapping.is_empty());
}

#[test]
fn test_auto_map_ean_affixes() {
    let mapper = ColumnMapper::new();
    assert_eq!(
        mapper.auto_map(&columns(&["ean_13"]))[&CanonicalField::Ean],
        "ean_13"
    );
    assert_eq!(
        mapper.auto_map(&columns(&["box_ean"]))[&CanonicalField::Ean],
        "box_ean"
    );
}

#[test]
fn test_auto_map_supplier_and_barcode() {
    let mapper = ColumnMapper::new();
    let mapping = mapper.auto_map(&columns(&["code_fournisseur", "codebarre", "gtin"]));
    assert_eq!(mapping[&CanonicalField::SupplierCode], "code_fournisseur");
    assert_eq!(mapping[&CanonicalField::Barcode], "codebarre");
}

#[test]
fn test_override_survives_auto_map_merge() {
    let mapper = ColumnMapper::new();
    let mut existing = ColumnMapping::new();
    existing.insert(CanonicalField::Brand, "manu_name".to_string());

    let added = mapper.merge_auto_map(&mut existing, &columns(&["id", "marque_nom", "manu_name"]));

    assert_eq!(existing[&CanonicalField::Brand], "manu_name");
    assert_eq!(existing[&CanonicalField::Id], "id");
    assert!(!added.contains(&CanonicalField::Brand));
    assert!(added.contains(&CanonicalField::Id));
}

#[test]
fn test_effective_mapping_prefers_overrides() {
    let mapper = ColumnMapper::new();
    let mut overrides = ColumnMapping::new();
    overrides.insert(CanonicalField::Brand, "manu_name".to_string());

    let mapping = mapper.effective_mapping(&columns(&["marque_nom", "manu_name"]), &overrides);
    assert_eq!(mapping[&CanonicalField::Brand], "manu_name");
}

#[test]
fn test_rule_table_covers_every_field() {
    let rules = default_field_rules();
    for field in CanonicalField::ALL {
        assert!(
            rules.iter().any(|rule| rule.field == field),
            "no rule for {}",
            field
        );
    }
}

#[test]
fn test_fallback_matches_field_name() {
    let mapper = ColumnMapper::new();
    for field in CanonicalField::ALL {
        let mapping = mapper.auto_map(&[field.as_str()]);
        assert_eq!(mapping.get(&field).map(String::as_str), Some(field.as_str()));
    }
}
