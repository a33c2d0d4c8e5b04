use std::sync::Arc;

use prodscope::config::{ConnectionConfig, SearchSettings};
use prodscope::gateway::{QueryError, ScriptedGateway};
use prodscope::model::CanonicalField;
use prodscope::reconcile::GroupKeyKind;
use prodscope::service::{ExplorerError, ProductExplorer, QueryOutcome};
use prodscope::store::{ConfigStore, StoreError};
use serde_json::json;

fn explorer(gateway: ScriptedGateway) -> (Arc<ScriptedGateway>, ProductExplorer) {
    let gateway = Arc::new(gateway);
    let explorer = ProductExplorer::new(
        gateway.clone(),
        ConnectionConfig::new("localhost", "catalog", "reader", "secret"),
        Arc::new(ConfigStore::in_memory()),
        SearchSettings::default(),
    );
    (gateway, explorer)
}

fn catalog() -> ScriptedGateway {
    ScriptedGateway::new()
        .with_table("raw_supplier_a", &["id", "code_article", "desc_fr", "marque_nom", "manu_name"])
        .with_table("products", &["id", "name", "barcode", "price"])
}

#[tokio::test]
async fn test_zero_searchable_tables_is_empty_success() {
    let (gateway, explorer) = explorer(ScriptedGateway::new().with_table("raw_prices", &["cost"]));

    let outcome = explorer.search("drill").await;

    assert!(outcome.is_ok());
    assert!(outcome.error.is_none());
    assert!(outcome.data.unwrap().rows.is_empty());
    assert!(gateway.search_requests().is_empty());
}

#[tokio::test]
async fn test_errors_become_outcome_messages() {
    let gateway = catalog().with_search_error(QueryError::from_status(500));
    let (_gateway, explorer) = explorer(gateway);

    let outcome = explorer.search("drill").await;

    assert!(outcome.data.is_none());
    assert_eq!(
        outcome.error.as_deref(),
        Some("Internal server error in the query gateway")
    );
}

#[tokio::test]
async fn test_execute_query_rejects_writes() {
    let (gateway, explorer) = explorer(catalog());

    let outcome = explorer.execute_query("DELETE FROM products", Vec::new()).await;

    assert!(outcome.data.is_none());
    assert!(outcome.error.unwrap().contains("SELECT"));
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn test_list_tables_and_columns() {
    let (_gateway, explorer) = explorer(catalog());

    let tables = explorer.list_tables().await;
    assert_eq!(tables.data.unwrap(), vec!["products", "raw_supplier_a"]);

    let columns = explorer.list_columns("products").await;
    assert_eq!(columns.data.unwrap(), vec!["id", "name", "barcode", "price"]);
}

#[tokio::test]
async fn test_grouped_search() {
    let gateway = catalog().with_search_rows(vec![
        json!({"barcode": "5410000000017", "price": 19.99, "source_table": "products"}),
        json!({"id": 3, "description": "Perceuse", "source_table": "raw_supplier_a"}),
        json!({"barcode": "5410000000017", "price": 24.99, "source_table": "products"}),
    ]);
    let (_gateway, explorer) = explorer(gateway);

    let grouped = explorer.search_grouped("perceuse").await.data.unwrap();

    assert_eq!(grouped.result.rows.len(), 3);
    assert_eq!(grouped.groups.len(), 2);
    assert_eq!(grouped.groups[0].kind, GroupKeyKind::Barcode);
    assert!(grouped.groups[0].is_conflicting(CanonicalField::Price));
    assert_eq!(grouped.groups[1].group_key, "3@raw_supplier_a");
    assert!(explorer.is_current(grouped.result.generation));
}

#[tokio::test]
async fn test_explicit_mapping_survives_auto_map() {
    let (_gateway, explorer) = explorer(catalog());

    explorer
        .set_field_mapping("raw_supplier_a", CanonicalField::Brand, Some("manu_name".into()))
        .await
        .unwrap();
    let added = explorer.auto_map_table("raw_supplier_a").await.unwrap();

    assert!(!added.contains(&CanonicalField::Brand));
    assert!(added.contains(&CanonicalField::Reference));

    let view = explorer.mapping("raw_supplier_a").await.unwrap();
    assert_eq!(view.overrides[&CanonicalField::Brand], "manu_name");
    assert_eq!(view.effective[&CanonicalField::Brand], "manu_name");
    assert_eq!(view.effective[&CanonicalField::Description], "desc_fr");
}

#[tokio::test]
async fn test_override_reaches_search_projection() {
    let (gateway, explorer) = explorer(catalog());

    explorer
        .set_field_mapping("raw_supplier_a", CanonicalField::Brand, Some("manu_name".into()))
        .await
        .unwrap();
    explorer.search("perceuse").await;

    let query = &gateway.search_requests()[0].query;
    assert!(query.contains("\"manu_name\" AS \"brand\""));
    assert!(!query.contains("\"marque_nom\" AS \"brand\""));
}

#[tokio::test]
async fn test_clear_mapping() {
    let (_gateway, explorer) = explorer(catalog());

    explorer.auto_map_table("products").await.unwrap();
    explorer.clear_mapping("products").await.unwrap();

    let view = explorer.mapping("products").await.unwrap();
    assert!(view.overrides.is_empty());
    assert_eq!(view.effective[&CanonicalField::Barcode], "barcode");
}

#[tokio::test]
async fn test_enable_unknown_table_fails() {
    let (_gateway, explorer) = explorer(catalog());

    let err = explorer.set_enabled("raw_ghost", true).await.unwrap_err();
    assert!(matches!(err, ExplorerError::Store(StoreError::UnknownTable(_))));

    explorer.set_enabled("products", true).await.unwrap();
    assert_eq!(explorer.store().enabled_tables(), vec!["products"]);
}

#[tokio::test]
async fn test_diagnose_without_ambiguity() {
    let (_gateway, explorer) = explorer(catalog());

    let diagnostics = explorer.diagnose("raw_supplier_a").await.unwrap();
    assert!(diagnostics.is_empty());
}

#[tokio::test]
async fn test_diagnose_reports_ambiguity() {
    let gateway = ScriptedGateway::new().with_table("raw_x", &["desc_fr", "desc_nl"]);
    let (_gateway, explorer) = explorer(gateway);

    let diagnostics = explorer.diagnose("raw_x").await.unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].field, CanonicalField::Description);
    assert_eq!(diagnostics[0].chosen, "desc_fr");
    assert_eq!(diagnostics[0].candidates, vec!["desc_fr", "desc_nl"]);
}

#[test]
fn test_outcome_from_result() {
    let ok: QueryOutcome<u32> = Ok::<_, QueryError>(3).into();
    assert_eq!(ok, QueryOutcome::ok(3));

    let err: QueryOutcome<u32> = Err(QueryError::Network("refused".into())).into();
    assert_eq!(err.data, None);
    assert_eq!(err.error.as_deref(), Some("Network error: refused"));
}
