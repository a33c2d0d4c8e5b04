use std::sync::Arc;

use prodscope::catalog::CatalogResolver;
use prodscope::config::{ConnectionConfig, SearchSettings};
use prodscope::gateway::{QueryError, QueryExecutor, ScriptedGateway};
use prodscope::model::CanonicalField;
use prodscope::search::{FederatedSearch, SearchMode};
use prodscope::store::ConfigStore;
use serde_json::json;

struct Harness {
    gateway: Arc<ScriptedGateway>,
    store: Arc<ConfigStore>,
    search: FederatedSearch,
}

fn harness(gateway: ScriptedGateway, settings: SearchSettings) -> Harness {
    let gateway = Arc::new(gateway);
    let store = Arc::new(ConfigStore::in_memory());
    let executor = Arc::new(QueryExecutor::new(
        gateway.clone(),
        ConnectionConfig::new("localhost", "catalog", "reader", "secret"),
    ));
    let catalog = Arc::new(CatalogResolver::new(executor.clone(), store.clone()));
    let search = FederatedSearch::new(catalog, store.clone(), executor, settings);
    Harness {
        gateway,
        store,
        search,
    }
}

fn catalog_gateway() -> ScriptedGateway {
    ScriptedGateway::new()
        .with_table("raw_supplier_a", &["barcode", "desc", "cost"])
        .with_table("raw_supplier_b", &["ean", "designation", "marque"])
        .with_table("products", &["id", "name", "brand", "price"])
}

#[tokio::test]
async fn test_blank_term_makes_no_calls() {
    let h = harness(catalog_gateway(), SearchSettings::default());

    let result = h.search.search("   ").await.unwrap();

    assert!(result.mode.is_none());
    assert!(result.rows.is_empty());
    assert_eq!(h.gateway.call_count(), 0);
}

#[tokio::test]
async fn test_fuzzy_search_binds_wrapped_term() {
    let h = harness(catalog_gateway(), SearchSettings::default());

    let result = h.search.search(" drill ").await.unwrap();

    assert_eq!(result.term, "drill");
    assert_eq!(result.mode, Some(SearchMode::Fuzzy));
    assert_eq!(
        result.tables_searched,
        vec!["products", "raw_supplier_a", "raw_supplier_b"]
    );

    let requests = h.gateway.search_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].params, vec![json!("%drill%")]);
    assert!(requests[0].read_only);
    assert!(requests[0].query.contains("UNION ALL"));
    assert!(!requests[0].query.contains("$2"));
}

#[tokio::test]
async fn test_numeric_search_only_hits_barcode_tables() {
    let h = harness(catalog_gateway(), SearchSettings::default());

    let result = h.search.search("5410000000017").await.unwrap();

    assert_eq!(result.mode, Some(SearchMode::Exact));
    assert_eq!(result.tables_searched, vec!["raw_supplier_a", "raw_supplier_b"]);
    let requests = h.gateway.search_requests();
    assert_eq!(requests[0].params, vec![json!("5410000000017")]);
    assert!(requests[0].query.contains("\"barcode\"::text = $1"));
    assert!(requests[0].query.contains("\"ean\"::text = $1"));
}

#[tokio::test]
async fn test_no_searchable_tables_short_circuits() {
    let gateway = ScriptedGateway::new().with_table("raw_prices", &["cost", "qty"]);
    let h = harness(gateway, SearchSettings::default());

    let result = h.search.search("drill").await.unwrap();

    assert!(result.rows.is_empty());
    assert!(result.tables_searched.is_empty());
    assert!(h.gateway.search_requests().is_empty());
}

#[tokio::test]
async fn test_rows_are_normalized() {
    let gateway = catalog_gateway().with_search_rows(vec![
        json!({
            "id": null, "reference": null, "barcode": "5410000000017",
            "description": "Cordless drill", "brand": null, "supplier_code": null,
            "name": null, "price": 19.99, "stock": null, "location": null,
            "ean": null, "source_table": "raw_supplier_a"
        }),
        json!({
            "id": 4, "name": "Drill", "brand": "Acme", "price": 24.99,
            "source_table": "products"
        }),
    ]);
    let h = harness(gateway, SearchSettings::default());

    let result = h.search.search("drill").await.unwrap();

    assert_eq!(result.rows.len(), 2);
    assert_eq!(result.rows[0].source_table, "raw_supplier_a");
    assert_eq!(
        result.rows[0].text(CanonicalField::Description).as_deref(),
        Some("Cordless drill")
    );
    assert_eq!(result.rows[1].text(CanonicalField::Id).as_deref(), Some("4"));
    assert!(result.rows[1].barcode.is_none());
}

#[tokio::test]
async fn test_malformed_row_is_a_decode_error() {
    let gateway = catalog_gateway().with_search_rows(vec![json!({"id": 1})]);
    let h = harness(gateway, SearchSettings::default());

    let err = h.search.search("drill").await.unwrap_err();
    assert!(matches!(err, QueryError::Decode(_)));
}

#[tokio::test]
async fn test_enabled_tables_restrict_candidates() {
    let h = harness(catalog_gateway(), SearchSettings::default());
    h.store
        .register_tables(&["raw_supplier_b".to_string()])
        .unwrap();
    h.store.set_enabled("raw_supplier_b", true).unwrap();

    let result = h.search.search("drill").await.unwrap();

    assert_eq!(result.tables_searched, vec!["raw_supplier_b"]);
    assert_eq!(h.gateway.column_requests_for("raw_supplier_a"), 0);
    assert_eq!(h.gateway.column_requests_for("products"), 0);
}

#[tokio::test]
async fn test_table_cap_reports_skipped_tables() {
    let settings = SearchSettings {
        max_tables: 2,
        row_limit: 100,
    };
    let h = harness(catalog_gateway(), settings);

    let result = h.search.search("drill").await.unwrap();

    assert_eq!(result.tables_searched, vec!["products", "raw_supplier_a"]);
    assert_eq!(result.truncated_tables, vec!["raw_supplier_b"]);
    assert_eq!(h.gateway.column_requests_for("raw_supplier_b"), 0);
}

#[tokio::test]
async fn test_row_limit_is_configurable() {
    let settings = SearchSettings {
        max_tables: 5,
        row_limit: 7,
    };
    let h = harness(catalog_gateway(), settings);

    h.search.search("drill").await.unwrap();

    assert!(h.gateway.search_requests()[0].query.ends_with("LIMIT 7"));
}

#[tokio::test]
async fn test_failed_introspection_skips_table() {
    let gateway = catalog_gateway().with_failing_columns("raw_supplier_a");
    let h = harness(gateway, SearchSettings::default());

    let result = h.search.search("drill").await.unwrap();

    assert_eq!(result.failed_tables, vec!["raw_supplier_a"]);
    assert_eq!(result.tables_searched, vec!["products", "raw_supplier_b"]);
}

#[tokio::test]
async fn test_gateway_errors_propagate() {
    let gateway = catalog_gateway().with_search_error(QueryError::from_status(503));
    let h = harness(gateway, SearchSettings::default());

    let err = h.search.search("drill").await.unwrap_err();
    assert!(matches!(err, QueryError::Gateway { status: 503, .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_discovery_failure_propagates() {
    let gateway = catalog_gateway()
        .with_table_listing_error(QueryError::Network("connection refused".into()));
    let h = harness(gateway, SearchSettings::default());

    let err = h.search.search("drill").await.unwrap_err();
    assert_eq!(err.kind(), "network");
}

#[tokio::test]
async fn test_generation_marks_latest_search() {
    let h = harness(catalog_gateway(), SearchSettings::default());

    let first = h.search.search("drill").await.unwrap();
    assert!(h.search.is_current(first.generation));

    let second = h.search.search("saw").await.unwrap();
    assert!(second.generation > first.generation);
    assert!(!h.search.is_current(first.generation));
    assert!(h.search.is_current(second.generation));
}

#[tokio::test]
async fn test_columns_are_fetched_once() {
    let h = harness(catalog_gateway(), SearchSettings::default());

    h.search.search("drill").await.unwrap();
    h.search.search("saw").await.unwrap();

    assert_eq!(h.gateway.column_requests_for("raw_supplier_a"), 1);
    assert_eq!(h.gateway.column_requests_for("products"), 1);
}

#[tokio::test]
async fn test_search_registers_discovered_tables() {
    let h = harness(catalog_gateway(), SearchSettings::default());

    h.search.search("drill").await.unwrap();

    let names: Vec<String> = h.store.snapshot().into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["products", "raw_supplier_a", "raw_supplier_b"]);
    assert!(h.store.enabled_tables().is_empty());
}
