use std::sync::Arc;

use prodscope::config::ConnectionConfig;
use prodscope::gateway::{
    GatewayRequest, GatewayResponse, QueryError, QueryExecutor, ScriptedGateway,
};
use serde_json::json;

fn connection() -> ConnectionConfig {
    ConnectionConfig::new("db.internal", "catalog", "reader", "secret").with_port(6543)
}

#[tokio::test]
async fn test_non_select_is_rejected_before_gateway() {
    let gateway = Arc::new(ScriptedGateway::new());
    let executor = QueryExecutor::new(gateway.clone(), connection());

    let err = executor
        .execute("DELETE FROM products", Vec::new())
        .await
        .unwrap_err();

    assert!(matches!(err, QueryError::Validation(_)));
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn test_guard_trims_and_ignores_case() {
    let gateway = Arc::new(ScriptedGateway::new().with_search_rows(vec![json!({"n": 1})]));
    let executor = QueryExecutor::new(gateway.clone(), connection());

    let rows = executor.execute("  select 1 AS n", Vec::new()).await.unwrap();
    assert_eq!(rows.len(), 1);

    let err = executor
        .execute("  update products SET x = 1", Vec::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "validation");
    assert_eq!(gateway.call_count(), 1);
}

#[tokio::test]
async fn test_incomplete_connection_is_a_config_error() {
    let gateway = Arc::new(ScriptedGateway::new());
    let executor = QueryExecutor::new(
        gateway.clone(),
        ConnectionConfig::new("", "catalog", "", "secret"),
    );

    let err = executor.execute("SELECT 1", Vec::new()).await.unwrap_err();

    match err {
        QueryError::Config(message) => {
            assert!(message.contains("host"));
            assert!(message.contains("user"));
        }
        other => panic!("expected config error, got {:?}", other),
    }
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn test_request_carries_connection_and_params() {
    let gateway = Arc::new(ScriptedGateway::new());
    let executor = QueryExecutor::new(gateway.clone(), connection());

    executor
        .execute("SELECT * FROM products WHERE id = $1", vec![json!(7)])
        .await
        .unwrap();

    let requests = gateway.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].read_only);
    assert_eq!(requests[0].params, vec![json!(7)]);
    assert_eq!(requests[0].db_config.host, "db.internal");
    assert_eq!(requests[0].db_config.port, 6543);
}

#[test]
fn test_request_wire_format() {
    let request = GatewayRequest::read_only("SELECT 1", vec![json!("%x%")], connection());
    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(
        value,
        json!({
            "query": "SELECT 1",
            "params": ["%x%"],
            "readOnly": true,
            "dbConfig": {
                "host": "db.internal",
                "port": 6543,
                "database": "catalog",
                "user": "reader",
                "password": "secret"
            }
        })
    );
}

#[test]
fn test_response_decoding() {
    let ok: GatewayResponse =
        serde_json::from_value(json!({"data": [{"id": 1}], "count": 1, "error": null})).unwrap();
    assert_eq!(ok.into_rows().unwrap().len(), 1);

    let empty: GatewayResponse = serde_json::from_value(json!({"data": null, "count": 0})).unwrap();
    assert!(empty.into_rows().unwrap().is_empty());

    let failed: GatewayResponse = serde_json::from_value(json!({
        "data": null,
        "count": 0,
        "error": "relation does not exist"
    }))
    .unwrap();
    assert_eq!(
        failed.into_rows().unwrap_err(),
        QueryError::Database("relation does not exist".into())
    );
}

#[test]
fn test_status_mapping() {
    for status in [401_u16, 403, 404, 500, 503, 418] {
        let err = QueryError::from_status(status);
        assert!(matches!(err, QueryError::Gateway { status: s, .. } if s == status));
        assert!(!err.to_string().is_empty());
    }
    assert!(QueryError::from_status(502).is_retryable());
    assert!(!QueryError::from_status(404).is_retryable());
    assert!(QueryError::Network("reset".into()).is_retryable());
    assert!(!QueryError::Validation("no".into()).is_retryable());
}
