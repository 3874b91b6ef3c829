//! Store client integration tests against a mock HTTP server.

use jia_client::{CustomerStore, RestCustomerStore, StoreError};
use jia_config::StoreConfig;
use jia_protocol::CustomerDraft;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store_for(server: &MockServer) -> RestCustomerStore {
    RestCustomerStore::new(&StoreConfig {
        url: server.uri(),
        api_key: "test-key".to_string(),
    })
    .expect("store client")
}

fn customer_row(id: i64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "created_at": "2026-07-01T09:30:00Z"
    })
}

#[tokio::test]
async fn list_sends_credentials_and_decodes_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/customers"))
        .and(header("apikey", "test-key"))
        .and(query_param("order", "name.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            customer_row(1, "Acme Corporation"),
            customer_row(2, "Globex Corporation"),
        ])))
        .mount(&server)
        .await;

    let customers = store_for(&server).list_customers().await.expect("list");
    assert_eq!(customers.len(), 2);
    assert_eq!(customers[0].name, "Acme Corporation");
}

#[tokio::test]
async fn count_reads_content_range_total() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/customers"))
        .and(header("Prefer", "count=exact"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-range", "0-0/57")
                .set_body_json(json!([customer_row(1, "Acme Corporation")])),
        )
        .mount(&server)
        .await;

    let total = store_for(&server).count_customers().await.expect("count");
    assert_eq!(total, 57);
}

#[tokio::test]
async fn create_returns_store_assigned_row() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/customers"))
        .and(header("Prefer", "return=representation"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
            "id": 99,
            "name": "Initech Inc",
            "gst_number": "19AADCI2541P1Z4",
            "created_at": "2026-08-01T12:00:00Z"
        }])))
        .mount(&server)
        .await;

    let draft = CustomerDraft {
        name: "Initech Inc".to_string(),
        gst_number: Some("19AADCI2541P1Z4".to_string()),
        ..CustomerDraft::default()
    };
    let created = store_for(&server)
        .create_customer(&draft)
        .await
        .expect("create");
    assert_eq!(created.id, 99);
    assert_eq!(created.gst_number.as_deref(), Some("19AADCI2541P1Z4"));
}

#[tokio::test]
async fn constraint_violation_surfaces_as_validation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/customers"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "message": "duplicate key value violates unique constraint"
        })))
        .mount(&server)
        .await;

    let err = store_for(&server)
        .create_customer(&CustomerDraft {
            name: "Acme Corporation".to_string(),
            ..CustomerDraft::default()
        })
        .await
        .expect_err("conflict");
    match err {
        StoreError::Validation(message) => assert!(message.contains("duplicate key")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn server_failure_surfaces_as_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/customers"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = store_for(&server).list_customers().await.expect_err("down");
    match err {
        StoreError::Unavailable(message) => assert_eq!(message, "store error 503"),
        other => panic!("unexpected error: {other:?}"),
    }
}
