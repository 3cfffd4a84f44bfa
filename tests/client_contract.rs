//! Sync client contract tests.
//!
//! A mock record store checks the exact requests the client sends and feeds
//! back each response shape the real store can produce:
//! - JSON status bodies for applied mutations
//! - plain-text validation messages with a 200 status
//! - `404 not found` for operational failures

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use serde_json::json;
use todosync::client::{MutationOutcome, TodoClient};
use todosync::{TodoError, TodoFields};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn milk() -> TodoFields {
    TodoFields::new("Buy milk", "2%", "2024-01-01", "3")
}

// ────────────────────────────────────────────────────────────────────────────
// Request format
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_sends_fields_as_query_parameters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/add"))
        .and(query_param("name", "Buy milk"))
        .and(query_param("description", "2%"))
        .and(query_param("date", "2024-01-01"))
        .and(query_param("importance", "3"))
        .and(query_param_is_missing("label"))
        .and(query_param_is_missing("id"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "ok", "affected": 1, "id": 1})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TodoClient::new(mock_server.uri());
    let outcome = client.add(&milk()).await;
    assert!(outcome.is_applied(), "unexpected outcome: {outcome:?}");
}

#[tokio::test]
async fn update_sends_id_and_label() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/update"))
        .and(query_param("id", "7"))
        .and(query_param("label", "errand"))
        .and(query_param("name", "Buy milk"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "ok", "affected": 1, "id": 7})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TodoClient::new(format!("{}/", mock_server.uri()));
    let outcome = client.update("7", &milk().with_label("errand")).await;
    let MutationOutcome::Applied(status) = outcome else {
        panic!("expected applied, got {outcome:?}");
    };
    assert_eq!(status.id, 7);
    assert_eq!(status.affected, 1);
}

#[tokio::test]
async fn delete_sends_only_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/delete"))
        .and(query_param("id", "3"))
        .and(query_param_is_missing("name"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "ok", "affected": 0, "id": 3})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TodoClient::new(mock_server.uri());
    let outcome = client.delete("3").await;
    assert!(matches!(outcome, MutationOutcome::Applied(ref s) if s.affected == 0));
}

#[tokio::test]
async fn empty_inputs_are_forwarded_unvalidated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/add"))
        .and(query_param("name", ""))
        .respond_with(ResponseTemplate::new(200).set_body_string("name is a required argument"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TodoClient::new(mock_server.uri());
    let outcome = client.add(&TodoFields::new("", "d", "x", "1")).await;
    assert_eq!(
        outcome,
        MutationOutcome::Rejected("name is a required argument".to_owned())
    );
}

// ────────────────────────────────────────────────────────────────────────────
// Response classification
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn not_found_is_a_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/delete"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&mock_server)
        .await;

    let client = TodoClient::new(mock_server.uri());
    let outcome = client.delete("abc").await;
    let message = outcome.error_message().unwrap();
    assert!(message.contains("404"), "message: {message}");
}

#[tokio::test]
async fn unreachable_store_is_a_failure() {
    let mock_server = MockServer::start().await;
    let uri = mock_server.uri();
    drop(mock_server);

    let client = TodoClient::new(uri);
    let outcome = client.add(&milk()).await;
    assert!(matches!(outcome, MutationOutcome::Failed(_)));
    assert!(
        outcome
            .error_message()
            .unwrap()
            .starts_with("request failed:")
    );
}

// ────────────────────────────────────────────────────────────────────────────
// Fetch
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_all_keeps_server_order() {
    let mock_server = MockServer::start().await;

    let body = r#"{"9":{"label":null,"name":"late","description":"d","date":"2024-03-01","importance":"1"},"2":{"label":"work","name":"early","description":"d","date":"2024-01-01","importance":5}}"#;
    Mock::given(method("GET"))
        .and(path("/v1/all"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TodoClient::new(mock_server.uri());
    let snapshot = client.fetch_all().await.unwrap();
    let ids: Vec<_> = snapshot.records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![9, 2]);
    assert_eq!(snapshot.get(2).unwrap().fields.importance, "5");
    assert_eq!(snapshot.get(2).unwrap().fields.label.as_deref(), Some("work"));
}

#[tokio::test]
async fn fetch_all_error_status_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/all"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&mock_server)
        .await;

    let client = TodoClient::new(mock_server.uri());
    let err = client.fetch_all().await.unwrap_err();
    assert!(matches!(err, TodoError::Http(ref m) if m.contains("404")));
}
