//! Integration tests for `DocStoreClient` against a mock server

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use larder_core::environment::HttpClient;
use larder_core::http::{HttpError, HttpRequest};
use larder_docstore::{Collection, DocStoreClient};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup() -> (MockServer, Collection) {
    let server = MockServer::start().await;
    let collection = Collection::new(&server.uri(), "ingredients").unwrap();
    (server, collection)
}

#[tokio::test]
async fn get_collection_returns_keyed_documents() {
    let (server, collection) = setup().await;
    let body = json!({"k1": {"title": "Apple", "amount": "5"}});

    Mock::given(method("GET"))
        .and(path("/ingredients.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let result = DocStoreClient::new()
        .execute(HttpRequest::get(collection.url()))
        .await
        .unwrap();

    assert_eq!(result, body);
}

#[tokio::test]
async fn filtered_query_sends_order_by_and_equal_to() {
    let (server, collection) = setup().await;

    Mock::given(method("GET"))
        .and(path("/ingredients.json"))
        .and(query_param("orderBy", "\"title\""))
        .and(query_param("equalTo", "\"Apple\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let result = DocStoreClient::new()
        .execute(HttpRequest::get(collection.query_url("Apple")))
        .await
        .unwrap();

    assert_eq!(result, json!({}));
}

#[tokio::test]
async fn post_sends_json_body() {
    let (server, collection) = setup().await;

    Mock::given(method("POST"))
        .and(path("/ingredients.json"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"title": "Flour", "amount": "3"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "k9"})))
        .expect(1)
        .mount(&server)
        .await;

    let result = DocStoreClient::new()
        .execute(HttpRequest::post(
            collection.url(),
            json!({"title": "Flour", "amount": "3"}),
        ))
        .await
        .unwrap();

    assert_eq!(result["name"], "k9");
}

#[tokio::test]
async fn delete_with_null_or_empty_body_is_null() {
    let (server, collection) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/ingredients/k1.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/ingredients/k2.json"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = DocStoreClient::new();
    for id in ["k1", "k2"] {
        let result = client
            .execute(HttpRequest::delete(collection.document_url(id)))
            .await
            .unwrap();
        assert_eq!(result, serde_json::Value::Null);
    }
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let (server, collection) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Permission denied"})))
        .mount(&server)
        .await;

    let result = DocStoreClient::new()
        .execute(HttpRequest::get(collection.url()))
        .await;

    assert_eq!(result, Err(HttpError::Status { status: 401 }));
}

#[tokio::test]
async fn undecodable_body_is_a_decode_error() {
    let (server, collection) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = DocStoreClient::new()
        .execute(HttpRequest::get(collection.url()))
        .await;

    assert!(matches!(result, Err(HttpError::Decode(_))));
}

#[tokio::test]
async fn timeout_is_a_transport_error() {
    let (server, collection) = setup().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let result = DocStoreClient::new()
        .with_timeout(Duration::from_millis(50))
        .execute(HttpRequest::get(collection.url()))
        .await;

    assert!(matches!(result, Err(HttpError::Transport(_))));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let collection = Collection::new("http://127.0.0.1:9", "ingredients").unwrap();

    let result = DocStoreClient::new()
        .with_timeout(Duration::from_secs(2))
        .execute(HttpRequest::get(collection.url()))
        .await;

    assert!(matches!(result, Err(HttpError::Transport(_))));
}
