//! Integration tests for request execution over `HyperTransport` using wiremock.

use std::time::Duration;

use plier::{Config, HyperTransport, Method, TransportConfig, execute};
use serde::{Deserialize, Serialize};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, body_string, header, method, path, query_param},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct User {
    id: u64,
    name: String,
}

#[tokio::test]
async fn test_get_request() {
    let mock_server = MockServer::start().await;

    let user = User {
        id: 1,
        name: "Alice".to_string(),
    };

    Mock::given(method("GET"))
        .and(path("/users/1"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&user))
        .mount(&mock_server)
        .await;

    let config = Config::new()
        .url(mock_server.uri())
        .path("/users/1")
        .header("Accept", "application/json");

    let response = execute(&config).await.expect("response");

    assert!(response.is_success());
    assert_eq!(response.status(), 200);

    let body: User = response.json().expect("json");
    assert_eq!(body, user);
}

#[tokio::test]
async fn test_post_request_with_json_body() {
    let mock_server = MockServer::start().await;

    let input = User {
        id: 0,
        name: "Bob".to_string(),
    };
    let output = User {
        id: 42,
        name: "Bob".to_string(),
    };

    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(&input))
        .respond_with(ResponseTemplate::new(201).set_body_json(&output))
        .mount(&mock_server)
        .await;

    let response = Config::new()
        .url(mock_server.uri())
        .path("users")
        .method(Method::POST)
        .json(&input)
        .expect("json body")
        .send()
        .await
        .expect("response");

    assert_eq!(response.status(), 201);
    let body: User = response.json().expect("json");
    assert_eq!(body, output);
}

#[tokio::test]
async fn test_form_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string("user=alice&remember=true"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let response = Config::new()
        .url(mock_server.uri())
        .path("/login")
        .method(Method::POST)
        .form(&[("user", "alice"), ("remember", "true")][..])
        .expect("form body")
        .send()
        .await
        .expect("response");

    assert_eq!(response.status(), 204);
}

#[tokio::test]
async fn test_error_status_resolves_without_middleware() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/not-found"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    let response = Config::new()
        .url(mock_server.uri())
        .path("/not-found")
        .send()
        .await
        .expect("response");

    assert!(response.is_client_error());
    assert_eq!(response.text().expect("utf-8"), "Not Found");
}

#[tokio::test]
async fn test_query_parameters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "rust"))
        .and(query_param("page", "1"))
        .and(query_param("lang", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": ["plier", "rustls"]
        })))
        .mount(&mock_server)
        .await;

    // The path already carries a query; configured pairs are appended with `&`.
    let response = Config::new()
        .url(format!("{}/", mock_server.uri()))
        .path("/search?lang=en")
        .query("q", "rust")
        .query("page", "1")
        .send()
        .await
        .expect("response");

    assert!(response.is_success());
}

#[tokio::test]
async fn test_configs_share_a_base() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200).set_body_string("a"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(200).set_body_string("b"))
        .mount(&mock_server)
        .await;

    let base = Config::new().url(mock_server.uri());
    let a = base.path("/a");
    let b = base.path("/b");

    assert_eq!(a.send().await.expect("a").text().expect("utf-8"), "a");
    assert_eq!(b.send().await.expect("b").text().expect("utf-8"), "b");
    assert_eq!(base.path_segment(), None);
}

#[tokio::test]
async fn test_response_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/with-headers"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Request-Id", "abc123")
                .insert_header("Content-Type", "application/json")
                .set_body_json(serde_json::json!({"ok": true})),
        )
        .mount(&mock_server)
        .await;

    let response = Config::new()
        .url(mock_server.uri())
        .path("/with-headers")
        .send()
        .await
        .expect("response");

    assert_eq!(response.header("x-request-id"), Some("abc123"));
    assert_eq!(response.header("content-type"), Some("application/json"));
}

#[tokio::test]
async fn test_request_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let err = Config::new()
        .url(mock_server.uri())
        .path("/slow")
        .timeout(Duration::from_millis(100))
        .send()
        .await
        .expect_err("expected timeout error");

    assert!(err.is_timeout(), "Expected timeout error, got: {err}");
}

#[tokio::test]
async fn test_transport_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let transport = HyperTransport::new(
        TransportConfig::builder()
            .timeout(Duration::from_millis(100))
            .build(),
    );

    let err = Config::new()
        .url(mock_server.uri())
        .path("/slow")
        .transport(transport.into_call())
        .send()
        .await
        .expect_err("expected timeout error");

    assert!(err.is_timeout(), "Expected timeout error, got: {err}");
}

#[tokio::test]
async fn test_connection_error() {
    let err = Config::new()
        .url("http://127.0.0.1:1")
        .send()
        .await
        .expect_err("expected connection error");

    assert!(err.is_connection(), "Expected connection error, got: {err}");
}

#[tokio::test]
async fn test_delete_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let response = Config::new()
        .url(mock_server.uri())
        .path("/users/1")
        .method(Method::DELETE)
        .send()
        .await
        .expect("response");

    assert_eq!(response.status(), 204);
}
