//! Integration tests for middleware functionality.

use std::time::Duration;

use plier::middleware::{BearerAuthLayer, LoggingLayer, Middleware, create_retry_with};
use plier::retry::BackoffConfig;
use plier::{Call, Config, Error, invoke};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, header_exists, method, path},
};

/// Backoff short enough for tests against a real server.
fn quick_backoff() -> BackoffConfig {
    BackoffConfig::default()
        .with_initial_delay(Duration::from_millis(5))
        .with_max_delay(Duration::from_millis(20))
}

/// Test that bearer auth middleware adds Authorization header.
#[tokio::test]
async fn test_bearer_auth_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/protected"))
        .and(header("Authorization", "Bearer my-secret-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"user": "alice"})),
        )
        .mount(&mock_server)
        .await;

    let response = Config::new()
        .url(mock_server.uri())
        .path("/protected")
        .with_bearer_auth("my-secret-token")
        .send()
        .await
        .expect("response");

    assert!(response.is_success());
}

/// Test that logging middleware doesn't break request/response flow.
#[tokio::test]
async fn test_logging_middleware() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/logged"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"logged": true})))
        .mount(&mock_server)
        .await;

    let response = Config::new()
        .url(mock_server.uri())
        .path("/logged")
        .with(Middleware::layer(LoggingLayer::debug()))
        .send()
        .await
        .expect("response");

    let body: serde_json::Value = response.json().expect("json");
    assert_eq!(body["logged"], true);
}

/// Test multiple middleware composed together.
#[tokio::test]
async fn test_middleware_composition() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/composed"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"composed": true})),
        )
        .mount(&mock_server)
        .await;

    // Outermost first on the way in: logging -> retry -> bearer auth
    let response = Config::new()
        .url(mock_server.uri())
        .path("/composed")
        .with_bearer_auth("test-token")
        .with(create_retry_with(2, quick_backoff()))
        .with_logging()
        .send()
        .await
        .expect("response");

    assert!(response.is_success());
}

/// Test that a server error is retried until the budget is spent.
#[tokio::test]
async fn test_retry_on_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/unstable"))
        .respond_with(ResponseTemplate::new(503))
        .expect(4)
        .mount(&mock_server)
        .await;

    let err = Config::new()
        .url(mock_server.uri())
        .path("/unstable")
        .error_for_status()
        .with(create_retry_with(3, quick_backoff()))
        .send()
        .await
        .expect_err("service unavailable");

    assert_eq!(err.status(), Some(503));
    assert!(err.is_server_error());
    mock_server.verify().await;
}

/// Test that a client error is not retried.
#[tokio::test]
async fn test_no_retry_on_client_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"error": "no such item"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = Config::new()
        .url(mock_server.uri())
        .path("/missing")
        .error_for_status()
        .with(create_retry_with(3, quick_backoff()))
        .send()
        .await
        .expect_err("not found");

    assert!(matches!(err, Error::Http { status: 404, .. }));
    let body: serde_json::Value = err
        .decode_body()
        .expect("has body")
        .expect("json body");
    assert_eq!(body["error"], "no such item");
    mock_server.verify().await;
}

/// Test that a client error keeps its status when no retry sits outside the status check.
#[tokio::test]
async fn test_client_error_status_without_outer_retry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("nope"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let alone = Config::new()
        .url(mock_server.uri())
        .path("/missing")
        .error_for_status();
    let err = alone.send().await.expect_err("not found");
    assert_eq!(err.status(), Some(404));
    assert!(err.is_client_error());

    // Status check outermost: the retry below it never sees the converted error.
    let after_retry = Config::new()
        .url(mock_server.uri())
        .path("/missing")
        .with(create_retry_with(3, quick_backoff()))
        .error_for_status();
    let err = after_retry.send().await.expect_err("not found");
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.body().map(|b| &b[..]), Some(&b"nope"[..]));

    mock_server.verify().await;
}

/// Test that a flaky endpoint recovers through retries.
#[tokio::test]
async fn test_retry_recovers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("finally"))
        .mount(&mock_server)
        .await;

    let response = Config::new()
        .url(mock_server.uri())
        .path("/flaky")
        .error_for_status()
        .with(create_retry_with(3, quick_backoff()))
        .send()
        .await
        .expect("recovered");

    assert_eq!(response.text().expect("utf-8"), "finally");
}

/// Test that a custom middleware can edit the request on its way down.
#[tokio::test]
async fn test_custom_middleware_adds_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/traced"))
        .and(header_exists("x-request-id"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let request_id = Middleware::new(|next: Call, _config: &Config| {
        Call::new(plier::tower::service_fn(move |mut request: plier::Request| {
            let next = next.clone();
            async move {
                request
                    .headers_mut()
                    .insert("x-request-id".to_string(), "req-1".to_string());
                let (address, options) = request.into_parts();
                invoke(&next, address, options).await
            }
        }))
    });

    let response = Config::new()
        .url(mock_server.uri())
        .path("/traced")
        .with(request_id)
        .send()
        .await
        .expect("response");

    assert_eq!(response.status(), 204);
}

/// Test that a tower layer works as a middleware.
#[tokio::test]
async fn test_tower_layer_as_middleware() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/layered"))
        .and(header("Authorization", "Bearer layered"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let response = Config::new()
        .url(mock_server.uri())
        .path("/layered")
        .layer(BearerAuthLayer::new("layered"))
        .send()
        .await
        .expect("response");

    assert!(response.is_success());
}
