//! Integration tests for the cookie-preserving transport against a mock server.

use httpmock::prelude::*;
use librus_http::{
    DEFAULT_USER_AGENT, HttpClient, HttpClientConfig, HttpError, HttpRequest, HttpTransport,
    StatusCode,
};

fn test_client() -> HttpClient {
    HttpClient::with_config(HttpClientConfig::for_testing()).unwrap()
}

#[tokio::test]
async fn cookies_persist_across_requests() {
    let server = MockServer::start();

    let set_cookie = server.mock(|when, then| {
        when.method(GET).path("/landing");
        then.status(200)
            .header("set-cookie", "DZIENNIKSID=abc123; Path=/")
            .body("<html></html>");
    });
    let with_cookie = server.mock(|when, then| {
        when.method(GET)
            .path("/accounts")
            .header("cookie", "DZIENNIKSID=abc123");
        then.status(200).body("{}");
    });

    let client = test_client();
    client
        .perform(HttpRequest::get(&server.url("/landing")).unwrap())
        .await
        .unwrap();
    let response = client
        .perform(HttpRequest::get(&server.url("/accounts")).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    set_cookie.assert_calls(1);
    with_cookie.assert_calls(1);
}

#[tokio::test]
async fn redirects_are_observed_unless_requested() {
    let server = MockServer::start();

    let redirect = server.mock(|when, then| {
        when.method(GET).path("/start");
        then.status(302).header("location", "/target");
    });
    let target = server.mock(|when, then| {
        when.method(GET).path("/target");
        then.status(200).body("arrived");
    });

    let client = test_client();

    let observed = client
        .perform(HttpRequest::get(&server.url("/start")).unwrap())
        .await
        .unwrap();
    assert_eq!(observed.status(), StatusCode::FOUND);
    assert_eq!(target.calls(), 0);

    let followed = client
        .perform(
            HttpRequest::get(&server.url("/start"))
                .unwrap()
                .follow_redirects(true),
        )
        .await
        .unwrap();
    assert_eq!(followed.status(), StatusCode::OK);
    assert_eq!(followed.text(), "arrived");

    redirect.assert_calls(2);
    target.assert_calls(1);
}

#[tokio::test]
async fn default_user_agent_is_sent() {
    let server = MockServer::start();

    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/ua")
            .header("user-agent", DEFAULT_USER_AGENT);
        then.status(200);
    });

    test_client()
        .perform(HttpRequest::get(&server.url("/ua")).unwrap())
        .await
        .unwrap();

    mock.assert_calls(1);
}

#[tokio::test]
async fn explicit_user_agent_is_not_overwritten() {
    let server = MockServer::start();

    let mock = server.mock(|when, then| {
        when.method(GET).path("/ua").header("user-agent", "custom/2.0");
        then.status(200);
    });

    let request = HttpRequest::get(&server.url("/ua"))
        .unwrap()
        .try_header("user-agent", "custom/2.0")
        .unwrap();
    test_client().perform(request).await.unwrap();

    mock.assert_calls(1);
}

#[tokio::test]
async fn post_sends_json_body() {
    let server = MockServer::start();

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/login")
            .header("content-type", "application/json");
        then.status(200).body("ok");
    });

    let request = HttpRequest::post(&server.url("/login"))
        .unwrap()
        .json(&serde_json::json!({"email": "jan@example.com"}))
        .unwrap();
    let response = test_client().perform(request).await.unwrap();

    assert!(response.is_success());
    mock.assert_calls(1);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/big");
        then.status(200).body("x".repeat(64));
    });

    let config = HttpClientConfig {
        max_body_size: 16,
        ..HttpClientConfig::for_testing()
    };
    let client = HttpClient::with_config(config).unwrap();
    let err = client
        .perform(HttpRequest::get(&server.url("/big")).unwrap())
        .await
        .unwrap_err();

    assert!(
        matches!(err, HttpError::BodyTooLarge { limit: 16, .. }),
        "expected BodyTooLarge, got: {err}"
    );
}

#[tokio::test]
async fn plain_http_is_rejected_by_default() {
    let client = HttpClient::new().unwrap();
    let err = client
        .perform(HttpRequest::get("http://127.0.0.1:9/never").unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, HttpError::InvalidScheme { ref scheme, .. } if scheme == "http"));
}

/// 4096 bytes of `x`, gzip-compressed to 38 bytes.
const GZIP_4K: [u8; 38] = [
    0x1f, 0x8b, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02, 0x03, 0xed, 0xc1, 0x01, 0x0d, 0x00,
    0x00, 0x00, 0xc2, 0xa0, 0xda, 0x8f, 0x6f, 0x0f, 0x07, 0x14, 0x00, 0x00, 0x00, 0xf0, 0x6e,
    0xc1, 0x77, 0x10, 0x3e, 0x00, 0x10, 0x00, 0x00,
];

#[tokio::test]
async fn decompressed_body_is_capped() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/bomb");
        then.status(200)
            .header("content-encoding", "gzip")
            .body(GZIP_4K);
    });

    let config = HttpClientConfig {
        max_body_size: 1024,
        ..HttpClientConfig::for_testing()
    };
    let client = HttpClient::with_config(config).unwrap();
    let err = client
        .perform(HttpRequest::get(&server.url("/bomb")).unwrap())
        .await
        .unwrap_err();

    assert!(
        matches!(err, HttpError::BodyTooLarge { limit: 1024, actual } if actual > 1024),
        "expected BodyTooLarge on the decoded size, got: {err}"
    );
}

#[tokio::test]
async fn compressed_body_within_cap_is_decoded() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/small");
        then.status(200)
            .header("content-encoding", "gzip")
            .body(GZIP_4K);
    });

    let response = test_client()
        .perform(HttpRequest::get(&server.url("/small")).unwrap())
        .await
        .unwrap();

    assert_eq!(response.text().len(), 4096);
    assert!(response.text().bytes().all(|b| b == b'x'));
}
