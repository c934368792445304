use std::collections::HashMap;

use reqwest::StatusCode;
use serde_json::json;

use super::*;
use crate::TransportError;
use crate::testing::{HangingTransport, StubTransport, client};

fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn builder_defaults() {
    let client = Client::builder()
        .username("alice")
        .password("secret")
        .transport(StubTransport::default())
        .build()
        .unwrap();

    assert_eq!(client.endpoint().as_str(), "https://dnsimple.com/");
    assert_eq!(client.timeout(), Duration::from_secs(30));
    assert_eq!(client.credentials(), Credentials::new("alice", "secret"));
}

#[test]
fn builder_missing_fields() {
    let err = Client::builder().password("secret").build().unwrap_err();
    assert!(matches!(err, ClientBuilderError::MissingField(f) if f == "username"));

    let err = Client::builder().username("alice").build().unwrap_err();
    assert!(matches!(err, ClientBuilderError::MissingField(f) if f == "password"));
}

#[test]
fn builder_rejects_zero_timeout() {
    let err = Client::builder()
        .username("alice")
        .password("secret")
        .timeout(Duration::ZERO)
        .transport(StubTransport::default())
        .build()
        .unwrap_err();
    assert!(matches!(err, ClientBuilderError::InvalidTimeout(_)));
}

#[test]
fn builder_adds_trailing_slash() {
    let client = Client::builder()
        .endpoint(&"https://api.example.test/v1".parse().unwrap())
        .endpoint_if_some(None)
        .username("alice")
        .password("secret")
        .transport(StubTransport::default())
        .build()
        .unwrap();

    assert_eq!(client.endpoint().as_str(), "https://api.example.test/v1/");
    assert_eq!(
        client.build_url(&["domains", "7", "records"]).unwrap().as_str(),
        "https://api.example.test/v1/domains/7/records.json"
    );
}

#[test]
fn builder_from_lookup() {
    let client = Client::builder()
        .apply_env(env(&[
            ("DNSIMPLE_URL", "http://localhost:8080/"),
            ("DNSIMPLE_USERNAME", "bob"),
            ("DNSIMPLE_PASSWORD", "hunter2"),
            ("DNSIMPLE_TIMEOUT_SECS", " 5 "),
        ]))
        .unwrap()
        .transport(StubTransport::default())
        .build()
        .unwrap();

    assert_eq!(client.endpoint().as_str(), "http://localhost:8080/");
    assert_eq!(client.credentials(), Credentials::new("bob", "hunter2"));
    assert_eq!(client.timeout(), Duration::from_secs(5));

    // explicit settings made afterwards win
    let client = Client::builder()
        .apply_env(env(&[("DNSIMPLE_USERNAME", "bob")]))
        .unwrap()
        .username("carol")
        .password("pw")
        .transport(StubTransport::default())
        .build()
        .unwrap();
    assert_eq!(client.credentials().username(), "carol");

    let err = Client::builder()
        .apply_env(env(&[("DNSIMPLE_TIMEOUT_SECS", "soon")]))
        .unwrap_err();
    assert!(matches!(err, ClientBuilderError::InvalidTimeout(t) if t == "soon"));

    let err = Client::builder()
        .apply_env(env(&[("DNSIMPLE_URL", "not a url")]))
        .unwrap_err();
    assert!(matches!(err, ClientBuilderError::UrlParse(_)));
}

#[test]
fn url_building() {
    let stub = StubTransport::default();
    let client = client(&stub);

    assert_eq!(
        client.build_url(&["domains"]).unwrap().as_str(),
        "https://dnsimple.test/domains.json"
    );
    assert_eq!(
        client.build_url(&["domains", "example.com"]).unwrap().as_str(),
        "https://dnsimple.test/domains/example.com.json"
    );
    assert_eq!(
        client
            .build_url(&["domains", "1", "records", "42"])
            .unwrap()
            .as_str(),
        "https://dnsimple.test/domains/1/records/42.json"
    );
}

#[test]
fn url_sections_are_single_segments() {
    let stub = StubTransport::default();
    let client = client(&stub);

    let url = client.build_url(&["domains", "x?y"]).unwrap();
    assert_eq!(url.path(), "/domains/x%3Fy.json");
    assert_eq!(url.query(), None);

    let url = client.build_url(&["domains", "a/b"]).unwrap();
    assert_eq!(url.path(), "/domains/a%2Fb.json");

    let url = client.build_url(&["domains", "#frag"]).unwrap();
    assert_eq!(url.path(), "/domains/%23frag.json");
    assert_eq!(url.fragment(), None);

    let url = client
        .build_url(&["domains", "../domains/1/records/5"])
        .unwrap();
    assert_eq!(url.path(), "/domains/..%2Fdomains%2F1%2Frecords%2F5.json");

    let url = client.build_url(&["domains", ".."]).unwrap();
    assert_eq!(url.path(), "/domains/...json");
}

#[test]
fn builder_debug_hides_password() {
    let builder = Client::builder().username("alice").password("secret");
    let debug = format!("{builder:?}");
    assert!(debug.contains("alice"));
    assert!(debug.contains("<redacted>"));
    assert!(!debug.contains("secret"));

    let err = Client::builder()
        .password("secret")
        .apply_env(env(&[("DNSIMPLE_TIMEOUT_SECS", "0x10")]))
        .unwrap_err();
    assert!(matches!(err, ClientBuilderError::InvalidTimeout(_)));
}

#[test]
fn credentials_are_redacted() {
    let debug = format!("{:?}", Credentials::new("alice", "secret"));
    assert!(debug.contains("alice"));
    assert!(!debug.contains("secret"));
}

#[tokio::test]
async fn authorization_follows_credentials() {
    let stub = StubTransport::default();
    stub.respond_json(200, json!([])).respond_json(200, json!([]));
    let client = client(&stub);

    client.domains().all().await.unwrap();
    assert_eq!(stub.last_request().authorization, "Basic YWxpY2U6c2VjcmV0");

    client.set_credentials(Credentials::new("bob", "hunter2"));
    client.domains().all().await.unwrap();
    assert_eq!(
        stub.last_request().authorization,
        codec::basic_auth("bob", "hunter2")
    );
}

#[tokio::test]
async fn non_success_statuses_are_errors() {
    let stub = StubTransport::default();
    stub.respond(401, r#"{"message": "Authentication failed"}"#)
        .respond(500, "boom")
        .respond(200, "not json");
    let client = client(&stub);

    let err = client.domains().all().await.unwrap_err();
    assert!(matches!(&err, ClientError::Auth(e) if e.message() == "Authentication failed"));
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));

    let err = client.domains().all().await.unwrap_err();
    assert!(matches!(err, ClientError::Api(_)));

    let err = client.domains().all().await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn transport_failures_are_errors() {
    let stub = StubTransport::default();
    let client = client(&stub);

    let err = client.domains().find("example.com").await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(TransportError::Other(_))));
}

#[tokio::test]
async fn requests_time_out() {
    let client = Client::builder()
        .username("alice")
        .password("secret")
        .timeout(Duration::from_millis(20))
        .transport(HangingTransport)
        .build()
        .unwrap();

    let err = client.domains().all().await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout(t) if t == Duration::from_millis(20)));
}

#[tokio::test]
async fn requests_can_be_cancelled() {
    let client = Client::builder()
        .username("alice")
        .password("secret")
        .transport(HangingTransport)
        .build()
        .unwrap();

    let token = CancellationToken::new();
    let cancellable = client.with_cancellation(token.clone());
    let pending = tokio::spawn(async move { cancellable.domains().all().await });

    tokio::task::yield_now().await;
    token.cancel();

    let err = pending.await.unwrap().unwrap_err();
    assert!(matches!(err, ClientError::Cancelled));
    assert!(!client.cancellation_token().is_cancelled());
}

#[tokio::test]
async fn cancelled_handles_fail_immediately() {
    let stub = StubTransport::default();
    let client = client(&stub);
    client.cancellation_token().cancel();

    let err = client.domains().all().await.unwrap_err();
    assert!(matches!(err, ClientError::Cancelled));
    assert!(stub.requests().is_empty());
}
