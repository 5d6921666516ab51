//! HTTP-level tests for `QuoteClient` against a local mock server.

use remit_eta_client::{QuoteClient, QuoteConfig, QuoteError, QuoteRequest, QuoteSource};
use remit_eta_core::{PaymentMethodSpec, TestCase};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{basic_auth, body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> QuoteClient {
    let config = QuoteConfig::new(&server.uri()).with_credentials("probe-id", "probe-secret");
    QuoteClient::new(config).expect("client builds")
}

fn gbp_eur_request() -> QuoteRequest {
    QuoteRequest::for_case(
        &TestCase::new("GBP", "EUR", 1000.0),
        &PaymentMethodSpec::default_method("Default"),
        "FIXED",
    )
}

#[tokio::test]
async fn fetch_quote_posts_body_with_basic_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/quotes"))
        .and(basic_auth("probe-id", "probe-secret"))
        .and(body_json(json!({
            "sourceCurrency": "GBP",
            "targetCurrency": "EUR",
            "sourceAmount": 1000.0,
            "rateType": "FIXED"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "quote-1",
            "paymentOptions": [{ "payIn": "BANK_TRANSFER", "payOut": "BANK_TRANSFER" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let body = client_for(&server)
        .fetch_quote(&gbp_eur_request())
        .await
        .expect("quote succeeds");
    assert_eq!(body["id"], "quote-1");
    assert_eq!(body["paymentOptions"][0]["payIn"], "BANK_TRANSFER");
}

#[tokio::test]
async fn fetch_quote_non_2xx_keeps_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/quotes"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "errors": [{ "code": "error.route.not.supported" }]
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_quote(&gbp_eur_request())
        .await
        .unwrap_err();
    match &err {
        QuoteError::Status { status, .. } => assert_eq!(*status, 422),
        other => panic!("expected Status, got {other:?}"),
    }
    assert_eq!(
        err.payload(),
        Some(json!({ "errors": [{ "code": "error.route.not.supported" }] }))
    );
}

#[tokio::test]
async fn fetch_quote_rejects_non_object_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/quotes"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_quote(&gbp_eur_request())
        .await
        .unwrap_err();
    assert!(matches!(err, QuoteError::MalformedBody { .. }));
}

#[tokio::test]
async fn fetch_quote_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/quotes"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = QuoteConfig::new(&server.uri())
        .with_credentials("probe-id", "probe-secret")
        .with_timeout_secs(1);
    let client = QuoteClient::new(config).expect("client builds");

    let err = client.fetch_quote(&gbp_eur_request()).await.unwrap_err();
    assert!(matches!(err, QuoteError::Timeout { secs: 1 }), "got {err:?}");
}

#[tokio::test]
async fn validate_credentials_accepts_2xx() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/rates"))
        .and(query_param("source", "GBP"))
        .and(query_param("target", "EUR"))
        .and(basic_auth("probe-id", "probe-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "rate": 1.17 }])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let source: &dyn QuoteSource = &client;
    source.validate_credentials().await.expect("credentials ok");
}

#[tokio::test]
async fn validate_credentials_maps_401_to_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/rates"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client_for(&server).validate_credentials().await.unwrap_err();
    assert!(matches!(err, QuoteError::Unauthorized { status: 401 }));
}

#[tokio::test]
async fn validate_credentials_requires_configured_secret() {
    let server = MockServer::start().await;
    let client = QuoteClient::new(QuoteConfig::new(&server.uri())).expect("client builds");

    let err = client.validate_credentials().await.unwrap_err();
    assert!(matches!(err, QuoteError::Config(_)));
}
