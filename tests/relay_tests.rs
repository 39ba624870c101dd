//! Integration tests for the relay endpoint and the batch load generator
//!
//! The upstream generative API is mocked with wiremock; the relay itself runs
//! under the actix test harness.

use actix_web::http::header::CONTENT_TYPE;
use actix_web::{test, web, App};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chat_relay::client::{run_batch, RelayClient};
use chat_relay::config::RelayConfig;
use chat_relay::server::routes;
use chat_relay::server::state::AppState;

const SSE_HELLO: &str = concat!(
    "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Hel\"}]}}]}\n",
    "\n",
    "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"lo\"}]}}]}\n",
    "\n",
);

fn test_config(upstream: &MockServer, default_api_key: Option<&str>) -> RelayConfig {
    RelayConfig {
        base_url: upstream.uri(),
        default_api_key: default_api_key.map(str::to_string),
        ..RelayConfig::default()
    }
}

macro_rules! relay_app {
    ($config:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new($config)))
                .configure(routes::configure),
        )
        .await
    };
}

fn chat_body(text: &str) -> serde_json::Value {
    serde_json::json!({ "messages": [{ "role": "user", "text": text }] })
}

#[actix_web::test]
async fn relay_reframes_sse_into_plain_text() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash-lite:streamGenerateContent"))
        .and(query_param("alt", "sse"))
        .and(query_param("key", "env-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_raw(SSE_HELLO, "text/event-stream"),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let app = relay_app!(test_config(&upstream, Some("env-key")));
    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(chat_body("hi"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers().get(CONTENT_TYPE).unwrap(),
        "text/plain; charset=utf-8"
    );
    let body = test::read_body(resp).await;
    assert_eq!(body, "Hello".as_bytes());
}

#[actix_web::test]
async fn request_api_key_and_model_override_defaults() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-pro:streamGenerateContent"))
        .and(query_param("key", "request-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(SSE_HELLO, "text/event-stream"),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let app = relay_app!(test_config(&upstream, Some("env-key")));
    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(serde_json::json!({
            "messages": [{ "role": "user", "text": "hi" }],
            "apiKey": "request-key",
            "modelName": "gemini-2.5-pro",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    assert_eq!(test::read_body(resp).await, "Hello".as_bytes());
}

#[actix_web::test]
async fn upstream_429_is_relayed_with_body_verbatim() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Resource exhausted"))
        .mount(&upstream)
        .await;

    let app = relay_app!(test_config(&upstream, Some("env-key")));
    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(chat_body("hi"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 429);
    assert_eq!(test::read_body(resp).await, "Resource exhausted".as_bytes());
}

#[actix_web::test]
async fn missing_api_key_fails_before_any_upstream_call() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let app = relay_app!(test_config(&upstream, None));
    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(chat_body("hi"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 500);
    assert_eq!(
        test::read_body(resp).await,
        "API key not configured".as_bytes()
    );
}

#[actix_web::test]
async fn empty_upstream_body_is_a_distinct_500() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("", "text/event-stream"))
        .mount(&upstream)
        .await;

    let app = relay_app!(test_config(&upstream, Some("env-key")));
    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(chat_body("hi"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 500);
    assert_eq!(test::read_body(resp).await, "Empty API response".as_bytes());
}

#[actix_web::test]
async fn malformed_frames_are_skipped_not_fatal() {
    let upstream = MockServer::start().await;
    let body = concat!(
        "data: {malformed\n",
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"ok\"}]}}]}\n",
    );
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&upstream)
        .await;

    let app = relay_app!(test_config(&upstream, Some("env-key")));
    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(chat_body("hi"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    assert_eq!(test::read_body(resp).await, "ok".as_bytes());
}

#[actix_web::test]
async fn health_endpoint_reports_service() {
    let upstream = MockServer::start().await;
    let app = relay_app!(test_config(&upstream, None));

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "chat-relay");
}

#[tokio::test]
async fn stress_batch_tallies_successes_and_429s() {
    let relay = MockServer::start().await;
    // First three requests succeed, the rest are rate-limited. Mount order
    // decides precedence; the success mock stops matching once exhausted.
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .up_to_n_times(3)
        .mount(&relay)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Resource exhausted"))
        .mount(&relay)
        .await;

    let client = RelayClient::new(format!("{}/api/chat", relay.uri()));
    let report = run_batch(&client, 5).await;

    assert_eq!(report.successful, 3);
    assert_eq!(report.failed_429, 2);
    assert_eq!(report.other_failed, 0);
}

#[tokio::test]
async fn stress_batch_counts_transport_failures_as_other() {
    // Nothing is listening on this port.
    let client = RelayClient::new("http://127.0.0.1:9/api/chat");
    let report = run_batch(&client, 2).await;

    assert_eq!(report.successful, 0);
    assert_eq!(report.failed_429, 0);
    assert_eq!(report.other_failed, 2);
}

#[tokio::test]
async fn relay_client_streams_chunks_in_order() {
    let relay = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Hello there"))
        .mount(&relay)
        .await;

    let client = RelayClient::new(format!("{}/api/chat", relay.uri()));
    let mut received = String::new();
    client
        .send(vec![chat_relay::Turn::user("hi")], |chunk| {
            received.push_str(chunk);
        })
        .await
        .unwrap();

    assert_eq!(received, "Hello there");
}

#[tokio::test]
async fn relay_client_surfaces_error_status() {
    let relay = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&relay)
        .await;

    let client = RelayClient::new(format!("{}/api/chat", relay.uri()));
    let result = client.send(vec![chat_relay::Turn::user("hi")], |_| {}).await;

    assert!(matches!(
        result,
        Err(chat_relay::RelayError::Upstream { status: 500, .. })
    ));
}
