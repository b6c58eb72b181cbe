use std::time::Duration;

use assert_matches::assert_matches;
use reqwest::Method;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_gateway::PortalClient;
use shared_models::PortalError;
use shared_utils::test_utils::{TestConfig, TestSession};

fn client_for(server: &MockServer) -> PortalClient {
    let config = TestConfig::for_server(&server.uri()).to_portal_config();
    PortalClient::new(&config, TestSession::patient().to_session()).expect("client should build")
}

#[tokio::test]
async fn attaches_bearer_token_to_every_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/ping"))
        .and(header("authorization", "Bearer test-bearer-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let body: Value = client.request(Method::GET, "/api/ping", None).await.unwrap();

    assert_eq!(body["ok"], json!(true));
}

#[tokio::test]
async fn expired_session_maps_to_auth_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/schedules"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .request::<Value>(Method::GET, "/api/schedules", None)
        .await
        .unwrap_err();

    assert_matches!(err, PortalError::AuthExpired);
}

#[tokio::test]
async fn forbidden_maps_to_its_own_class() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/schedules"))
        .respond_with(ResponseTemplate::new(403).set_body_string("admin only"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .request::<Value>(Method::GET, "/api/schedules", None)
        .await
        .unwrap_err();

    assert_matches!(err, PortalError::Forbidden);
}

#[tokio::test]
async fn server_errors_carry_status_and_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/schedules"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .request::<Value>(Method::GET, "/api/schedules", None)
        .await
        .unwrap_err();

    assert_matches!(err, PortalError::Backend { status: 500, ref message } if message == "boom");
}

#[tokio::test]
async fn missing_resource_maps_to_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/schedules/unknown"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such schedule"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .request::<Value>(Method::GET, "/api/schedules/unknown", None)
        .await
        .unwrap_err();

    assert_matches!(err, PortalError::NotFound(_));
}

#[tokio::test]
async fn slow_responses_map_to_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/schedules"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(&mock_server)
        .await;

    let config = shared_config::PortalConfig {
        api_base_url: mock_server.uri(),
        request_timeout_secs: 1,
    };
    let client = PortalClient::new(&config, TestSession::patient().to_session()).unwrap();
    let err = client
        .request::<Value>(Method::GET, "/api/schedules", None)
        .await
        .unwrap_err();

    assert_matches!(err, PortalError::Timeout);
}

#[tokio::test]
async fn unreachable_server_maps_to_offline() {
    // Nothing listens here; the connection is refused immediately.
    let config = shared_config::PortalConfig {
        api_base_url: "http://127.0.0.1:9".to_string(),
        request_timeout_secs: 2,
    };
    let client = PortalClient::new(&config, TestSession::patient().to_session()).unwrap();
    let err = client
        .request::<Value>(Method::GET, "/api/schedules", None)
        .await
        .unwrap_err();

    assert_matches!(err, PortalError::Offline);
}

#[tokio::test]
async fn unexpected_body_shape_is_a_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/schedules"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .request::<Value>(Method::GET, "/api/schedules", None)
        .await
        .unwrap_err();

    assert_matches!(err, PortalError::Decode(_));
}
