//! End-to-end device flow against a mock identity provider.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use meetings_auth::{
    AuthConfig, AuthErrorCode, Authenticator, CancellationToken, DeviceFlowInitiator,
    DeviceFlowSession, FnSink, ReqwestTransport, TokenPoller,
};
use serde_json::json;
use tokio::time::Instant;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DEVICE_CODE_PATH: &str = "/contoso/oauth2/v2.0/devicecode";
const TOKEN_PATH: &str = "/contoso/oauth2/v2.0/token";

fn config(server: &MockServer) -> AuthConfig {
    AuthConfig::microsoft("client-abc")
        .with_tenant("contoso")
        .with_endpoints(
            format!("{}/{{tenant}}/oauth2/v2.0/devicecode", server.uri()),
            format!("{}/{{tenant}}/oauth2/v2.0/token", server.uri()),
        )
        .with_scopes(vec![
            "Calendars.ReadWrite".to_string(),
            "offline_access".to_string(),
        ])
}

fn transport() -> Arc<ReqwestTransport> {
    Arc::new(ReqwestTransport::new(Duration::from_secs(5)).expect("http client"))
}

fn device_code_body(expires_in: u64, interval: u64) -> serde_json::Value {
    json!({
        "device_code": "device-code-xyz",
        "user_code": "QWER-TYUI",
        "verification_uri": "https://microsoft.com/devicelogin",
        "expires_in": expires_in,
        "interval": interval,
    })
}

fn token_body() -> serde_json::Value {
    json!({
        "token_type": "Bearer",
        "scope": "Calendars.ReadWrite offline_access",
        "expires_in": 3599,
        "access_token": "eyJ0eXAiOiJKV1QiLCJub25jZSI6Ij.real-looking.token",
        "refresh_token": "0.ARwA6WgJJ9X2qk",
    })
}

async fn mount_device_code(server: &MockServer, expires_in: u64, interval: u64) {
    Mock::given(method("POST"))
        .and(path(DEVICE_CODE_PATH))
        .and(body_string_contains("client_id=client-abc"))
        .and(body_string_contains("scope=Calendars.ReadWrite+offline_access"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(device_code_body(expires_in, interval)),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn initiator_expiry_tracks_expires_in() {
    let server = MockServer::start().await;
    mount_device_code(&server, 900, 5).await;

    let initiator = DeviceFlowInitiator::new(transport());
    let before = Instant::now();
    let session = initiator
        .start(&config(&server), &CancellationToken::new())
        .await
        .expect("device code");
    let after = Instant::now();

    assert_eq!(session.user_code(), "QWER-TYUI");
    assert_eq!(session.verification_uri(), "https://microsoft.com/devicelogin");
    assert_eq!(session.interval(), Duration::from_secs(5));
    assert!(session.expires_at() >= before + Duration::from_secs(900));
    assert!(session.expires_at() <= after + Duration::from_secs(900));
}

#[tokio::test]
async fn authenticate_waits_out_pending_then_returns_token() {
    let server = MockServer::start().await;
    mount_device_code(&server, 60, 1).await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "authorization_pending"})),
        )
        .up_to_n_times(1)
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains(
            "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Adevice_code",
        ))
        .and(body_string_contains("device_code=device-code-xyz"))
        .and(body_string_contains("client_id=client-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .expect(1)
        .mount(&server)
        .await;

    let instructions = Arc::new(Mutex::new(Vec::new()));
    let seen = instructions.clone();
    let authenticator = Authenticator::with_transport(config(&server), transport())
        .expect("valid config")
        .with_sink(Arc::new(FnSink(move |session: &DeviceFlowSession| {
            seen.lock().unwrap().push(session.instruction());
        })));

    let started = Instant::now();
    let token = authenticator
        .authenticate(&CancellationToken::new())
        .await
        .expect("token");

    assert_eq!(token, "eyJ0eXAiOiJKV1QiLCJub25jZSI6Ij.real-looking.token");
    assert!(Instant::now() - started >= Duration::from_secs(2));
    let instructions = instructions.lock().unwrap();
    assert_eq!(instructions.len(), 1);
    assert!(instructions[0].contains("QWER-TYUI"));
}

#[tokio::test]
async fn rejected_device_code_request_never_polls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(DEVICE_CODE_PATH))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_client"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .expect(0)
        .mount(&server)
        .await;

    let authenticator =
        Authenticator::with_transport(config(&server), transport()).expect("valid config");
    let err = authenticator
        .authenticate(&CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.code(), AuthErrorCode::DeviceFlowRequestFailed);
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn server_error_while_polling_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let session = DeviceFlowSession::new(
        "device-code-xyz",
        "QWER-TYUI",
        "https://microsoft.com/devicelogin",
        Instant::now() + Duration::from_secs(30),
        Duration::from_millis(50),
    );
    let poller = TokenPoller::new(transport());
    let err = poller
        .poll(&config(&server), &session, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.code(), AuthErrorCode::UnexpectedStatus);
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn always_pending_ends_in_flow_expired() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let interval = Duration::from_millis(100);
    let session = DeviceFlowSession::new(
        "device-code-xyz",
        "QWER-TYUI",
        "https://microsoft.com/devicelogin",
        Instant::now() + interval * 2,
        interval,
    );
    let poller = TokenPoller::new(transport());
    let err = poller
        .poll(&config(&server), &session, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.code(), AuthErrorCode::FlowExpired);
    // Generous bound: one interval past expiry plus scheduling slack.
    assert!(Instant::now() <= session.expires_at() + interval * 3);
}

#[tokio::test]
async fn deadline_cancels_between_polls() {
    let server = MockServer::start().await;
    mount_device_code(&server, 60, 1).await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&server)
        .await;

    let authenticator = Authenticator::with_transport(config(&server), transport())
        .expect("valid config")
        .with_sink(Arc::new(FnSink(|_: &DeviceFlowSession| {})));

    let err = authenticator
        .authenticate_with_deadline(Some(Duration::from_millis(1500)))
        .await
        .unwrap_err();

    assert_eq!(err.code(), AuthErrorCode::Cancelled);
}
