//! End-to-end flows over the file-backed jar and session.
//!
//! The network is replaced by a scripted transport; everything else is the
//! real wiring the binary uses.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::tempdir;

use folio_application::ports::{HttpTransport, Navigator, TransportError};
use folio_application::{ApiClient, AuthService, ClientSettings, CredentialStore, SessionState};
use folio_domain::{ApiRequest, ApiResponse, CredentialKind};
use folio_infrastructure::{
    FileCredentialStorage, FileSessionStorage, SystemClock, TracingNavigator,
};

type Handler = Box<dyn Fn(&ApiRequest) -> ApiResponse + Send + Sync>;

struct ScriptedTransport {
    handler: Handler,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    fn new(handler: impl Fn(&ApiRequest) -> ApiResponse + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn urls(&self) -> Vec<String> {
        self.requests.lock().iter().map(|r| r.url.clone()).collect()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.lock().push(request.clone());
        tokio::task::yield_now().await;
        Ok((self.handler)(&request))
    }
}

fn jwt(exp_offset_secs: i64, user_id: u64) -> String {
    let claims = json!({
        "exp": unix_now() + exp_offset_secs,
        "user_id": user_id,
        "username": "ada",
        "email": "ada@example.com",
    });
    format!(
        "eyJhbGciOiJIUzI1NiJ9.{}.sig",
        URL_SAFE_NO_PAD.encode(claims.to_string())
    )
}

fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs()
        .try_into()
        .unwrap()
}

struct App {
    client: Arc<ApiClient>,
    auth: AuthService,
    session: Arc<SessionState>,
    navigator: Arc<TracingNavigator>,
}

/// Builds the client the same way the binary does, over `data_dir`.
fn open(data_dir: &Path, transport: Arc<ScriptedTransport>, path: &str) -> App {
    let clock = Arc::new(SystemClock::new());
    let credentials = Arc::new(CredentialStore::new(
        Arc::new(FileCredentialStorage::new(data_dir, clock.clone())),
        clock,
    ));
    let session = Arc::new(SessionState::restore(Arc::new(FileSessionStorage::new(
        data_dir,
    ))));
    let navigator = Arc::new(TracingNavigator::new(path));
    let client = Arc::new(ApiClient::new(
        ClientSettings::new("http://api.test/v1"),
        transport,
        credentials,
        session.clone(),
        navigator.clone(),
    ));
    let auth = AuthService::new(client.clone(), session.clone());
    App {
        client,
        auth,
        session,
        navigator,
    }
}

fn json_response(status: u16, body: &Value) -> ApiResponse {
    ApiResponse::json(status, body)
}

#[tokio::test]
async fn test_login_survives_restart_and_renews_from_disk() {
    let dir = tempdir().expect("Failed to create temp directory");
    let stale = jwt(-60, 7);
    let fresh = jwt(3600, 7);

    let login_transport = ScriptedTransport::new({
        let stale = stale.clone();
        move |_| json_response(200, &json!({ "access": stale, "refresh": "r1" }))
    });
    let app = open(dir.path(), login_transport, "/en/posts");
    let identity = app.auth.login("ada@example.com", "secret").await.unwrap();
    assert_eq!(identity.unwrap().user_id, "7");
    drop(app);

    let transport = ScriptedTransport::new({
        let fresh = fresh.clone();
        move |request| {
            if request.url.ends_with("/user/token/refresh/") {
                json_response(200, &json!({ "access": fresh }))
            } else {
                assert_eq!(request.bearer_token(), Some(fresh.as_str()));
                json_response(200, &json!([{ "id": 1 }, { "id": 2 }]))
            }
        }
    });
    let app = open(dir.path(), transport.clone(), "/en/posts");
    assert_eq!(app.session.identity().unwrap().username.as_deref(), Some("ada"));

    let posts: Vec<Value> = app.client.get("/posts/").await.unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(
        transport.urls(),
        vec![
            "http://api.test/v1/user/token/refresh/".to_string(),
            "http://api.test/v1/posts/".to_string(),
        ]
    );

    let reopened = open(dir.path(), ScriptedTransport::new(|_| unreachable!()), "/");
    assert_eq!(
        reopened.client.credentials().get(CredentialKind::Access),
        Some(fresh)
    );
    assert_eq!(
        reopened.client.credentials().get(CredentialKind::Renewal).as_deref(),
        Some("r1")
    );
}

#[tokio::test]
async fn test_rejected_renewal_wipes_disk_and_redirects() {
    let dir = tempdir().expect("Failed to create temp directory");
    let login = ScriptedTransport::new(|_| {
        json_response(200, &json!({ "access": jwt(-60, 7), "refresh": "r1" }))
    });
    open(dir.path(), login, "/")
        .auth
        .login("ada@example.com", "secret")
        .await
        .unwrap();

    let transport = ScriptedTransport::new(|request| {
        if request.url.ends_with("/user/token/refresh/") {
            json_response(401, &json!({ "detail": "Token is invalid", "code": "token_not_valid" }))
        } else {
            assert_eq!(request.bearer_token(), None);
            json_response(
                401,
                &json!({ "detail": "Authentication credentials were not provided." }),
            )
        }
    });
    let app = open(dir.path(), transport, "/ja/gallery");

    let (a, b) = tokio::join!(
        app.client.get::<Value>("/gallery/"),
        app.client.get::<Value>("/posts/")
    );
    assert_eq!(a.unwrap_err().status(), Some(401));
    assert_eq!(b.unwrap_err().status(), Some(401));
    assert_eq!(app.navigator.history(), vec!["/ja/login".to_string()]);
    assert_eq!(app.navigator.current_path(), "/ja/login");

    let reopened = open(dir.path(), ScriptedTransport::new(|_| unreachable!()), "/");
    assert!(!reopened.session.is_authenticated());
    assert_eq!(reopened.client.credentials().get(CredentialKind::Access), None);
    assert_eq!(reopened.client.credentials().get(CredentialKind::Renewal), None);
}

#[tokio::test]
async fn test_logout_clears_disk_without_network() {
    let dir = tempdir().expect("Failed to create temp directory");
    let login = ScriptedTransport::new(|_| {
        json_response(200, &json!({ "access": jwt(3600, 9), "refresh": "r1" }))
    });
    let app = open(dir.path(), login.clone(), "/zh/");
    app.auth.login("ada@example.com", "secret").await.unwrap();

    app.auth.logout().unwrap();
    assert_eq!(login.urls().len(), 1);
    assert!(app.navigator.history().is_empty());

    let reopened = open(dir.path(), ScriptedTransport::new(|_| unreachable!()), "/");
    assert!(!reopened.session.is_authenticated());
    assert_eq!(reopened.client.credentials().get(CredentialKind::Access), None);
}

#[tokio::test]
async fn test_login_recovers_from_corrupt_jar() {
    let dir = tempdir().expect("Failed to create temp directory");
    std::fs::write(dir.path().join("credentials.json"), b"\0garbage").unwrap();

    let login = ScriptedTransport::new(|_| {
        json_response(200, &json!({ "access": jwt(3600, 3), "refresh": "r1" }))
    });
    let app = open(dir.path(), login, "/");
    app.auth.login("ada@example.com", "secret").await.unwrap();
    assert_eq!(
        app.client.credentials().get(CredentialKind::Renewal).as_deref(),
        Some("r1")
    );

    app.auth.logout().unwrap();
    assert_eq!(app.client.credentials().get(CredentialKind::Renewal), None);
}
