//! In-memory doubles for the ports, shared by the unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use folio_domain::{ApiRequest, ApiResponse, CredentialKind, CredentialPair, Identity};
use parking_lot::Mutex;
use serde_json::json;

use crate::auth::{CredentialStore, SessionState};
use crate::client::{ApiClient, ClientSettings};
use crate::endpoints;
use crate::ports::{
    Clock, CredentialStorage, EntryOptions, HttpTransport, Navigator, SessionStorage,
    StorageError, TransportError,
};

/// Instant every test clock is pinned to.
pub const BASE_TS: i64 = 1_900_000_000;

pub const BASE_URL: &str = "http://api.test/v1";

pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn now() -> Self {
        Self(DateTime::from_timestamp(BASE_TS, 0).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn jwt_with_claims(claims: &serde_json::Value) -> String {
    format!(
        "{}.{}.c2ln",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(claims.to_string())
    )
}

/// A token expiring `secs` after the pinned clock; negative means already expired.
pub fn jwt_expiring_in(secs: i64) -> String {
    jwt_with_claims(&json!({ "exp": BASE_TS + secs, "user_id": 1, "nonce": secs }))
}

#[derive(Default)]
pub struct MemoryCredentials {
    entries: Mutex<HashMap<String, (String, EntryOptions)>>,
    fail_reads: AtomicBool,
}

impl MemoryCredentials {
    pub fn options(&self, name: &str) -> Option<EntryOptions> {
        self.entries.lock().get(name).map(|(_, options)| *options)
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }
}

impl CredentialStorage for MemoryCredentials {
    fn get(&self, name: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Serialization("corrupt jar".into()));
        }
        Ok(self.entries.lock().get(name).map(|(value, _)| value.clone()))
    }

    fn set(&self, name: &str, value: &str, options: EntryOptions) -> Result<(), StorageError> {
        self.entries
            .lock()
            .insert(name.to_string(), (value.to_string(), options));
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), StorageError> {
        self.entries.lock().remove(name);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemorySession {
    identity: Mutex<Option<Identity>>,
    saves: AtomicUsize,
    fail_loads: AtomicBool,
}

impl MemorySession {
    pub fn with(identity: Option<Identity>) -> Self {
        Self {
            identity: Mutex::new(identity),
            ..Self::default()
        }
    }

    pub fn persisted(&self) -> Option<Identity> {
        self.identity.lock().clone()
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }
}

impl SessionStorage for MemorySession {
    fn load(&self) -> Result<Option<Identity>, StorageError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(StorageError::Serialization("corrupt session".into()));
        }
        Ok(self.identity.lock().clone())
    }

    fn save(&self, identity: Option<&Identity>) -> Result<(), StorageError> {
        *self.identity.lock() = identity.cloned();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct RecordingNavigator {
    current: String,
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn at(path: &str) -> Self {
        Self {
            current: path.to_string(),
            visits: Mutex::new(Vec::new()),
        }
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.current.clone()
    }

    fn navigate(&self, path: &str) {
        self.visits.lock().push(path.to_string());
    }
}

type Handler = Box<dyn Fn(&ApiRequest) -> Result<ApiResponse, TransportError> + Send + Sync>;

/// Records every request, suspends once, then answers from `handler`.
pub struct FakeTransport {
    handler: Handler,
    requests: Mutex<Vec<ApiRequest>>,
    delay_ms: AtomicU64,
}

impl FakeTransport {
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    pub fn refresh_calls(&self) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.url.ends_with(endpoints::TOKEN_REFRESH))
            .count()
    }

    pub fn set_delay_ms(&self, delay_ms: u64) {
        self.delay_ms.store(delay_ms, Ordering::SeqCst);
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.lock().push(request.clone());
        match self.delay_ms.load(Ordering::SeqCst) {
            0 => tokio::task::yield_now().await,
            ms => tokio::time::sleep(Duration::from_millis(ms)).await,
        }
        (self.handler)(&request)
    }
}

/// Answers the renewal endpoint with `fresh` (and `rotated`, if given).
pub fn refresh_ok(
    fresh: &str,
    rotated: Option<&str>,
) -> impl Fn(&ApiRequest) -> Result<ApiResponse, TransportError> + Send + Sync + 'static {
    let body = match rotated {
        Some(rotated) => json!({ "access": fresh, "refresh": rotated }),
        None => json!({ "access": fresh }),
    };
    move |_| Ok(ApiResponse::json(200, &body))
}

/// Renewal answers with `fresh`; every other path answers `{"id": 1}`.
pub fn profile_and_refresh(
    fresh: &str,
) -> impl Fn(&ApiRequest) -> Result<ApiResponse, TransportError> + Send + Sync + 'static {
    let fresh = fresh.to_string();
    move |request| {
        if request.url.ends_with(endpoints::TOKEN_REFRESH) {
            Ok(ApiResponse::json(200, &json!({ "access": fresh })))
        } else {
            Ok(ApiResponse::json(200, &json!({ "id": 1 })))
        }
    }
}

pub struct Harness {
    pub client: ApiClient,
    pub transport: Arc<FakeTransport>,
    pub credentials: Arc<CredentialStore>,
    pub session: Arc<SessionState>,
    pub navigator: Arc<RecordingNavigator>,
}

impl Harness {
    pub fn new<F>(current_path: &str, handler: F) -> Self
    where
        F: Fn(&ApiRequest) -> Result<ApiResponse, TransportError> + Send + Sync + 'static,
    {
        let transport = Arc::new(FakeTransport {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
            delay_ms: AtomicU64::new(0),
        });
        let credentials = Arc::new(CredentialStore::new(
            Arc::new(MemoryCredentials::default()),
            Arc::new(FixedClock::now()),
        ));
        let session = Arc::new(SessionState::restore(Arc::new(MemorySession::default())));
        let navigator = Arc::new(RecordingNavigator::at(current_path));
        let client = ApiClient::new(
            ClientSettings::new(BASE_URL),
            transport.clone(),
            credentials.clone(),
            session.clone(),
            navigator.clone(),
        );
        Self {
            client,
            transport,
            credentials,
            session,
            navigator,
        }
    }

    /// Stores an access token and, optionally, a renewal token.
    pub fn seed(&self, access: &str, renewal: Option<&str>) {
        match renewal {
            Some(renewal) => self
                .credentials
                .set(&CredentialPair::new(access, renewal))
                .unwrap(),
            None => self.credentials.set_access(access).unwrap(),
        }
    }

    pub fn access(&self) -> Option<String> {
        self.credentials.get(CredentialKind::Access)
    }

    pub fn renewal(&self) -> Option<String> {
        self.credentials.get(CredentialKind::Renewal)
    }
}
