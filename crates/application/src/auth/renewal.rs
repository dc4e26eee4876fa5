//! Single-flight credential renewal.
//!
//! Any number of callers may ask for a renewal at once. The first one moves
//! the coordinator from idle to renewing and starts the only network call;
//! the rest await a clone of the same shared future. The slot is emptied as
//! soon as that call settles, so the next request after it starts fresh.
//!
//! A renewal that the server rejects evicts the session: both credentials
//! are removed, the identity is cleared and the user is sent to the login
//! page (locale preserved). A missing renewal token is different: nothing is
//! sent and nothing is evicted.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use folio_domain::{
    ApiRequest, ApiResponse, CredentialKind, CredentialPair, Headers, HttpMethod, Locale,
    token_preview,
};
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{CredentialStore, SessionState};
use crate::ports::{HttpTransport, Navigator};

/// Marker the token endpoint puts in error bodies for rejected tokens.
const TOKEN_INVALID_CODE: &str = "token_not_valid";

type PendingRenewal = Shared<BoxFuture<'static, Option<String>>>;

/// How a renewal response was judged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenewalOutcome {
    /// A fresh access token, plus a rotated renewal token if one was issued.
    Renewed {
        /// New access token.
        access: String,
        /// New renewal token, when the server rotated it.
        renewal: Option<String>,
    },
    /// The renewal can never succeed; the session must be evicted.
    Unrecoverable {
        /// Why, for logs.
        reason: String,
    },
}

impl RenewalOutcome {
    /// Classifies a response from the renewal endpoint.
    #[must_use]
    pub fn classify(response: &ApiResponse) -> Self {
        #[derive(Deserialize)]
        struct Body {
            #[serde(default)]
            access: Option<String>,
            #[serde(default)]
            refresh: Option<String>,
            #[serde(default)]
            code: Option<String>,
        }

        let unrecoverable = |reason: String| Self::Unrecoverable { reason };

        if !response.status.is_success() {
            return unrecoverable(format!("renewal endpoint returned {}", response.status));
        }

        let body: Body = match serde_json::from_slice(&response.body) {
            Ok(body) => body,
            Err(e) => return unrecoverable(format!("malformed renewal response: {e}")),
        };

        if body.code.as_deref() == Some(TOKEN_INVALID_CODE) {
            return unrecoverable("renewal token rejected".to_string());
        }

        match body.access.filter(|a| !a.is_empty()) {
            Some(access) => Self::Renewed {
                access,
                renewal: body.refresh.filter(|r| !r.is_empty()),
            },
            None => unrecoverable("renewal response carried no access token".to_string()),
        }
    }
}

/// Guarantees at most one renewal call in flight.
///
/// Cloning is cheap; clones share the same pending slot.
#[derive(Clone)]
pub struct RenewalCoordinator {
    inner: Arc<Inner>,
}

struct Inner {
    transport: Arc<dyn HttpTransport>,
    credentials: Arc<CredentialStore>,
    session: Arc<SessionState>,
    navigator: Arc<dyn Navigator>,
    refresh_url: String,
    generation: AtomicU64,
    pending: Mutex<Option<(u64, PendingRenewal)>>,
}

impl RenewalCoordinator {
    /// Create a coordinator posting renewals to `refresh_url`.
    #[must_use]
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        credentials: Arc<CredentialStore>,
        session: Arc<SessionState>,
        navigator: Arc<dyn Navigator>,
        refresh_url: impl Into<String>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                credentials,
                session,
                navigator,
                refresh_url: refresh_url.into(),
                generation: AtomicU64::new(0),
                pending: Mutex::new(None),
            }),
        }
    }

    /// Returns a usable access token, renewing it if needed.
    ///
    /// Joins the in-flight renewal when there is one. `None` means no
    /// credential could be obtained.
    pub async fn renew(&self) -> Option<String> {
        let pending = {
            let mut slot = self.inner.pending.lock();
            if let Some((_, pending)) = slot.as_ref() {
                debug!("joining in-flight renewal");
                pending.clone()
            } else {
                let id = self.inner.generation.fetch_add(1, Ordering::Relaxed);
                let inner = Arc::clone(&self.inner);
                let pending = async move {
                    let token = inner.run().await;
                    inner.settle(id);
                    token
                }
                .boxed()
                .shared();
                *slot = Some((id, pending.clone()));
                pending
            }
        };
        pending.await
    }

    /// Returns true while a renewal call is outstanding.
    #[must_use]
    pub fn is_renewing(&self) -> bool {
        self.inner.pending.lock().is_some()
    }
}

impl Inner {
    async fn run(&self) -> Option<String> {
        let Some(renewal) = self.credentials.get(CredentialKind::Renewal) else {
            debug!("no renewal token stored; continuing without credential");
            return None;
        };

        // A caller that saw the old token may arrive just after another
        // renewal settled.
        if let Some(access) = self.credentials.fresh_access() {
            debug!("access token already renewed");
            return Some(access);
        }

        let request = self.renewal_request(&renewal);
        let outcome = match self.transport.send(request).await {
            Ok(response) => RenewalOutcome::classify(&response),
            Err(error) => RenewalOutcome::Unrecoverable {
                reason: format!("renewal request failed: {error}"),
            },
        };

        match outcome {
            RenewalOutcome::Renewed { access, renewal: rotated } => {
                let stored = match &rotated {
                    Some(rotated) => self
                        .credentials
                        .set(&CredentialPair::new(access.clone(), rotated.clone())),
                    None => self.credentials.set_access(&access),
                };
                if let Err(error) = stored {
                    warn!(%error, "failed to persist renewed credentials");
                }
                info!(
                    access = %token_preview(&access),
                    rotated = rotated.is_some(),
                    "access token renewed"
                );
                Some(access)
            }
            RenewalOutcome::Unrecoverable { reason } => {
                self.evict(&reason);
                None
            }
        }
    }

    fn renewal_request(&self, renewal: &str) -> ApiRequest {
        let body = serde_json::json!({ "refresh": renewal }).to_string().into_bytes();
        let mut request =
            ApiRequest::new(HttpMethod::Post, self.refresh_url.clone()).with_body(body);
        request.headers = Headers::new()
            .with("Content-Type", "application/json")
            .with("Accept", "application/json");
        request.include_credentials = false;
        request
    }

    fn evict(&self, reason: &str) {
        if let Err(error) = self.credentials.clear() {
            warn!(%error, "failed to clear credentials during eviction");
        }
        self.session.clear();
        let target = Locale::login_path_for(&self.navigator.current_path());
        warn!(%reason, %target, "renewal impossible; session evicted");
        self.navigator.navigate(&target);
    }

    fn settle(&self, id: u64) {
        let mut slot = self.pending.lock();
        if slot.as_ref().is_some_and(|(current, _)| *current == id) {
            *slot = None;
        }
    }
}

impl std::fmt::Debug for RenewalCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenewalCoordinator")
            .field("refresh_url", &self.inner.refresh_url)
            .field("renewing", &self.is_renewing())
            .finish()
    }
}
