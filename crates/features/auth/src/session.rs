use crate::error::{AuthError, AuthErrorExt};
use crate::listener::{ListenerId, SessionListener};
use crate::payload::{self, AuthPayload, LoginRequest, RefreshRequest, RegisterRequest};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tessera_domain::constants::{endpoints, headers, keys};
use tessera_domain::session::{
    Credentials, Identity, SessionChange, SessionEvent, SessionSnapshot,
};
use tessera_http::{HttpRequest, HttpResponse, Transport};
use tessera_kernel::CredentialStore;
use tokio::sync::watch;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
struct SessionData {
    identity: Option<Identity>,
    credentials: Option<Credentials>,
    tenant_id: Option<String>,
}

impl SessionData {
    const fn is_authenticated(&self) -> bool {
        self.identity.is_some() && self.credentials.is_some()
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            identity: self.identity.clone(),
            tenant_id: self.tenant_id.clone(),
            authenticated: self.is_authenticated(),
        }
    }
}

struct SessionInner {
    transport: Arc<dyn Transport>,
    store: Arc<dyn CredentialStore>,
    tenant_header: String,
    state: RwLock<SessionData>,
    listeners: RwLock<Vec<(ListenerId, Arc<dyn SessionListener>)>>,
    next_listener: AtomicU64,
    snapshots: watch::Sender<SessionSnapshot>,
}

/// Owner of the authenticated session.
///
/// Cheap to clone; clones share state. Reads never wait on I/O. State-changing operations are
/// not arbitrated against each other, so callers run them one at a time.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionInner>,
}

impl SessionManager {
    #[must_use]
    pub fn builder() -> SessionManagerBuilder {
        SessionManagerBuilder::default()
    }

    // --- Reads ---

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.read().is_authenticated()
    }

    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.inner.state.read().credentials.as_ref().map(|c| c.access_token.clone())
    }

    #[must_use]
    pub fn tenant_id(&self) -> Option<String> {
        self.inner.state.read().tenant_id.clone()
    }

    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.inner.state.read().identity.clone()
    }

    #[must_use]
    pub fn credentials(&self) -> Option<Credentials> {
        self.inner.state.read().credentials.clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.state.read().snapshot()
    }

    #[must_use]
    pub fn tenant_header(&self) -> &str {
        &self.inner.tenant_header
    }

    /// Stamps the bearer token and tenant header of the current session, when present.
    pub fn authorize(&self, request: &mut HttpRequest) {
        let state = self.inner.state.read();
        if let Some(credentials) = &state.credentials {
            request.set_header(
                headers::AUTHORIZATION,
                format!("Bearer {}", credentials.access_token),
            );
        }
        if let Some(tenant) = &state.tenant_id {
            request.set_header(&self.inner.tenant_header, tenant.clone());
        }
    }

    // --- Observers ---

    pub fn add_listener(&self, listener: Arc<dyn SessionListener>) -> ListenerId {
        let id = ListenerId(self.inner.next_listener.fetch_add(1, Ordering::Relaxed));
        self.inner.listeners.write().push((id, listener));
        id
    }

    /// Returns `false` when `id` was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.inner.listeners.write();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Latest snapshot, updated after every committed change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.snapshots.subscribe()
    }

    // --- Transitions ---

    /// Rebuilds the session from the credential store.
    ///
    /// All four entries must be present and decodable; anything less is treated as corrupted
    /// and every entry is removed. Never fails; returns whether a session was restored.
    pub async fn restore(&self) -> bool {
        let restored = match self.read_persisted().await {
            Ok(Some(data)) => Some(data),
            Ok(None) => None,
            Err(err) => {
                warn!(error = %err, "Discarding unreadable persisted session");
                None
            }
        };

        let authenticated = restored.is_some();
        if !authenticated {
            self.clear_persisted().await;
        }
        self.commit(restored.unwrap_or_default(), SessionChange::Restored);

        info!(authenticated, "Session restored");
        authenticated
    }

    /// Authenticates against `POST /auth/login`.
    ///
    /// # Errors
    ///
    /// [`AuthError::Api`] when the server rejects the credentials, [`AuthError::Transport`]
    /// when it cannot be reached, [`AuthError::Decode`] for an unexpected payload and
    /// [`AuthError::Store`] when the session cannot be persisted. State is unchanged on error.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        tenant_id: &str,
    ) -> Result<(), AuthError> {
        let body = LoginRequest { email, password, tenant_id };
        let request = HttpRequest::post(endpoints::LOGIN).json(&body).context("Login request")?;

        let payload: AuthPayload = payload::decode(&self.exchange(request).await?)?;
        self.establish(payload, tenant_id, SessionChange::LoggedIn).await
    }

    /// Creates an account through `POST /auth/register` and signs into it.
    ///
    /// # Errors
    ///
    /// Same as [`login`](Self::login).
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
        tenant_id: &str,
    ) -> Result<(), AuthError> {
        let body = RegisterRequest { email, password, name, tenant_id };
        let request =
            HttpRequest::post(endpoints::REGISTER).json(&body).context("Register request")?;

        let payload: AuthPayload = payload::decode(&self.exchange(request).await?)?;
        self.establish(payload, tenant_id, SessionChange::Registered).await
    }

    /// Exchanges the refresh token for new credentials.
    ///
    /// # Errors
    ///
    /// Every failure, including a missing refresh token, is reported as
    /// [`AuthError::Refresh`] and leaves the session untouched.
    pub async fn refresh(&self) -> Result<(), AuthError> {
        self.try_refresh().await.map_err(|err| {
            debug!(error = %err, "Refresh failed");
            match err {
                refresh @ AuthError::Refresh { .. } => refresh,
                other => AuthError::Refresh { message: other.to_string().into(), context: None },
            }
        })
    }

    /// Fetches the profile from `GET /auth/me` and replaces the stored identity.
    ///
    /// # Errors
    ///
    /// [`AuthError::NotAuthenticated`] without a session, otherwise as [`login`](Self::login).
    pub async fn load_current_user(&self) -> Result<Identity, AuthError> {
        if !self.is_authenticated() {
            return Err(AuthError::NotAuthenticated {
                message: "No session to load the profile for".into(),
                context: None,
            });
        }

        let mut request = HttpRequest::get(endpoints::ME);
        self.authorize(&mut request);
        let identity: Identity = payload::decode(&self.exchange(request).await?)?;

        let mut next = self.inner.state.read().clone();
        next.identity = Some(identity.clone());
        self.persist(&next).await?;
        self.commit(next, SessionChange::ProfileLoaded);

        Ok(identity)
    }

    /// Ends the session locally, whatever the server says.
    ///
    /// The remote `POST /auth/logout` is only attempted with an access token and its outcome
    /// is ignored, as are store failures while clearing.
    pub async fn logout(&self) {
        if self.access_token().is_some() {
            let mut request = HttpRequest::post(endpoints::LOGOUT);
            self.authorize(&mut request);
            match self.inner.transport.send(request).await {
                Ok(response) if !response.is_success() => {
                    debug!(status = response.status, "Remote logout rejected, ignoring");
                }
                Err(err) => debug!(error = %err, "Remote logout failed, ignoring"),
                Ok(_) => {}
            }
        }

        self.end_locally().await;
    }

    /// Clears memory and the persisted entries without contacting the server, then notifies
    /// observers. Used when the server already refused the session.
    pub async fn end_locally(&self) {
        self.clear_persisted().await;
        self.commit(SessionData::default(), SessionChange::LoggedOut);
        info!("Logged out");
    }

    // --- Internals ---

    async fn exchange(&self, request: HttpRequest) -> Result<HttpResponse, AuthError> {
        let path = request.path().to_owned();
        self.inner.transport.send(request).await.context(path)
    }

    async fn try_refresh(&self) -> Result<(), AuthError> {
        let Some(current) = self.credentials() else {
            return Err(AuthError::Refresh {
                message: "No refresh token available".into(),
                context: None,
            });
        };

        let body = RefreshRequest { refresh_token: &current.refresh_token };
        let mut request =
            HttpRequest::post(endpoints::REFRESH).json(&body).context("Refresh request")?;
        if let Some(tenant) = self.tenant_id() {
            request.set_header(&self.inner.tenant_header, tenant);
        }

        let credentials: Credentials = payload::decode(&self.exchange(request).await?)?;

        let mut next = self.inner.state.read().clone();
        next.credentials = Some(credentials);
        self.persist(&next).await?;
        self.commit(next, SessionChange::Refreshed);
        Ok(())
    }

    async fn establish(
        &self,
        payload: AuthPayload,
        tenant_id: &str,
        change: SessionChange,
    ) -> Result<(), AuthError> {
        let next = SessionData {
            identity: Some(payload.user),
            credentials: Some(payload.tokens),
            tenant_id: Some(tenant_id.to_owned()),
        };
        self.persist(&next).await?;
        self.commit(next, change);
        info!(?change, tenant = %tenant_id, "Session established");
        Ok(())
    }

    /// Writes the four session entries. Incomplete sessions are not written.
    ///
    /// A failed write removes every entry, so a mix of old and new values is never restored.
    async fn persist(&self, data: &SessionData) -> Result<(), AuthError> {
        let (Some(identity), Some(credentials), Some(tenant)) =
            (&data.identity, &data.credentials, &data.tenant_id)
        else {
            return Ok(());
        };

        let user = serde_json::to_string(identity).context("Encoding identity")?;
        let entries = [
            (keys::ACCESS_TOKEN, credentials.access_token.as_str()),
            (keys::REFRESH_TOKEN, credentials.refresh_token.as_str()),
            (keys::TENANT_ID, tenant.as_str()),
            (keys::USER, user.as_str()),
        ];
        for (key, value) in entries {
            if let Err(err) = self.inner.store.write(key, value).await {
                warn!(key, error = %err, "Persisting session failed, discarding stored entries");
                self.clear_persisted().await;
                return Err(AuthError::Store { source: err, context: Some(key.into()) });
            }
        }
        Ok(())
    }

    async fn read_persisted(&self) -> Result<Option<SessionData>, AuthError> {
        let mut values = Vec::with_capacity(keys::SESSION.len());
        for key in keys::SESSION {
            match self.inner.store.read(key).await.context(key)? {
                Some(value) => values.push(value),
                None => return Ok(None),
            }
        }

        let [access_token, refresh_token, tenant_id, user]: [String; 4] =
            values.try_into().map_err(|_| AuthError::from("Persisted session is incomplete"))?;
        let identity: Identity =
            serde_json::from_str(&user).context("Decoding persisted identity")?;

        Ok(Some(SessionData {
            identity: Some(identity),
            credentials: Some(Credentials::new(access_token, refresh_token, 0)),
            tenant_id: Some(tenant_id),
        }))
    }

    async fn clear_persisted(&self) {
        for key in keys::SESSION {
            if let Err(err) = self.inner.store.delete(key).await {
                warn!(key, error = %err, "Failed to remove persisted session entry");
            }
        }
    }

    /// Installs `next` and notifies observers, outside of any lock.
    fn commit(&self, next: SessionData, change: SessionChange) {
        let snapshot = next.snapshot();
        *self.inner.state.write() = next;

        self.inner.snapshots.send_replace(snapshot.clone());

        let listeners: Vec<Arc<dyn SessionListener>> =
            self.inner.listeners.read().iter().map(|(_, l)| Arc::clone(l)).collect();
        let event = SessionEvent { change, snapshot };
        for listener in listeners {
            listener.on_session_change(&event);
        }
    }
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("snapshot", &self.snapshot())
            .field("tenant_header", &self.inner.tenant_header)
            .field("listeners", &self.inner.listeners.read().len())
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for SessionInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionInner")
            .field("tenant_header", &self.tenant_header)
            .field("transport", &self.transport)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct SessionManagerBuilder {
    transport: Option<Arc<dyn Transport>>,
    store: Option<Arc<dyn CredentialStore>>,
    tenant_header: Option<String>,
}

impl SessionManagerBuilder {
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    #[must_use]
    pub fn store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Header carrying the tenant id. Defaults to `x-tenant-id`.
    #[must_use]
    pub fn tenant_header(mut self, name: impl Into<String>) -> Self {
        self.tenant_header = Some(name.into());
        self
    }

    /// # Errors
    ///
    /// [`AuthError::Internal`] when the transport or the store is missing.
    pub fn build(self) -> Result<SessionManager, AuthError> {
        let transport = self.transport.ok_or("SessionManager requires a transport")?;
        let store = self.store.ok_or("SessionManager requires a credential store")?;
        let tenant_header = self
            .tenant_header
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| headers::TENANT.to_owned());

        let (snapshots, _) = watch::channel(SessionSnapshot::default());

        Ok(SessionManager {
            inner: Arc::new(SessionInner {
                transport,
                store,
                tenant_header,
                state: RwLock::new(SessionData::default()),
                listeners: RwLock::new(Vec::new()),
                next_listener: AtomicU64::new(1),
                snapshots,
            }),
        })
    }
}
