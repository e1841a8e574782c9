#![allow(dead_code, unreachable_pub)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tessera_auth::SessionManager;
use tessera_http::{HttpError, HttpRequest, HttpResponse, Method, Transport};
use tessera_kernel::{CredentialStore, MemoryCredentialStore, StoreError};

type Reply = Result<HttpResponse, HttpError>;

/// Scripted transport: replies are queued per `METHOD path` and every request is recorded.
/// Unscripted requests get a `404`.
#[derive(Debug, Default)]
pub struct MockTransport {
    scripts: Mutex<HashMap<String, VecDeque<Reply>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, method: Method, path: &str, status: u16, body: Value) {
        self.push(method, path, Ok(HttpResponse::with_json(status, &body)));
    }

    pub fn fail(&self, method: Method, path: &str) {
        let err = HttpError::Connection { message: "connection refused".into(), context: None };
        self.push(method, path, Err(err));
    }

    fn push(&self, method: Method, path: &str, reply: Reply) {
        self.scripts.lock().entry(format!("{method} {path}")).or_default().push_back(reply);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub fn calls(&self, path: &str) -> usize {
        self.requests.lock().iter().filter(|r| r.path() == path).count()
    }

    pub fn sent(&self, path: &str) -> Vec<HttpRequest> {
        self.requests.lock().iter().filter(|r| r.path() == path).cloned().collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let key = format!("{} {}", request.method(), request.path());
        self.requests.lock().push(request);
        let scripted = self.scripts.lock().get_mut(&key).and_then(VecDeque::pop_front);
        scripted.unwrap_or_else(|| {
            Ok(HttpResponse::with_json(404, &json!({ "message": format!("No script for {key}") })))
        })
    }
}

pub const TENANT: &str = "acme";

pub fn user_json() -> Value {
    json!({
        "id": "u-1",
        "email": "ada@acme.io",
        "display_name": "Ada",
        "tenant_id": TENANT,
        "created_at": "2026-01-01T00:00:00Z",
        "updated_at": "2026-01-02T00:00:00Z"
    })
}

pub fn auth_response(access: &str, refresh: &str) -> Value {
    json!({
        "tokens": { "access_token": access, "refresh_token": refresh, "expires_in": 900 },
        "user": user_json()
    })
}

pub fn tokens(access: &str, refresh: &str) -> Value {
    json!({ "access_token": access, "refresh_token": refresh, "expires_in": 900 })
}

pub fn session(transport: &Arc<MockTransport>, store: &Arc<MemoryCredentialStore>) -> SessionManager {
    SessionManager::builder()
        .transport(transport.clone())
        .store(store.clone())
        .build()
        .unwrap()
}

/// A store already holding a complete persisted session.
pub fn persisted_store(access: &str, refresh: &str) -> Arc<MemoryCredentialStore> {
    Arc::new(MemoryCredentialStore::with_entries([
        ("access_token", access.to_owned()),
        ("refresh_token", refresh.to_owned()),
        ("tenant_id", TENANT.to_owned()),
        ("user", user_json().to_string()),
    ]))
}

/// Memory store whose writes to one key always fail.
#[derive(Debug)]
pub struct FailingWrites {
    pub inner: MemoryCredentialStore,
    key: &'static str,
}

impl FailingWrites {
    pub fn new(inner: MemoryCredentialStore, key: &'static str) -> Arc<Self> {
        Arc::new(Self { inner, key })
    }
}

#[async_trait]
impl CredentialStore for FailingWrites {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.read(key).await
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if key == self.key {
            return Err("disk full".into());
        }
        self.inner.write(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.inner.delete(key).await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.inner.clear().await
    }
}
