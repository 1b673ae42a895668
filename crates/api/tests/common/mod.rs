#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use programking_api::config::{ProviderMode, ServerConfig};
use programking_api::router::build_app_router;
use programking_api::state::AppState;
use programking_db::{KvStore, MemoryKvStore, StoreError};
use programking_events::{EnquiryMailer, RecordingMailer};
use programking_identity::InMemoryIdentity;
use programking_payments::InMemoryPayments;
use serde_json::Value;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["*".to_string()],
        request_timeout_secs: 30,
        api_prefix: "/api/v1".to_string(),
        provider_mode: ProviderMode::Memory,
        payment_webhook_secret: None,
    }
}

/// [`MemoryKvStore`] whose writes can be switched to fail.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryKvStore,
    fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_write(&self, key: &str) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Serialization {
                key: key.to_string(),
                source: serde_json::from_str::<Value>("{").unwrap_err(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl KvStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.check_write(key)?;
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.check_write(key)?;
        self.inner.delete(key).await
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Value)>, StoreError> {
        self.inner.scan_prefix(prefix).await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.inner.health_check().await
    }
}

/// The full router plus handles to the in-memory collaborators behind it.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<FlakyStore>,
    pub payments: Arc<InMemoryPayments>,
    pub mailer: Arc<RecordingMailer>,
}

pub fn build_test_app() -> TestApp {
    build_test_app_with(test_config())
}

/// Build the application over in-memory providers with the production
/// middleware stack.
pub fn build_test_app_with(config: ServerConfig) -> TestApp {
    let store = Arc::new(FlakyStore::default());
    let payments = Arc::new(InMemoryPayments::new());
    let mailer = Arc::new(RecordingMailer::new());

    let state = AppState::new(
        config.clone(),
        store.clone(),
        payments.clone(),
        Arc::new(InMemoryIdentity::new()),
        Some(mailer.clone() as Arc<dyn EnquiryMailer>),
    );

    TestApp {
        router: build_app_router(state, &config),
        store,
        payments,
        mailer,
    }
}

/// Send a request and return the status plus the parsed JSON body
/// (`Value::Null` for empty bodies).
pub async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_json(response.into_body()).await)
}

pub async fn body_json(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn get(app: &TestApp, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: &TestApp, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &TestApp, uri: &str, body: Value) -> (StatusCode, Value) {
    send_json(app, "POST", uri, body).await
}

pub async fn put_json(app: &TestApp, uri: &str, body: Value) -> (StatusCode, Value) {
    send_json(app, "PUT", uri, body).await
}

async fn send_json(app: &TestApp, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Record completions of `p1..=pN` for `user_id`.
pub async fn complete_programs(app: &TestApp, user_id: &str, count: u32) {
    for n in 1..=count {
        let (status, _) = post_json(
            app,
            "/api/v1/progress/complete",
            serde_json::json!({ "userId": user_id, "programId": format!("p{n}") }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}
