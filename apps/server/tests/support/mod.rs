#![allow(dead_code)]

pub mod engine;
pub mod fixtures;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as JsonValue;
use signpost::{api::create_router, state::AppState, store::MemoryStore, Config};
use tower::ServiceExt as _;

pub use engine::{IndexedDoc, StubSearchEngine};
pub use fixtures::*;

/// An in-process application: the real router and services over a seeded
/// in-memory store and a stub engine that interprets compiled queries.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub engine: Arc<StubSearchEngine>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        init_tracing();

        let store = Arc::new(MemoryStore::new());
        let engine = Arc::new(StubSearchEngine::new());

        let state = AppState::new(config, store.clone(), engine.clone())
            .expect("build AppState for tests");

        Self {
            router: create_router(state),
            store,
            engine,
        }
    }

    /// Store an organisation and index it the way the indexer would:
    /// content text from the name plus its keyword names.
    pub async fn seed_organisation(&self, organisation: signpost::models::Organisation) {
        let mut text = organisation.name.clone();
        for keyword in &organisation.keywords {
            text.push(' ');
            text.push_str(&keyword.name);
        }

        self.engine.index(IndexedDoc {
            id: organisation.id,
            doc_type: "organisation".to_string(),
            text,
            category_ids: organisation.categories.iter().map(|c| c.id).collect(),
            country: organisation.country.iso_code.clone(),
            location: organisation.location,
        });

        self.store.insert_organisation(organisation).await;
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, JsonValue) {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("build request");
        self.send(request).await
    }

    pub async fn post_json(&self, uri: &str, body: JsonValue) -> (StatusCode, JsonValue) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("build request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, JsonValue) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router call is infallible");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read response body");

        let body = if bytes.is_empty() {
            JsonValue::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON response body")
        };

        (status, body)
    }
}

fn init_tracing() {
    use std::sync::OnceLock;
    use tracing_subscriber::prelude::*;

    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "signpost=info".into()),
            )
            .with(tracing_subscriber::fmt::layer())
            .try_init();
    });
}
