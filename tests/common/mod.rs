//! Common utilities for integration tests
//!
//! Builds an in-process router over a temporary SQLite database with a
//! scripted text generator in place of the real LLM client.

#![allow(dead_code)]

use assert_cmd::Command;
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use smart_todo::api::{create_router, AppState};
use smart_todo::db::{create_pool, run_migrations};
use smart_todo::suggestions::{SuggestionFetcher, TextGenerator};
use sqlx::SqlitePool;
use std::path::Path;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use tempfile::TempDir;
use tower::ServiceExt;

/// Generator that replays a fixed reply and records every call
pub struct ScriptedGenerator {
    reply: Result<String, String>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
    last_credential: Mutex<Option<String>>,
}

impl ScriptedGenerator {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
            last_credential: Mutex::new(None),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
            last_credential: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }

    pub fn last_credential(&self) -> Option<String> {
        self.last_credential.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, credential: &str, prompt: &str) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        *self.last_credential.lock().unwrap() = Some(credential.to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(anyhow::anyhow!(message.clone())),
        }
    }
}

/// Router plus the handles a test needs to inspect side effects
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub generator: Arc<ScriptedGenerator>,
    _temp_dir: TempDir,
}

impl TestApp {
    /// App with a configured credential and the given generator
    pub async fn new(generator: Arc<ScriptedGenerator>) -> Self {
        Self::with_credential(Some("test-key"), generator).await
    }

    pub async fn with_credential(
        credential: Option<&str>,
        generator: Arc<ScriptedGenerator>,
    ) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let pool = create_pool(&temp_dir.path().join("smart-todo.db"))
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();

        let fetcher = SuggestionFetcher::new(
            credential.map(str::to_string),
            generator.clone() as Arc<dyn TextGenerator>,
        );
        let router = create_router(AppState::new(pool.clone(), fetcher));

        Self {
            router,
            pool,
            generator,
            _temp_dir: temp_dir,
        }
    }

    /// Send one request and return status plus parsed JSON body (Null when empty)
    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, Some(body)).await
    }

    /// POST returning the new record's id
    pub async fn create(&self, uri: &str, body: Value) -> i64 {
        let (status, value) = self.post(uri, body).await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", value);
        value["id"].as_i64().unwrap()
    }
}

/// `todo` binary with the `TODO_*` and key variables cleared and the
/// database pointed into `dir`
pub fn todo_command(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_todo"));
    for key in [
        "TODO_HOST",
        "TODO_PORT",
        "TODO_LLM_PROVIDER",
        "TODO_LLM_MODEL",
        "TODO_LLM_ENDPOINT",
        "TODO_LLM_API_KEY",
        "TODO_LOG_LEVEL",
        "TODO_LOG_RETENTION_DAYS",
        "GEMINI_API_KEY",
        "OPENAI_API_KEY",
        "RUST_LOG",
    ] {
        cmd.env_remove(key);
    }
    cmd.env("HOME", dir)
        .env("TODO_DATABASE", dir.join("smart-todo.db"));
    cmd
}
