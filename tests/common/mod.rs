//! Shared test utilities
//!
//! - `ScriptedEngine`: in-memory engine answering from a script, no database
//! - Router builders over the scripted engine or a private SQLite database
//! - Request helpers returning status and parsed envelope

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;
use uuid::Uuid;

use sqlgate::core::EngineAdapter;
use sqlgate::engine::{
    Engine, EngineConfig, EngineError, EngineResult, MutationResult, RowConsumer, RowCursor,
    SqliteEngine, StatementContext,
};
use sqlgate::http_server::{ExecutionResponse, HttpServer, HttpServerConfig};
use sqlgate::observability::MetricsRegistry;

// =============================================================================
// Scripted engine
// =============================================================================

/// What the scripted engine does for a statement
#[derive(Debug, Clone)]
pub enum Script {
    /// Exec succeeds with these values
    Mutation { rows_affected: i64, last_insert_id: i64 },
    /// Exec succeeds but neither value can be read
    OpaqueMutation,
    /// Query yields this many rows
    Rows(usize),
    /// Either call fails with this message
    Fail(String),
    /// Block until the context is cancelled
    Hang,
}

/// Mutation whose accessors both fail
struct OpaqueMutation;

impl MutationResult for OpaqueMutation {
    fn rows_affected(&self) -> EngineResult<i64> {
        Err(EngineError::ResultUnavailable("rows affected not supported".to_string()))
    }

    fn last_insert_id(&self) -> EngineResult<i64> {
        Err(EngineError::ResultUnavailable("last insert id not supported".to_string()))
    }
}

struct Countdown(usize);

impl RowCursor for Countdown {
    fn advance(&mut self) -> EngineResult<bool> {
        if self.0 == 0 {
            return Ok(false);
        }
        self.0 -= 1;
        Ok(true)
    }
}

/// In-memory engine that answers from a script and records what it saw
#[derive(Default)]
pub struct ScriptedEngine {
    script: Mutex<HashMap<String, Script>>,
    seen: Mutex<Vec<String>>,
    cancelled: Mutex<Vec<String>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, sql: &str, script: Script) -> Self {
        self.script.lock().unwrap().insert(sql.to_string(), script);
        self
    }

    /// Statements received, in order
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    /// Statements that observed cancellation while hanging
    pub fn cancelled(&self) -> Vec<String> {
        self.cancelled.lock().unwrap().clone()
    }

    fn lookup(&self, sql: &str) -> Script {
        self.seen.lock().unwrap().push(sql.to_string());
        self.script
            .lock()
            .unwrap()
            .get(sql)
            .cloned()
            .unwrap_or_else(|| Script::Fail(format!("near \"{}\": syntax error", sql)))
    }

    fn hang(&self, ctx: &StatementContext, sql: &str) -> EngineError {
        while !ctx.is_cancelled() {
            thread::sleep(Duration::from_millis(2));
        }
        self.cancelled.lock().unwrap().push(sql.to_string());
        EngineError::Cancelled
    }
}

impl Engine for ScriptedEngine {
    fn exec(&self, ctx: &StatementContext, sql: &str) -> EngineResult<Box<dyn MutationResult>> {
        ctx.check()?;
        match self.lookup(sql) {
            Script::Mutation {
                rows_affected,
                last_insert_id,
            } => Ok(Box::new(sqlgate::engine::Mutation {
                rows_affected,
                last_insert_id,
            })),
            Script::OpaqueMutation => Ok(Box::new(OpaqueMutation)),
            Script::Rows(_) => Ok(Box::new(sqlgate::engine::Mutation::default())),
            Script::Fail(msg) => Err(EngineError::statement(msg)),
            Script::Hang => Err(self.hang(ctx, sql)),
        }
    }

    fn query(
        &self,
        ctx: &StatementContext,
        sql: &str,
        consume: &mut RowConsumer<'_>,
    ) -> EngineResult<()> {
        ctx.check()?;
        match self.lookup(sql) {
            Script::Rows(n) => consume(&mut Countdown(n)),
            Script::Mutation { .. } | Script::OpaqueMutation => consume(&mut Countdown(0)),
            Script::Fail(msg) => Err(EngineError::statement(msg)),
            Script::Hang => Err(self.hang(ctx, sql)),
        }
    }
}

// =============================================================================
// Router builders
// =============================================================================

/// Test config: loopback, no request timeout
pub fn test_config() -> HttpServerConfig {
    HttpServerConfig {
        host: "127.0.0.1".to_string(),
        request_timeout_ms: None,
        ..Default::default()
    }
}

/// Gateway router over a scripted engine, plus the pieces tests inspect
pub fn scripted_router(
    engine: ScriptedEngine,
    config: &HttpServerConfig,
) -> (Router, Arc<ScriptedEngine>, Arc<MetricsRegistry>) {
    let engine = Arc::new(engine);
    let metrics = Arc::new(MetricsRegistry::new());
    let adapter = EngineAdapter::new(engine.clone(), Arc::clone(&metrics));
    (HttpServer::build_router(config, adapter), engine, metrics)
}

/// Gateway router over a private in-memory SQLite database
pub fn sqlite_router() -> (Router, Arc<MetricsRegistry>) {
    let source = format!("file:gateway-{}?mode=memory&cache=shared", Uuid::new_v4());
    let engine = SqliteEngine::open(&EngineConfig::with_data_source(source))
        .expect("Failed to open in-memory engine");
    let metrics = Arc::new(MetricsRegistry::new());
    let adapter = EngineAdapter::new(Arc::new(engine), Arc::clone(&metrics));
    (HttpServer::build_router(&test_config(), adapter), metrics)
}

// =============================================================================
// Request helpers
// =============================================================================

/// Send a request and return status and raw body
pub async fn send(router: &Router, method: &str, path: &str, body: &str) -> (StatusCode, String) {
    let (status, _, body) = send_full(router, method, path, body).await;
    (status, body)
}

/// Send a request and return status, content type (if any) and raw body
pub async fn send_full(
    router: &Router,
    method: &str,
    path: &str,
    body: &str,
) -> (StatusCode, Option<String>, String) {
    let request = Request::builder()
        .method(method)
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}

/// POST a statement payload and parse the envelope
pub async fn post_sql(router: &Router, path: &str, sql: &str) -> (StatusCode, ExecutionResponse) {
    let body = serde_json::json!({ "sql": sql }).to_string();
    post_raw(router, path, &body).await
}

/// POST an arbitrary body and parse the envelope
pub async fn post_raw(router: &Router, path: &str, body: &str) -> (StatusCode, ExecutionResponse) {
    let (status, text) = send(router, "POST", path, body).await;
    let envelope = serde_json::from_str(&text)
        .unwrap_or_else(|e| panic!("response is not an envelope ({}): {:?}", e, text));
    (status, envelope)
}
