//! Gateway HTTP Routes
//!
//! `POST /exec` and `POST /query`. Each request decodes a statement payload,
//! makes one engine call through the adapter, and answers with the envelope.
//! Anything else falls through to an empty 404.
//!
//! Both paths run the engine call under a request-scoped `StatementContext`:
//! if the request future is dropped (client gone, request timeout) before the
//! call returns, the statement is cancelled.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    routing::post,
    Router,
};

use super::envelope::{ExecutionResponse, StatementRequest};
use super::errors::{GatewayError, GatewayResult};
use crate::core::EngineAdapter;
use crate::engine::{count_rows, StatementContext};

/// Gateway state shared across handlers
pub struct GatewayState {
    pub adapter: EngineAdapter,
}

impl GatewayState {
    pub fn new(adapter: EngineAdapter) -> Self {
        Self { adapter }
    }
}

/// Create gateway routes
pub fn gateway_routes(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/exec", post(exec_handler))
        .route("/query", post(query_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

fn decode(body: Result<Bytes, BytesRejection>) -> GatewayResult<StatementRequest> {
    let body = body.map_err(|rejection| GatewayError::Decode(rejection.body_text()))?;
    Ok(StatementRequest::decode(&body)?)
}

async fn exec_handler(
    State(state): State<Arc<GatewayState>>,
    body: Result<Bytes, BytesRejection>,
) -> GatewayResult<ExecutionResponse> {
    let request = decode(body)?;

    let ctx = StatementContext::new();
    let guard = ctx.drop_guard();
    let result = state.adapter.exec(&ctx, &request.sql).await;
    let _ = guard.disarm();

    let mutation = result?;
    // Best-effort: an unavailable value reads as zero
    Ok(ExecutionResponse::mutation(
        mutation.rows_affected().unwrap_or(0),
        mutation.last_insert_id().unwrap_or(0),
    ))
}

async fn query_handler(
    State(state): State<Arc<GatewayState>>,
    body: Result<Bytes, BytesRejection>,
) -> GatewayResult<ExecutionResponse> {
    let request = decode(body)?;

    // Rows are drained in-process; nothing is streamed to the client
    let ctx = StatementContext::new();
    let guard = ctx.drop_guard();
    let result = state.adapter.query(&ctx, &request.sql, count_rows).await;
    let _ = guard.disarm();

    Ok(ExecutionResponse::rows(result?))
}

async fn not_found_handler() -> StatusCode {
    StatusCode::NOT_FOUND
}
