//! Engine Adapter
//!
//! Instrumented front for the engine. Every call:
//! - logs the statement verbatim before running it
//! - records its wall-clock duration into `db_queries{procedure}`, failures included
//! - increments `db_errors{procedure}` on failure
//!
//! Engine calls block, so they run on tokio's blocking pool. Recording happens
//! on that thread, which means a call still gets observed when the awaiting
//! request has gone away.

use std::sync::Arc;
use std::time::Instant;

use crate::engine::{Engine, EngineError, EngineResult, MutationResult, RowCursor, StatementContext};
use crate::observability::{MetricsRegistry, Observation};

use super::procedure::Procedure;

/// Instrumented access to the single engine instance
#[derive(Clone)]
pub struct EngineAdapter {
    engine: Arc<dyn Engine>,
    metrics: Arc<MetricsRegistry>,
}

impl EngineAdapter {
    /// Wrap an engine, recording into the given metrics sink
    pub fn new(engine: Arc<dyn Engine>, metrics: Arc<MetricsRegistry>) -> Self {
        Self { engine, metrics }
    }

    /// The metrics sink this adapter records into
    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    /// Run a mutating statement
    pub async fn exec(
        &self,
        ctx: &StatementContext,
        sql: &str,
    ) -> EngineResult<Box<dyn MutationResult>> {
        let engine = Arc::clone(&self.engine);
        let metrics = Arc::clone(&self.metrics);
        let ctx = ctx.clone();
        let sql = sql.to_owned();

        run_blocking(move || {
            instrumented(&metrics, Procedure::Exec, &sql, || engine.exec(&ctx, &sql))
        })
        .await
    }

    /// Run a reading statement, handing its cursor to `consume`.
    ///
    /// The cursor is drained inside the engine call, so the observed duration
    /// covers reading the rows.
    pub async fn query<T, F>(&self, ctx: &StatementContext, sql: &str, consume: F) -> EngineResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut dyn RowCursor) -> EngineResult<T> + Send + 'static,
    {
        let engine = Arc::clone(&self.engine);
        let metrics = Arc::clone(&self.metrics);
        let ctx = ctx.clone();
        let sql = sql.to_owned();

        run_blocking(move || {
            instrumented(&metrics, Procedure::Query, &sql, || {
                let mut consume = Some(consume);
                let mut output = None;
                engine.query(&ctx, &sql, &mut |cursor| {
                    let consume = consume
                        .take()
                        .ok_or_else(|| EngineError::unavailable("row cursor handed out twice"))?;
                    output = Some(consume(cursor)?);
                    Ok(())
                })?;
                output.ok_or_else(|| EngineError::unavailable("engine produced no row cursor"))
            })
        })
        .await
    }
}

fn instrumented<T>(
    metrics: &MetricsRegistry,
    procedure: Procedure,
    sql: &str,
    call: impl FnOnce() -> EngineResult<T>,
) -> EngineResult<T> {
    tracing::info!(procedure = %procedure, sql = %sql, "executing statement");

    let started = Instant::now();
    let result = call();
    metrics.observe(Observation::new(procedure, started.elapsed()));

    if let Err(e) = &result {
        metrics.increment_errors(procedure);
        if e.is_cancelled() {
            tracing::info!(procedure = %procedure, "statement cancelled by caller");
        } else {
            tracing::warn!(procedure = %procedure, error = %e, "statement failed");
        }
    }
    result
}

async fn run_blocking<T, F>(f: F) -> EngineResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> EngineResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| EngineError::unavailable(format!("engine worker failed: {}", e)))?
}
