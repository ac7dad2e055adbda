//! # Engine Module
//!
//! Capability contract for the embedded SQL engine the gateway delegates to.
//! SQL parsing, execution and storage belong to the engine; the rest of the
//! crate only sees `exec` and `query`.
//!
//! ## Contract
//!
//! - `exec` runs a statement and reports a [`MutationResult`]
//! - `query` runs a statement and hands a lazy [`RowCursor`] to a consumer
//! - Both observe a [`StatementContext`] for cancellation
//! - Implementations own their concurrency safety; callers add no locking

mod config;
mod context;
mod errors;
mod pool;
mod sqlite;

pub use config::EngineConfig;
pub use context::{InterruptWatch, StatementContext};
pub use errors::{EngineError, EngineResult};
pub use pool::{ConnectionPool, Pooled};
pub use sqlite::SqliteEngine;

/// Outcome of a mutating statement.
///
/// Both accessors are best-effort and may fail independently.
pub trait MutationResult: Send {
    /// Number of rows changed by the statement
    fn rows_affected(&self) -> EngineResult<i64>;

    /// Identifier generated by the most recent insert
    fn last_insert_id(&self) -> EngineResult<i64>;
}

/// Lazy sequence of result rows
pub trait RowCursor {
    /// Step to the next row. Returns `Ok(false)` once the cursor is exhausted.
    fn advance(&mut self) -> EngineResult<bool>;
}

/// Consumer handed the cursor of a query while the statement is live
pub type RowConsumer<'a> = dyn FnMut(&mut dyn RowCursor) -> EngineResult<()> + 'a;

/// Embedded SQL engine capability.
///
/// Calls block for the duration of the statement.
pub trait Engine: Send + Sync {
    /// Execute a statement expected to mutate data
    fn exec(&self, ctx: &StatementContext, sql: &str) -> EngineResult<Box<dyn MutationResult>>;

    /// Execute a statement expected to read data.
    ///
    /// The cursor only lives for the duration of `consume`.
    fn query(
        &self,
        ctx: &StatementContext,
        sql: &str,
        consume: &mut RowConsumer<'_>,
    ) -> EngineResult<()>;
}

/// Fixed mutation outcome, for engines that compute both values eagerly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Mutation {
    pub rows_affected: i64,
    pub last_insert_id: i64,
}

impl MutationResult for Mutation {
    fn rows_affected(&self) -> EngineResult<i64> {
        Ok(self.rows_affected)
    }

    fn last_insert_id(&self) -> EngineResult<i64> {
        Ok(self.last_insert_id)
    }
}

/// Drain a cursor, counting the rows it yields
pub fn count_rows(cursor: &mut dyn RowCursor) -> EngineResult<i64> {
    let mut rows = 0;
    while cursor.advance()? {
        rows += 1;
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct VecCursor {
        remaining: usize,
    }

    impl RowCursor for VecCursor {
        fn advance(&mut self) -> EngineResult<bool> {
            if self.remaining == 0 {
                return Ok(false);
            }
            self.remaining -= 1;
            Ok(true)
        }
    }

    struct FailingCursor;

    impl RowCursor for FailingCursor {
        fn advance(&mut self) -> EngineResult<bool> {
            Err(EngineError::statement("disk I/O error"))
        }
    }

    #[test]
    fn test_count_rows() {
        assert_eq!(count_rows(&mut VecCursor { remaining: 0 }).unwrap(), 0);
        assert_eq!(count_rows(&mut VecCursor { remaining: 7 }).unwrap(), 7);
    }

    #[test]
    fn test_count_rows_surfaces_step_error() {
        let err = count_rows(&mut FailingCursor).unwrap_err();
        assert_eq!(err.to_string(), "disk I/O error");
    }

    #[test]
    fn test_mutation_accessors() {
        let m = Mutation {
            rows_affected: 3,
            last_insert_id: 9,
        };
        assert_eq!(m.rows_affected().unwrap(), 3);
        assert_eq!(m.last_insert_id().unwrap(), 9);
    }
}
