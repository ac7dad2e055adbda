//! SQLite engine
//!
//! `Engine` implementation over `rusqlite`. Statements run on pooled
//! connections; each running statement registers the connection's interrupt
//! handle with its context so cancellation aborts it.
//!
//! Input is split with `Batch`: empty and comment-only text yields no
//! statement at all. `exec` runs every statement of a script in order;
//! `query` accepts exactly one.

use rusqlite::fallible_iterator::FallibleIterator;
use rusqlite::{Batch, Connection, OpenFlags, Rows};

use super::config::EngineConfig;
use super::context::{InterruptWatch, StatementContext};
use super::errors::{EngineError, EngineResult};
use super::pool::ConnectionPool;
use super::{Engine, Mutation, MutationResult, RowConsumer, RowCursor};

/// Plain `:memory:` gives every connection its own database.
const PRIVATE_MEMORY: &str = ":memory:";

/// SQLite-backed engine
pub struct SqliteEngine {
    data_source: String,
    pool: ConnectionPool<Connection>,
}

impl SqliteEngine {
    /// Open the engine and verify the data source with a first connection.
    ///
    /// The first connection stays idle in the pool, which keeps shared
    /// in-memory databases alive between requests.
    pub fn open(config: &EngineConfig) -> EngineResult<Self> {
        let private_memory = config.data_source == PRIVATE_MEMORY;
        let max_open = if private_memory {
            1
        } else {
            config.max_open_connections
        };
        let max_idle = config.max_idle_connections.max(1);

        let source = config.data_source.clone();
        let busy_timeout = config.busy_timeout();
        let pool = ConnectionPool::new(max_open, max_idle, move || {
            let conn = Connection::open_with_flags(&source, OpenFlags::default())
                .map_err(|e| EngineError::unavailable(e.to_string()))?;
            conn.busy_timeout(busy_timeout)
                .map_err(|e| EngineError::unavailable(e.to_string()))?;
            Ok(conn)
        });

        drop(pool.acquire(&StatementContext::new())?);

        tracing::debug!(
            data_source = %config.data_source,
            max_open,
            max_idle,
            "sqlite engine opened"
        );

        Ok(Self {
            data_source: config.data_source.clone(),
            pool,
        })
    }

    /// Data source this engine was opened with
    pub fn data_source(&self) -> &str {
        &self.data_source
    }

    /// Connection pool, for inspection
    pub fn pool(&self) -> &ConnectionPool<Connection> {
        &self.pool
    }
}

/// Returned by `query` when the text holds more than one statement
const MULTIPLE_STATEMENTS: &str = "query accepts a single statement; send scripts to /exec";

fn watch(ctx: &StatementContext, conn: &Connection) -> EngineResult<InterruptWatch> {
    let handle = conn.get_interrupt_handle();
    ctx.on_cancel(move || handle.interrupt())
}

impl Engine for SqliteEngine {
    fn exec(&self, ctx: &StatementContext, sql: &str) -> EngineResult<Box<dyn MutationResult>> {
        let conn = self.pool.acquire(ctx)?;
        let _watch = watch(ctx, &conn)?;

        let mut rows_affected = 0;
        let mut batch = Batch::new(&conn, sql);
        while let Some(mut stmt) = batch.next()? {
            let before = conn.total_changes();
            {
                let mut rows = stmt.raw_query();
                while rows.next()?.is_some() {}
            }
            // changes() is stale after DDL; only trust it when this statement changed rows
            rows_affected = if conn.total_changes() != before {
                conn.changes() as i64
            } else {
                0
            };
        }

        Ok(Box::new(Mutation {
            rows_affected,
            last_insert_id: conn.last_insert_rowid(),
        }))
    }

    fn query(
        &self,
        ctx: &StatementContext,
        sql: &str,
        consume: &mut RowConsumer<'_>,
    ) -> EngineResult<()> {
        let conn = self.pool.acquire(ctx)?;
        let _watch = watch(ctx, &conn)?;

        let mut batch = Batch::new(&conn, sql);
        let mut stmt = match batch.next()? {
            Some(stmt) => stmt,
            None => return consume(&mut Exhausted),
        };
        // Any further text that is not whitespace or a comment is a second statement
        if !matches!(batch.next(), Ok(None)) {
            return Err(EngineError::statement(MULTIPLE_STATEMENTS));
        }

        let mut cursor = SqliteCursor {
            rows: stmt.raw_query(),
        };
        consume(&mut cursor)
    }
}

/// Cursor over input that held no statement
struct Exhausted;

impl RowCursor for Exhausted {
    fn advance(&mut self) -> EngineResult<bool> {
        Ok(false)
    }
}

struct SqliteCursor<'stmt> {
    rows: Rows<'stmt>,
}

impl RowCursor for SqliteCursor<'_> {
    fn advance(&mut self) -> EngineResult<bool> {
        Ok(self.rows.next()?.is_some())
    }
}
