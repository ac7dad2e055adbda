//! Bounded connection pool
//!
//! Caps the number of live connections and keeps a few idle ones around for
//! reuse. Waiting callers poll their statement context so a cancelled request
//! stops waiting for a connection.

use std::ops::{Deref, DerefMut};
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::Duration;

use super::context::StatementContext;
use super::errors::{EngineError, EngineResult};

const WAIT_POLL: Duration = Duration::from_millis(5);

type Factory<T> = Box<dyn Fn() -> EngineResult<T> + Send + Sync>;

struct PoolState<T> {
    idle: Vec<T>,
    open: usize,
}

/// A bounded pool of connections
pub struct ConnectionPool<T> {
    max_open: usize,
    max_idle: usize,
    factory: Factory<T>,
    state: Mutex<PoolState<T>>,
    available: Condvar,
}

impl<T> ConnectionPool<T> {
    /// Create a pool. `max_open` is clamped to at least one.
    pub fn new<F>(max_open: usize, max_idle: usize, factory: F) -> Self
    where
        F: Fn() -> EngineResult<T> + Send + Sync + 'static,
    {
        let max_open = max_open.max(1);
        Self {
            max_open,
            max_idle: max_idle.min(max_open),
            factory: Box::new(factory),
            state: Mutex::new(PoolState {
                idle: Vec::new(),
                open: 0,
            }),
            available: Condvar::new(),
        }
    }

    /// Check out a connection, opening one if the pool has room
    pub fn acquire(&self, ctx: &StatementContext) -> EngineResult<Pooled<'_, T>> {
        loop {
            ctx.check()?;
            let mut state = self.lock()?;
            if let Some(conn) = state.idle.pop() {
                return Ok(Pooled::new(self, conn));
            }

            if state.open < self.max_open {
                state.open += 1;
                drop(state);
                return match (self.factory)() {
                    Ok(conn) => Ok(Pooled::new(self, conn)),
                    Err(e) => {
                        self.forget();
                        Err(e)
                    }
                };
            }

            let (guard, _) = self
                .available
                .wait_timeout(state, WAIT_POLL)
                .map_err(|_| EngineError::unavailable("connection pool poisoned"))?;
            drop(guard);
        }
    }

    /// Number of live connections (idle and checked out)
    pub fn open_count(&self) -> usize {
        self.lock().map(|s| s.open).unwrap_or(0)
    }

    /// Number of idle connections
    pub fn idle_count(&self) -> usize {
        self.lock().map(|s| s.idle.len()).unwrap_or(0)
    }

    fn lock(&self) -> EngineResult<MutexGuard<'_, PoolState<T>>> {
        self.state
            .lock()
            .map_err(|_| EngineError::unavailable("connection pool poisoned"))
    }

    fn release(&self, conn: T) {
        if let Ok(mut state) = self.state.lock() {
            if state.idle.len() < self.max_idle {
                state.idle.push(conn);
            } else {
                state.open -= 1;
            }
        }
        self.available.notify_one();
    }

    fn forget(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.open -= 1;
        }
        self.available.notify_one();
    }
}

/// A checked-out connection; returns to the pool on drop
pub struct Pooled<'a, T> {
    pool: &'a ConnectionPool<T>,
    conn: Option<T>,
}

impl<'a, T> Pooled<'a, T> {
    fn new(pool: &'a ConnectionPool<T>, conn: T) -> Self {
        Self {
            pool,
            conn: Some(conn),
        }
    }
}

impl<T> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.conn.as_ref().expect("pooled connection present until drop")
    }
}

impl<T> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.conn.as_mut().expect("pooled connection present until drop")
    }
}

impl<T> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.pool.release(conn);
        }
    }
}
