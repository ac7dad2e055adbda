//! Statement Context
//!
//! Cancellation scope for a single engine call, built on a
//! `CancellationToken`. The gateway creates one per request and holds a drop
//! guard on it; engines tie the running statement's interrupt to the token
//! with `on_cancel`.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::runtime::Handle;
use tokio_util::sync::{CancellationToken, DropGuard};

use super::errors::{EngineError, EngineResult};

type InterruptHook = Box<dyn Fn() + Send>;
type HookSlot = Arc<Mutex<Option<InterruptHook>>>;

/// Cancellation scope shared between a request handler and an engine call
#[derive(Debug, Clone, Default)]
pub struct StatementContext {
    token: CancellationToken,
}

impl StatementContext {
    /// Create a live, uncancelled context
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the context
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the context has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Fail fast when the context is already cancelled
    pub fn check(&self) -> EngineResult<()> {
        if self.is_cancelled() {
            Err(EngineError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// The underlying token
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Guard that cancels this context on drop unless disarmed
    pub fn drop_guard(&self) -> DropGuard {
        self.token.clone().drop_guard()
    }

    /// Run `interrupt` when the context is cancelled while a statement runs.
    ///
    /// A watcher task on the current tokio runtime waits on the token. The
    /// hook only fires while the returned watch is alive; dropping the watch
    /// waits for an in-flight interrupt to finish, so a late interrupt can
    /// never reach a statement that started afterwards. Outside a runtime no
    /// watcher is spawned and cancellation is only seen through `check`.
    pub fn on_cancel<F>(&self, interrupt: F) -> EngineResult<InterruptWatch>
    where
        F: Fn() + Send + 'static,
    {
        self.check()?;

        let slot: HookSlot = Arc::new(Mutex::new(Some(Box::new(interrupt))));
        let finished = CancellationToken::new();

        if let Ok(runtime) = Handle::try_current() {
            let token = self.token.clone();
            let done = finished.clone();
            let hook = Arc::clone(&slot);
            runtime.spawn(async move {
                tokio::select! {
                    _ = done.cancelled() => {}
                    _ = token.cancelled() => {
                        if let Some(interrupt) = lock_slot(&hook).as_ref() {
                            interrupt();
                        }
                    }
                }
            });
        }

        Ok(InterruptWatch { slot, finished })
    }
}

fn lock_slot(slot: &HookSlot) -> MutexGuard<'_, Option<InterruptHook>> {
    match slot.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Keeps an interrupt hook armed for the lifetime of a statement
pub struct InterruptWatch {
    slot: HookSlot,
    finished: CancellationToken,
}

impl Drop for InterruptWatch {
    fn drop(&mut self) {
        self.finished.cancel();
        // Blocks until a concurrent interrupt() has returned
        lock_slot(&self.slot).take();
    }
}
