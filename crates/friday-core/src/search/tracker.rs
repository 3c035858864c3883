// crates/friday-core/src/search/tracker.rs
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Owned ticket for one issued request.
#[derive(Debug, Clone)]
pub struct RequestHandle {
    generation: u64,
    query: String,
    token: CancellationToken,
}

impl RequestHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the tracker cancels this request.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    current: Option<(u64, CancellationToken)>,
}

/// Keeps at most one request current and guards every state update with it.
///
/// Issuing cancels the previous request. A response only reaches visible
/// state through [`settle`](RequestTracker::settle), which refuses stale
/// handles, so results always belong to the most recently issued query.
#[derive(Debug, Default)]
pub struct RequestTracker {
    slot: Mutex<Slot>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, query: &str) -> RequestHandle {
        let mut slot = self.lock();
        if let Some((generation, token)) = slot.current.take() {
            debug!(generation, "superseding in-flight search");
            token.cancel();
        }
        slot.generation += 1;
        let token = CancellationToken::new();
        slot.current = Some((slot.generation, token.clone()));
        RequestHandle {
            generation: slot.generation,
            query: query.to_owned(),
            token,
        }
    }

    pub fn is_current(&self, handle: &RequestHandle) -> bool {
        Self::matches(&self.lock(), handle)
    }

    /// Runs `apply` if `handle` is still current, then retires it.
    ///
    /// The currency check and `apply` happen under one lock, so no `issue`
    /// can slip in between. Returns `None` without calling `apply` for stale
    /// or cancelled handles.
    pub fn settle<R>(&self, handle: &RequestHandle, apply: impl FnOnce() -> R) -> Option<R> {
        let mut slot = self.lock();
        if !Self::matches(&slot, handle) {
            debug!(generation = handle.generation, query = %handle.query, "dropping stale response");
            return None;
        }
        slot.current = None;
        Some(apply())
    }

    /// Cancels and forgets the current request, if any.
    pub fn cancel_current(&self) {
        if let Some((_, token)) = self.lock().current.take() {
            token.cancel();
        }
    }

    /// Drives the "searching" indicator.
    pub fn is_searching(&self) -> bool {
        self.lock().current.is_some()
    }

    fn matches(slot: &Slot, handle: &RequestHandle) -> bool {
        !handle.token.is_cancelled()
            && slot
                .current
                .as_ref()
                .is_some_and(|(generation, _)| *generation == handle.generation)
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
