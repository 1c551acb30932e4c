//! One-shot completion signals.
//!
//! [`completion_pair`] returns a resolver ([`CompletionHandle`]) and an
//! observer ([`Completion`]). The observer is polled from the host's event
//! loop. Dropping the resolver without resolving
//! marks the completion as abandoned; it will never resolve.

use std::sync::Arc;

use parking_lot::Mutex;

/// The observable state of a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionState {
    /// Not resolved yet.
    Pending,
    /// Resolved by its handle.
    Resolved,
    /// The handle was dropped without resolving.
    Abandoned,
}

struct Shared {
    state: Mutex<CompletionState>,
}

impl Shared {
    fn settle(&self, next: CompletionState) {
        let mut state = self.state.lock();
        if *state == CompletionState::Pending {
            *state = next;
        }
    }
}

/// The resolving side of a completion pair.
pub struct CompletionHandle {
    inner: Arc<Shared>,
}

impl CompletionHandle {
    /// Resolve the completion. Observers see [`CompletionState::Resolved`].
    pub fn resolve(self) {
        self.inner.settle(CompletionState::Resolved);
    }
}

impl Drop for CompletionHandle {
    fn drop(&mut self) {
        // No-op when already resolved.
        self.inner.settle(CompletionState::Abandoned);
    }
}

impl std::fmt::Debug for CompletionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionHandle").finish_non_exhaustive()
    }
}

/// The observing side of a completion pair.
#[derive(Clone)]
pub struct Completion {
    inner: Arc<Shared>,
}

impl Completion {
    /// Current state.
    pub fn state(&self) -> CompletionState {
        *self.inner.state.lock()
    }

    /// Whether the handle has resolved.
    pub fn is_resolved(&self) -> bool {
        self.state() == CompletionState::Resolved
    }

    /// Whether the handle was dropped without resolving.
    pub fn is_abandoned(&self) -> bool {
        self.state() == CompletionState::Abandoned
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("state", &self.state())
            .finish()
    }
}

/// Create a resolver/observer pair.
pub fn completion_pair() -> (CompletionHandle, Completion) {
    let shared = Arc::new(Shared {
        state: Mutex::new(CompletionState::Pending),
    });

    (
        CompletionHandle {
            inner: shared.clone(),
        },
        Completion { inner: shared },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        let (handle, completion) = completion_pair();
        assert_eq!(completion.state(), CompletionState::Pending);
        handle.resolve();
        assert!(completion.is_resolved());
        assert!(!completion.is_abandoned());
    }

    #[test]
    fn test_drop_without_resolve_abandons() {
        let (handle, completion) = completion_pair();
        drop(handle);
        assert!(completion.is_abandoned());
    }

    #[test]
    fn test_clones_share_state() {
        let (handle, completion) = completion_pair();
        let other = completion.clone();
        handle.resolve();
        assert!(other.is_resolved());
    }
}
