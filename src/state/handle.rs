//! Observable state container owned by one screen's view model.

use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;
use tracing::debug;

/// Publishes a screen's state to its subscribers.
///
/// Once [`dispose`](StateHandle::dispose) is called every further update is
/// dropped, so requests that complete after the screen is gone have no
/// effect.
#[derive(Debug)]
pub struct StateHandle<S> {
    tx: watch::Sender<S>,
    disposed: AtomicBool,
}

impl<S> StateHandle<S> {
    pub fn new(initial: S) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            tx,
            disposed: AtomicBool::new(false),
        }
    }

    /// Receiver notified after every applied update.
    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }

    /// Run `f` against the current state without copying it.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Mutate the state and notify subscribers. Returns `None` (and leaves
    /// the state untouched) once disposed.
    pub fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> Option<R> {
        if self.is_disposed() {
            debug!("Dropping state update for disposed screen");
            return None;
        }
        let mut out = None;
        self.tx.send_modify(|state| out = Some(f(state)));
        out
    }

    /// Stop applying updates.
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

impl<S: Clone> StateHandle<S> {
    /// Copy of the current state.
    pub fn snapshot(&self) -> S {
        self.tx.borrow().clone()
    }
}

impl<S: Default> Default for StateHandle<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_and_snapshot() {
        let handle = StateHandle::new(1u32);
        let doubled = handle.update(|n| {
            *n += 1;
            *n * 2
        });
        assert_eq!(doubled, Some(4));
        assert_eq!(handle.snapshot(), 2);
        assert_eq!(handle.read(|n| *n + 10), 12);
    }

    #[test]
    fn test_updates_after_dispose_are_dropped() {
        let handle = StateHandle::new(String::from("loaded"));
        handle.dispose();
        assert!(handle.update(|s| s.push_str(" late")).is_none());
        assert_eq!(handle.snapshot(), "loaded");
        assert!(handle.is_disposed());
    }

    #[tokio::test]
    async fn test_subscribers_notified() {
        let handle = StateHandle::new(0u8);
        let mut rx = handle.subscribe();
        handle.update(|n| *n = 7);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), 7);
    }
}
