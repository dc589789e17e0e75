//! Coordination around grammar loads: the "loading a language" flag and
//! per-grammar locks that collapse concurrent cache misses into one load.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;

/// Process-wide "loading a language" flag; true while any load is in flight
pub(crate) struct LoadingState {
    in_flight: AtomicUsize,
    flag: watch::Sender<bool>,
}

impl LoadingState {
    pub fn new() -> Self {
        let (flag, _) = watch::channel(false);
        Self {
            in_flight: AtomicUsize::new(0),
            flag,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.flag.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        *self.flag.borrow()
    }

    /// Raise the flag until the returned guard is dropped, on success or failure
    pub fn begin(&self) -> LoadingGuard<'_> {
        if self.in_flight.fetch_add(1, Ordering::SeqCst) == 0 {
            self.flag.send_replace(true);
        }
        LoadingGuard { state: self }
    }
}

pub(crate) struct LoadingGuard<'a> {
    state: &'a LoadingState,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.state.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.state.flag.send_replace(false);
        }
    }
}

/// One async lock per primary grammar name
#[derive(Default)]
pub(crate) struct LoadLocks {
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl LoadLocks {
    pub fn lock_for(&self, name: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(name.to_string()).or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_tracks_nested_loads() {
        let state = LoadingState::new();
        let rx = state.subscribe();
        assert!(!*rx.borrow());

        let outer = state.begin();
        let inner = state.begin();
        assert!(state.is_loading());

        drop(outer);
        assert!(state.is_loading());
        drop(inner);
        assert!(!state.is_loading());
        assert!(!*rx.borrow());
    }

    #[test]
    fn same_name_shares_a_lock() {
        let locks = LoadLocks::default();
        assert!(Arc::ptr_eq(&locks.lock_for("rust"), &locks.lock_for("rust")));
        assert!(!Arc::ptr_eq(&locks.lock_for("rust"), &locks.lock_for("go")));
    }
}
