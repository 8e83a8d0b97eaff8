//! Shared, observable session state.
//!
//! Wraps the domain [`SessionStore`] in a mutex and republishes a snapshot
//! on a `watch` channel after every mutation. The lock is only taken inside
//! synchronous closures, never across an `.await`, so each store operation
//! is a single atomic step even when many sends are in flight.

use chorus_domain::{Session, SessionStore};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

#[derive(Clone)]
pub struct SharedSessions {
    store: Arc<Mutex<SessionStore>>,
    changes: Arc<watch::Sender<Vec<Session>>>,
}

impl SharedSessions {
    pub fn new(store: SessionStore) -> Self {
        let (changes, _) = watch::channel(store.sessions().to_vec());
        Self {
            store: Arc::new(Mutex::new(store)),
            changes: Arc::new(changes),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionStore> {
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run a read-only closure against the store.
    pub fn read<R>(&self, f: impl FnOnce(&SessionStore) -> R) -> R {
        f(&self.lock())
    }

    /// Run a mutation and notify subscribers afterwards.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut SessionStore) -> R) -> R {
        let (result, snapshot) = {
            let mut store = self.lock();
            let result = f(&mut store);
            (result, store.sessions().to_vec())
        };
        self.changes.send_replace(snapshot);
        result
    }

    pub fn snapshot(&self) -> Vec<Session> {
        self.read(|store| store.sessions().to_vec())
    }

    /// Receive a fresh snapshot after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Session>> {
        self.changes.subscribe()
    }
}
