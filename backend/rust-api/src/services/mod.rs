use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::config::Config;
use crate::engine::stuck::SignalWindow;

use self::hint_backend::GenerativeBackend;
use self::storage::Store;

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn Store>,
    pub backend: Option<Arc<dyn GenerativeBackend>>,
    pub runtimes: Arc<SessionRuntimes>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn Store>,
        backend: Option<Arc<dyn GenerativeBackend>>,
    ) -> Self {
        Self {
            config,
            store,
            backend,
            runtimes: Arc::new(SessionRuntimes::default()),
        }
    }
}

/// Ephemeral per-session state: the detector's rolling signal window and
/// cooldown clock. Lost on restart by design; it is re-derived from fresh
/// signals.
pub struct SessionRuntime {
    pub window: SignalWindow,
}

impl SessionRuntime {
    fn new() -> Self {
        Self {
            window: SignalWindow::new(Utc::now()),
        }
    }
}

/// Registry of per-session mutation points. The `tokio::sync::Mutex` per
/// entry is the single writer for that session: hint-level changes, ledger
/// appends and window updates all serialize through it. Detector ticks use
/// `try_lock` on the same mutex and drop overlapping evaluations instead
/// of queueing them.
#[derive(Default)]
pub struct SessionRuntimes {
    inner: Mutex<HashMap<String, Arc<tokio::sync::Mutex<SessionRuntime>>>>,
}

impl SessionRuntimes {
    pub fn entry(&self, session_id: &str) -> Arc<tokio::sync::Mutex<SessionRuntime>> {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        map.entry(session_id.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(SessionRuntime::new())))
            .clone()
    }

    /// Completed or abandoned sessions owe no background state.
    pub fn remove(&self, session_id: &str) {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        map.remove(session_id);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

pub mod hint_backend;
pub mod hint_service;
pub mod memory_store;
pub mod mongo_store;
pub mod problem_service;
pub mod session_service;
pub mod signal_service;
pub mod storage;
