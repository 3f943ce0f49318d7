use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Duration;
use tokio::sync::oneshot;

use crate::{config::AppConfig, engine::CategoryTreeEngine, session::PermissionCache};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub engine: Arc<Mutex<CategoryTreeEngine>>,
    pub sessions: Arc<Mutex<PermissionCache>>,
    pub status: Arc<Mutex<Status>>,
    pub shutdown_sender: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct Status {
    pub message: String,
    pub category_records: usize,
    pub document_records: usize,
    pub last_update: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig, engine: CategoryTreeEngine) -> Self {
        let ttl = i64::try_from(config.permission_ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);
        let status = Status {
            message: "Servidor listo.".to_string(),
            category_records: engine.category_records(),
            document_records: engine.documents().len(),
            last_update: None,
        };
        Self {
            config,
            engine: Arc::new(Mutex::new(engine)),
            sessions: Arc::new(Mutex::new(PermissionCache::new(ttl))),
            status: Arc::new(Mutex::new(status)),
            shutdown_sender: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_shutdown(self, sender: oneshot::Sender<()>) -> Self {
        *lock(&self.shutdown_sender) = Some(sender);
        self
    }

    pub fn engine(&self) -> MutexGuard<'_, CategoryTreeEngine> {
        lock(&self.engine)
    }

    pub fn sessions(&self) -> MutexGuard<'_, PermissionCache> {
        lock(&self.sessions)
    }

    pub fn status(&self) -> MutexGuard<'_, Status> {
        lock(&self.status)
    }
}

/// Un handler que entró en pánico no invalida el estado: los snapshots se
/// sustituyen enteros.
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
