//! State shared by all request handlers.

use std::sync::Arc;

use warden_auth::{ManagerOptions, SessionError, SessionManager, SessionStore, TextFileStore};
use warden_config::StoreConfig;

use crate::error::ServerError;

/// Store type used by the server: any backend behind a box.
pub type DynStore = Box<dyn SessionStore>;

/// Session manager shared across handlers.
pub type SharedManager = Arc<SessionManager<DynStore>>;

#[derive(Clone)]
pub struct AppState {
    manager: SharedManager,
}

impl AppState {
    pub fn new(manager: SessionManager<DynStore>) -> Self {
        Self {
            manager: Arc::new(manager),
        }
    }

    /// Build state over an arbitrary store.
    pub fn with_store(store: impl SessionStore + 'static, options: ManagerOptions) -> Self {
        Self::new(SessionManager::with_options(Box::new(store), options))
    }

    /// Build state over the text files named in the store section.
    pub fn from_config(config: &StoreConfig) -> Self {
        let store = TextFileStore::new(&config.users_path, &config.sessions_path);
        let options = ManagerOptions {
            strict_persistence: config.strict_persistence,
        };
        Self::with_store(store, options)
    }

    pub fn manager(&self) -> &SharedManager {
        &self.manager
    }

    /// Run a manager operation on the blocking pool.
    ///
    /// Store I/O happens under the manager lock, so it must not run on the
    /// async workers.
    pub async fn call<T, F>(&self, op: F) -> Result<T, ServerError>
    where
        F: FnOnce(&SessionManager<DynStore>) -> Result<T, SessionError> + Send + 'static,
        T: Send + 'static,
    {
        let manager = self.manager.clone();
        let result = tokio::task::spawn_blocking(move || op(manager.as_ref())).await?;
        Ok(result?)
    }
}
