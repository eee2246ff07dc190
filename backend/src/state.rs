//! Process-wide application state shared with every handler as `web::Data`.
//!
//! There is exactly one logical writer, so a single `RwLock` around the
//! repository is all the coordination the collections need.

use crate::config::Config;
use crate::export::ExportGuard;
use crate::repository::Repository;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<RwLock<Repository>>,
    pub export: ExportGuard,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(repository: Repository, config: Config) -> Self {
        Self {
            repository: Arc::new(RwLock::new(repository)),
            export: ExportGuard::new(),
            config: Arc::new(config),
        }
    }

    /// Empty in-memory state for handler tests.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        let store = crate::store::MemoryStore::new();
        let repository = Repository::open(Box::new(store)).expect("memory store never fails");
        Self::new(repository, Config::default())
    }
}
