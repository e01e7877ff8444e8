use std::sync::Arc;

use anyhow::Context;
use tokio::sync::Semaphore;

use crate::config::ServerConfig;
use crate::storage::ArtifactStore;

/// Shared application state handed to every handler.
pub struct AppState {
    pub config: ServerConfig,
    pub store: ArtifactStore,
    /// Bounds the number of compiler processes running at once.
    pub compile_permits: Arc<Semaphore>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.work_dir)
            .with_context(|| format!("creating work directory {:?}", config.work_dir))?;
        let store = ArtifactStore::new(&config.serving_dir)
            .with_context(|| format!("creating serving directory {:?}", config.serving_dir))?;
        let compile_permits = Arc::new(Semaphore::new(config.max_concurrent_compiles));

        Ok(Self {
            config,
            store,
            compile_permits,
        })
    }
}
