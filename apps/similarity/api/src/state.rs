//! Application state management.
//!
//! Connection handles are created once at startup and shared read-only by
//! every request.

use domain_similarity::{
    EmbeddingProvider, InMemoryUserStore, OllamaProvider, QdrantUserStore, SimilarityService,
    UserStore,
};
use std::sync::Arc;
use tracing::info;

use crate::config::{Config, StoreBackend};

/// Service type shared by handlers; the store is chosen at runtime.
pub type UsersService = SimilarityService<Arc<dyn UserStore>>;

/// Shared application state.
///
/// Cloned per handler; all fields are Arc-backed.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: Config,
    /// Embedder + vector store behind the users API
    pub service: Arc<UsersService>,
}

impl AppState {
    /// Connect to the configured backends and make sure the collection exists.
    pub async fn connect(config: Config) -> eyre::Result<Self> {
        let store: Arc<dyn UserStore> = match config.store {
            StoreBackend::Qdrant => {
                info!(url = %config.qdrant.url, collection = %config.qdrant.collection, "Using Qdrant vector store");
                Arc::new(QdrantUserStore::new(config.qdrant.clone())?)
            }
            StoreBackend::Memory => {
                info!("Using in-memory vector store");
                Arc::new(InMemoryUserStore::new())
            }
        };

        info!(
            url = %config.ollama.base_url,
            models = ?config.ollama.models,
            dimension = config.ollama.dimension,
            "Using Ollama embeddings"
        );
        let embedder: Arc<dyn EmbeddingProvider> =
            Arc::new(OllamaProvider::new(config.ollama.clone())?);

        let state = Self::from_parts(config, store, embedder);

        let created = state
            .service
            .ensure_collection()
            .await
            .map_err(|e| eyre::eyre!("Vector collection setup failed: {}", e))?;
        if created {
            info!("Vector collection created");
        }

        Ok(state)
    }

    pub fn from_parts(
        config: Config,
        store: Arc<dyn UserStore>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            config,
            service: Arc::new(SimilarityService::new(store, embedder)),
        }
    }
}
