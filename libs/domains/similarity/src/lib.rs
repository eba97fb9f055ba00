//! User Similarity Domain Library
//!
//! Stores users as embedding vectors and finds the users closest to a
//! free-form description.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────┐
//! │ SimilarityService │  ← validate, build text, embed, store/search
//! └─────────┬─────────┘
//!           │
//! ┌─────────▼─────────┐     ┌───────────────────┐
//! │    UserStore      │     │ EmbeddingProvider │
//! │     (trait)       │     │      (trait)      │
//! └─────────┬─────────┘     └─────────┬─────────┘
//!           │                         │
//! ┌─────────▼─────────┐     ┌─────────▼─────────┐
//! │  QdrantUserStore  │     │  OllamaProvider   │
//! │ InMemoryUserStore │     │                   │
//! └───────────────────┘     └───────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use core_config::FromEnv;
//! use domain_similarity::{
//!     CreateUser, FindSimilarParams, OllamaConfig, OllamaProvider, QdrantConfig,
//!     QdrantUserStore, SimilarityQuery, SimilarityService,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = QdrantUserStore::new(QdrantConfig::from_env()?)?;
//! let embedder = OllamaProvider::new(OllamaConfig::from_env()?)?;
//! let service = SimilarityService::new(store, Arc::new(embedder));
//!
//! service.ensure_collection().await?;
//!
//! service
//!     .create_user(CreateUser {
//!         name: "Alice".into(),
//!         bio: "loves hiking".into(),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! let query = SimilarityQuery {
//!     bio: Some("hiking in mountains".into()),
//!     ..Default::default()
//! };
//! let _similar = service.find_similar(query, FindSimilarParams::default()).await?;
//! # Ok(())
//! # }
//! ```

pub mod embedding;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod qdrant;
pub mod repository;
pub mod retry;
pub mod service;
pub mod text;

// Re-export commonly used types
pub use embedding::{EmbeddingProvider, OllamaConfig, OllamaProvider};
pub use error::{SimilarityError, SimilarityResult};
pub use handlers::SimilarityApiDoc;
pub use memory::InMemoryUserStore;
pub use models::{
    CreateUser, FindSimilarParams, ListParams, SimilarUser, SimilarUserResponse, SimilarityQuery,
    User, UserProfile, UserResponse,
};
pub use qdrant::{QdrantConfig, QdrantUserStore};
pub use repository::UserStore;
pub use retry::RetryPolicy;
pub use service::SimilarityService;
