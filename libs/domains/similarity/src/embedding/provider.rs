use async_trait::async_trait;

use crate::error::SimilarityResult;

/// Trait for embedding generation providers
///
/// Every vector returned by `embed` has exactly `dimension()` components.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Short provider name for logs and readiness output
    fn provider_name(&self) -> &'static str;

    /// Length of every vector this provider returns
    fn dimension(&self) -> usize;

    /// Generate the embedding for a single non-empty text
    async fn embed(&self, text: &str) -> SimilarityResult<Vec<f32>>;

    /// Check that the provider is reachable
    async fn health_check(&self) -> SimilarityResult<()>;
}
