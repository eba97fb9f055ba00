use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::embedding::EmbeddingProvider;
use crate::error::{SimilarityError, SimilarityResult};
use crate::models::{
    CreateUser, FindSimilarParams, ListParams, SimilarUser, SimilarityQuery, User, UserProfile,
};
use crate::repository::UserStore;

/// Embed-then-store and embed-then-search over users
///
/// Holds the long-lived handles to the embedding provider and the vector
/// store; both are shared read-only across requests.
pub struct SimilarityService<R: UserStore> {
    repository: R,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl<R: UserStore> SimilarityService<R> {
    pub fn new(repository: R, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            repository,
            embedder,
        }
    }

    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Create the vector collection sized for the embedder if it is missing.
    pub async fn ensure_collection(&self) -> SimilarityResult<bool> {
        self.repository
            .ensure_collection(self.embedder.dimension() as u64)
            .await
    }

    /// Validate, embed and store a new user.
    ///
    /// Nothing is stored unless embedding succeeds, and storing is the last
    /// step, so a failure leaves no user behind.
    #[instrument(skip(self, input))]
    pub async fn create_user(&self, input: CreateUser) -> SimilarityResult<User> {
        input.validate()?;

        let user = User::new(UserProfile::from(input));
        let vector = self.embed_checked(&user.profile.embedding_text()).await?;

        self.repository.upsert(&user, vector).await?;

        info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    /// Users most similar to `query`, best match first.
    ///
    /// The query need not describe a stored user.
    #[instrument(skip(self, query))]
    pub async fn find_similar(
        &self,
        query: SimilarityQuery,
        params: FindSimilarParams,
    ) -> SimilarityResult<Vec<SimilarUser>> {
        query.validate()?;
        params.validate()?;

        let vector = self.embed_checked(&query.embedding_text()).await?;
        let mut results = self.repository.search(vector, params.limit).await?;

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(params.limit as usize);

        Ok(results)
    }

    pub async fn get_user(&self, id: Uuid) -> SimilarityResult<User> {
        self.repository
            .get(id)
            .await?
            .ok_or(SimilarityError::NotFound(id))
    }

    pub async fn list_users(&self, params: ListParams) -> SimilarityResult<Vec<User>> {
        params.validate()?;
        self.repository.list(params.limit).await
    }

    /// A provider returning the wrong vector length is an embedding failure,
    /// not something to hand to the index.
    async fn embed_checked(&self, text: &str) -> SimilarityResult<Vec<f32>> {
        let vector = self.embedder.embed(text).await?;

        let expected = self.embedder.dimension();
        if vector.len() != expected {
            return Err(SimilarityError::Embedding(format!(
                "{} returned {} dimensions, expected {}",
                self.embedder.provider_name(),
                vector.len(),
                expected
            )));
        }

        Ok(vector)
    }
}
