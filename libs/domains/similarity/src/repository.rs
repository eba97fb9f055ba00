use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::SimilarityResult;
use crate::models::{SimilarUser, User};

/// Vector store holding one point per user
///
/// Point id is the user id, the vector is the user's embedding and the payload
/// is the user's attributes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create the backing collection with cosine distance if it is missing.
    ///
    /// Returns `true` when the collection was created by this call.
    async fn ensure_collection(&self, dimension: u64) -> SimilarityResult<bool>;

    /// Insert or replace the point for `user.id`. Waits until the write is applied.
    async fn upsert(&self, user: &User, vector: Vec<f32>) -> SimilarityResult<()>;

    /// Up to `limit` nearest users, most similar first
    async fn search(&self, vector: Vec<f32>, limit: u32) -> SimilarityResult<Vec<SimilarUser>>;

    async fn get(&self, id: Uuid) -> SimilarityResult<Option<User>>;

    /// The first `limit` users in storage order
    async fn list(&self, limit: u32) -> SimilarityResult<Vec<User>>;

    async fn health_check(&self) -> SimilarityResult<()>;
}

#[async_trait]
impl<T: UserStore + ?Sized> UserStore for Arc<T> {
    async fn ensure_collection(&self, dimension: u64) -> SimilarityResult<bool> {
        (**self).ensure_collection(dimension).await
    }

    async fn upsert(&self, user: &User, vector: Vec<f32>) -> SimilarityResult<()> {
        (**self).upsert(user, vector).await
    }

    async fn search(&self, vector: Vec<f32>, limit: u32) -> SimilarityResult<Vec<SimilarUser>> {
        (**self).search(vector, limit).await
    }

    async fn get(&self, id: Uuid) -> SimilarityResult<Option<User>> {
        (**self).get(id).await
    }

    async fn list(&self, limit: u32) -> SimilarityResult<Vec<User>> {
        (**self).list(limit).await
    }

    async fn health_check(&self) -> SimilarityResult<()> {
        (**self).health_check().await
    }
}
