use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{SimilarityError, SimilarityResult};
use crate::models::{SimilarUser, User};
use crate::repository::UserStore;

#[derive(Debug, Default)]
struct Collection {
    dimension: Option<usize>,
    points: BTreeMap<Uuid, (User, Vec<f32>)>,
}

/// In-memory implementation of UserStore (for development/testing)
///
/// Brute-force cosine search over every stored point.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserStore {
    collection: Arc<RwLock<Collection>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.collection.read().await.points.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Cosine similarity in [-1, 1]; zero vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Vector dimensions must match");

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let mag_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    let denom = mag_a * mag_b;
    if denom > 0.0 { dot / denom } else { 0.0 }
}

fn check_dimension(collection: &Collection, len: usize) -> SimilarityResult<()> {
    match collection.dimension {
        None => Err(SimilarityError::IndexUnavailable(
            "Collection has not been created".to_string(),
        )),
        Some(expected) if expected != len => Err(SimilarityError::IndexUnavailable(format!(
            "Vector dimension error: expected dim: {}, got {}",
            expected, len
        ))),
        Some(_) => Ok(()),
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn ensure_collection(&self, dimension: u64) -> SimilarityResult<bool> {
        let mut collection = self.collection.write().await;
        let dimension = dimension as usize;

        match collection.dimension {
            None => {
                collection.dimension = Some(dimension);
                Ok(true)
            }
            Some(existing) if existing == dimension => Ok(false),
            Some(existing) => Err(SimilarityError::Config(format!(
                "Collection has dimension {}, configured embedding dimension is {}",
                existing, dimension
            ))),
        }
    }

    async fn upsert(&self, user: &User, vector: Vec<f32>) -> SimilarityResult<()> {
        let mut collection = self.collection.write().await;
        check_dimension(&collection, vector.len())?;

        collection.points.insert(user.id, (user.clone(), vector));
        tracing::debug!(user_id = %user.id, "Stored user point");
        Ok(())
    }

    async fn search(&self, vector: Vec<f32>, limit: u32) -> SimilarityResult<Vec<SimilarUser>> {
        let collection = self.collection.read().await;
        check_dimension(&collection, vector.len())?;

        let mut results: Vec<SimilarUser> = collection
            .points
            .values()
            .map(|(user, stored)| SimilarUser {
                user: user.clone(),
                score: cosine_similarity(&vector, stored),
            })
            .collect();

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(limit as usize);

        Ok(results)
    }

    async fn get(&self, id: Uuid) -> SimilarityResult<Option<User>> {
        let collection = self.collection.read().await;
        Ok(collection.points.get(&id).map(|(user, _)| user.clone()))
    }

    async fn list(&self, limit: u32) -> SimilarityResult<Vec<User>> {
        let collection = self.collection.read().await;
        Ok(collection
            .points
            .values()
            .take(limit as usize)
            .map(|(user, _)| user.clone())
            .collect())
    }

    async fn health_check(&self) -> SimilarityResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserProfile;

    fn user(name: &str) -> User {
        User::new(UserProfile {
            name: name.to_string(),
            bio: format!("{} bio", name),
            interests: vec![],
            location: None,
            age: None,
        })
    }

    async fn store() -> InMemoryUserStore {
        let store = InMemoryUserStore::new();
        store.ensure_collection(3).await.unwrap();
        store
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn test_ensure_collection_is_idempotent() {
        let store = InMemoryUserStore::new();
        assert!(store.ensure_collection(3).await.unwrap());
        assert!(!store.ensure_collection(3).await.unwrap());

        let err = store.ensure_collection(4).await.unwrap_err();
        assert!(matches!(err, SimilarityError::Config(_)));
    }

    #[tokio::test]
    async fn test_upsert_same_id_keeps_one_record() {
        let store = store().await;
        let alice = user("Alice");

        store.upsert(&alice, vec![1.0, 0.0, 0.0]).await.unwrap();
        store.upsert(&alice, vec![1.0, 0.0, 0.0]).await.unwrap();

        assert_eq!(store.len().await, 1);
        assert_eq!(store.get(alice.id).await.unwrap(), Some(alice));
    }

    #[tokio::test]
    async fn test_upsert_rejects_wrong_dimension() {
        let store = store().await;
        let err = store.upsert(&user("Alice"), vec![1.0]).await.unwrap_err();
        assert!(matches!(err, SimilarityError::IndexUnavailable(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_search_before_collection_exists_fails() {
        let store = InMemoryUserStore::new();
        let err = store.search(vec![1.0, 0.0, 0.0], 5).await.unwrap_err();
        assert!(matches!(err, SimilarityError::IndexUnavailable(_)));
    }

    #[tokio::test]
    async fn test_search_orders_and_limits() {
        let store = store().await;
        let near = user("near");
        let mid = user("mid");
        let far = user("far");

        store.upsert(&far, vec![0.0, 0.0, 1.0]).await.unwrap();
        store.upsert(&near, vec![1.0, 0.1, 0.0]).await.unwrap();
        store.upsert(&mid, vec![1.0, 1.0, 0.0]).await.unwrap();

        let results = store.search(vec![1.0, 0.0, 0.0], 2).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].user.id, near.id);
        assert_eq!(results[1].user.id, mid.id);
        assert!(results[0].score >= results[1].score);
    }

    #[tokio::test]
    async fn test_list_respects_limit() {
        let store = store().await;
        for name in ["a", "b", "c"] {
            store.upsert(&user(name), vec![1.0, 1.0, 1.0]).await.unwrap();
        }

        assert_eq!(store.list(2).await.unwrap().len(), 2);
        assert_eq!(store.list(100).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = store().await;
        assert_eq!(store.get(Uuid::new_v4()).await.unwrap(), None);
    }
}
