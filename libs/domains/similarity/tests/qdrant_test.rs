//! Qdrant store tests
//!
//! These need a running Qdrant with the gRPC port exposed:
//!
//! ```bash
//! docker run -p 6334:6334 qdrant/qdrant
//! cargo test -p domain_similarity --test qdrant_test -- --ignored
//! ```
//!
//! `QDRANT_URL` overrides the default `http://localhost:6334`. Every test
//! works in its own collection and drops it afterwards.

use domain_similarity::*;
use qdrant_client::Qdrant;
use uuid::Uuid;

const DIMENSION: u64 = 4;

fn qdrant_url() -> String {
    std::env::var("QDRANT_URL").unwrap_or_else(|_| "http://localhost:6334".to_string())
}

fn store() -> QdrantUserStore {
    let config = QdrantConfig::new(qdrant_url())
        .with_timeout(5)
        .with_collection(format!("users_test_{}", Uuid::new_v4().simple()));
    QdrantUserStore::new(config).unwrap()
}

async fn drop_collection(store: &QdrantUserStore) {
    let client = Qdrant::from_url(&qdrant_url()).build().unwrap();
    let _ = client.delete_collection(store.collection()).await;
}

fn user(name: &str, bio: &str) -> User {
    User::new(UserProfile {
        name: name.to_string(),
        bio: bio.to_string(),
        interests: vec!["maps".to_string()],
        location: None,
        age: Some(40),
    })
}

#[tokio::test]
#[ignore] // Requires actual Qdrant
async fn test_ensure_collection_creates_once_and_checks_dimension() {
    let store = store();

    assert!(store.ensure_collection(DIMENSION).await.unwrap());
    assert!(!store.ensure_collection(DIMENSION).await.unwrap());

    let err = store.ensure_collection(DIMENSION + 1).await.unwrap_err();
    assert!(matches!(err, SimilarityError::Config(_)));

    drop_collection(&store).await;
}

#[tokio::test]
#[ignore] // Requires actual Qdrant
async fn test_upsert_same_id_keeps_one_point() {
    let store = store();
    store.ensure_collection(DIMENSION).await.unwrap();

    let mut alice = user("Alice", "loves hiking");
    store.upsert(&alice, vec![1.0, 0.0, 0.0, 0.0]).await.unwrap();
    alice.profile.bio = "loves long hikes".to_string();
    store.upsert(&alice, vec![0.9, 0.1, 0.0, 0.0]).await.unwrap();

    let users = store.list(models::DEFAULT_LIST_LIMIT).await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0], alice);

    assert_eq!(store.get(alice.id).await.unwrap(), Some(alice));
    assert_eq!(store.get(Uuid::new_v4()).await.unwrap(), None);

    drop_collection(&store).await;
}

#[tokio::test]
#[ignore] // Requires actual Qdrant
async fn test_search_ranks_by_cosine_and_respects_limit() {
    let store = store();
    store.ensure_collection(DIMENSION).await.unwrap();

    let hiker = user("Alice", "loves hiking");
    let climber = user("Bob", "climbs mountains");
    let gamer = user("Carol", "plays video games");
    store.upsert(&hiker, vec![1.0, 0.0, 0.0, 0.1]).await.unwrap();
    store.upsert(&climber, vec![0.8, 0.2, 0.0, 0.1]).await.unwrap();
    store.upsert(&gamer, vec![0.0, 0.0, 1.0, 0.1]).await.unwrap();

    let results = store.search(vec![1.0, 0.0, 0.0, 0.1], 2).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].user, hiker);
    assert_eq!(results[1].user, climber);
    assert!(results[0].score >= results[1].score);
    assert!((results[0].score - 1.0).abs() < 1e-4);

    let users = store.list(2).await.unwrap();
    assert_eq!(users.len(), 2);

    drop_collection(&store).await;
}

#[tokio::test]
#[ignore] // Requires actual Qdrant
async fn test_health_check() {
    let store = store();
    store.health_check().await.unwrap();
}

#[tokio::test]
async fn test_unreachable_qdrant_is_index_unavailable() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = QdrantConfig::new(format!("http://{}", addr)).with_timeout(2);
    let store = QdrantUserStore::new(config).unwrap();

    let err = store.search(vec![1.0, 0.0, 0.0, 0.0], 1).await.unwrap_err();
    assert!(matches!(err, SimilarityError::IndexUnavailable(_)));
}
