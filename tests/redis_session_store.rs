//! Redis session store tests
//!
//! Run with: REDIS_URL=redis://... cargo test -- --ignored

use bookshelf_server::services::{redis::RedisSessionStore, session::SessionStore};
use uuid::Uuid;

async fn store(ttl_seconds: u64) -> RedisSessionStore {
    let url = std::env::var("REDIS_URL").expect("REDIS_URL must be set");
    RedisSessionStore::new(&url, ttl_seconds)
        .await
        .expect("Failed to connect to Redis")
}

/// Session id unique to one test run
fn session_id() -> String {
    Uuid::new_v4().to_string()
}

#[tokio::test]
#[ignore]
async fn test_value_is_consumed_once() {
    let store = store(60).await;
    let sid = session_id();

    store.set_once(&sid, "create", "Book added successfully!").await.unwrap();
    assert_eq!(
        store.get(&sid, "create").await.unwrap().as_deref(),
        Some("Book added successfully!")
    );
    assert_eq!(
        store.consume(&sid, "create").await.unwrap().as_deref(),
        Some("Book added successfully!")
    );
    assert_eq!(store.consume(&sid, "create").await.unwrap(), None);
    assert_eq!(store.get(&sid, "create").await.unwrap(), None);
}

#[tokio::test]
#[ignore]
async fn test_sessions_do_not_share_values() {
    let store = store(60).await;
    let (alice, bob) = (session_id(), session_id());

    store.set_once(&alice, "delete", "Book deleted successfully!").await.unwrap();
    assert_eq!(store.consume(&bob, "delete").await.unwrap(), None);
    assert!(store.consume(&alice, "delete").await.unwrap().is_some());
}

#[tokio::test]
#[ignore]
async fn test_unread_value_expires() {
    let store = store(1).await;
    let sid = session_id();

    store.set_once(&sid, "update", "Book updated successfully!").await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(2100)).await;
    assert_eq!(store.consume(&sid, "update").await.unwrap(), None);
}

#[tokio::test]
async fn test_unreachable_server_is_a_session_error() {
    // Nothing listens on port 1
    let result = RedisSessionStore::new("redis://127.0.0.1:1", 60).await;
    assert!(matches!(result, Err(bookshelf_server::AppError::Session(_))));
}
