//! Redis-backed session store for one-shot notices

use async_trait::async_trait;
use redis::{AsyncCommands, Client};

use super::session::SessionStore;
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct RedisSessionStore {
    client: Client,
    ttl_seconds: u64,
}

impl RedisSessionStore {
    /// Create a new Redis store and check that the server answers
    pub async fn new(url: &str, ttl_seconds: u64) -> AppResult<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Session(format!("Failed to create Redis client: {}", e)))?;

        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Session(format!("Failed to connect to Redis: {}", e)))?;

        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| AppError::Session(format!("Redis connection test failed: {}", e)))?;

        Ok(Self { client, ttl_seconds })
    }

    async fn connection(&self) -> AppResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Session(format!("Failed to get Redis connection: {}", e)))
    }

    fn key(session_id: &str, key: &str) -> String {
        format!("session:{}:{}", session_id, key)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, session_id: &str, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.connection().await?;
        conn.get(Self::key(session_id, key))
            .await
            .map_err(|e| AppError::Session(format!("Failed to read session value: {}", e)))
    }

    async fn set_once(&self, session_id: &str, key: &str, value: &str) -> AppResult<()> {
        let mut conn = self.connection().await?;
        conn.set_ex::<_, _, ()>(Self::key(session_id, key), value, self.ttl_seconds)
            .await
            .map_err(|e| AppError::Session(format!("Failed to store session value: {}", e)))
    }

    async fn consume(&self, session_id: &str, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.connection().await?;
        // GETDEL reads and removes in one step, so a notice is never shown twice
        redis::cmd("GETDEL")
            .arg(Self::key(session_id, key))
            .query_async::<_, Option<String>>(&mut conn)
            .await
            .map_err(|e| AppError::Session(format!("Failed to consume session value: {}", e)))
    }
}
