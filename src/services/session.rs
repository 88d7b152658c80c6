//! Per-request session context carrying one-shot notices

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::AppResult;

/// Key-value storage partitioned by session id
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, session_id: &str, key: &str) -> AppResult<Option<String>>;

    /// Store a value meant to be read exactly once
    async fn set_once(&self, session_id: &str, key: &str, value: &str) -> AppResult<()>;

    /// Read and remove a value
    async fn consume(&self, session_id: &str, key: &str) -> AppResult<Option<String>>;
}

/// Session store living in process memory. Entries expire after `ttl`.
pub struct MemorySessionStore {
    values: RwLock<HashMap<(String, String), (String, Instant)>>,
    ttl: Duration,
}

impl MemorySessionStore {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

    pub fn new() -> Self {
        Self::with_ttl(Self::DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    fn entry_key(session_id: &str, key: &str) -> (String, String) {
        (session_id.to_string(), key.to_string())
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, session_id: &str, key: &str) -> AppResult<Option<String>> {
        let values = self.values.read().await;
        let now = Instant::now();
        Ok(values
            .get(&Self::entry_key(session_id, key))
            .filter(|(_, expires)| *expires > now)
            .map(|(value, _)| value.clone()))
    }

    async fn set_once(&self, session_id: &str, key: &str, value: &str) -> AppResult<()> {
        let mut values = self.values.write().await;
        let now = Instant::now();
        // Purge expired entries of every session, not just this one
        values.retain(|_, (_, expires)| *expires > now);
        values.insert(
            Self::entry_key(session_id, key),
            (value.to_string(), now + self.ttl),
        );
        Ok(())
    }

    async fn consume(&self, session_id: &str, key: &str) -> AppResult<Option<String>> {
        let mut values = self.values.write().await;
        let now = Instant::now();
        Ok(values
            .remove(&Self::entry_key(session_id, key))
            .filter(|(_, expires)| *expires > now)
            .map(|(value, _)| value))
    }
}

/// Confirmation shown once after a mutating action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Create,
    Update,
    Delete,
}

impl NoticeKind {
    pub const ALL: [NoticeKind; 3] = [NoticeKind::Create, NoticeKind::Update, NoticeKind::Delete];

    pub fn key(&self) -> &'static str {
        match self {
            NoticeKind::Create => "create",
            NoticeKind::Update => "update",
            NoticeKind::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// Session store bound to the session of one request
#[derive(Clone)]
pub struct Session {
    id: String,
    store: Arc<dyn SessionStore>,
}

impl Session {
    pub fn new(id: impl Into<String>, store: Arc<dyn SessionStore>) -> Self {
        Self { id: id.into(), store }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.store.get(&self.id, key).await
    }

    pub async fn set_once(&self, key: &str, value: &str) -> AppResult<()> {
        self.store.set_once(&self.id, key, value).await
    }

    pub async fn consume(&self, key: &str) -> AppResult<Option<String>> {
        self.store.consume(&self.id, key).await
    }

    pub async fn set_notice(&self, kind: NoticeKind, message: &str) -> AppResult<()> {
        self.set_once(kind.key(), message).await
    }

    /// Pending notices in create, update, delete order; each is removed as it is read
    pub async fn take_notices(&self) -> AppResult<Vec<Notice>> {
        let mut notices = Vec::new();
        for kind in NoticeKind::ALL {
            if let Some(message) = self.consume(kind.key()).await? {
                notices.push(Notice { kind, message });
            }
        }
        Ok(notices)
    }
}

/// Opens sessions from the session cookie, issuing a new id when absent
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    cookie_name: String,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, cookie_name: impl Into<String>) -> Self {
        Self {
            store,
            cookie_name: cookie_name.into(),
        }
    }

    /// Session for this request, and the jar to send back with the response
    pub fn open(&self, jar: CookieJar) -> (CookieJar, Session) {
        if let Some(cookie) = jar.get(&self.cookie_name) {
            if Uuid::parse_str(cookie.value()).is_ok() {
                let session = Session::new(cookie.value(), self.store.clone());
                return (jar, session);
            }
        }

        let id = Uuid::new_v4().to_string();
        let cookie = Cookie::build((self.cookie_name.clone(), id.clone()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax);
        (jar.add(cookie), Session::new(id, self.store.clone()))
    }
}
