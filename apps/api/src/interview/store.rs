//! In-memory session registry. One `Session` per connected client, never shared.
//!
//! Sessions idle for longer than the store's TTL are evicted, either on the
//! next `create` or by the background sweeper.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::session::Session;

pub const DEFAULT_SESSION_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

/// A registered session. Callers hold `session`'s lock for the whole of an
/// operation, so operations on the same session never interleave.
pub struct SessionHandle {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub session: Mutex<Session>,
    last_active: StdMutex<Instant>,
}

impl SessionHandle {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            session: Mutex::new(Session::new()),
            last_active: StdMutex::new(Instant::now()),
        }
    }

    fn touch(&self) {
        *self.last_active.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    fn idle_for(&self) -> Duration {
        self.last_active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .elapsed()
    }
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<SessionHandle>>>>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_ttl(DEFAULT_SESSION_IDLE_TTL)
    }
}

impl SessionStore {
    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl,
        }
    }

    pub async fn create(&self) -> Arc<SessionHandle> {
        self.evict_idle().await;

        let handle = Arc::new(SessionHandle::new());
        let total = {
            let mut sessions = self.sessions.write().await;
            sessions.insert(handle.id, handle.clone());
            sessions.len()
        };
        info!("Session {} created ({} active)", handle.id, total);
        handle
    }

    /// Looks up a session and marks it active.
    pub async fn get(&self, id: Uuid) -> Result<Arc<SessionHandle>, AppError> {
        let handle = self
            .sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        handle.touch();
        Ok(handle)
    }

    /// Drops every session idle for at least the TTL. A session whose handle
    /// is still held elsewhere (an operation in flight) is kept.
    pub async fn evict_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, handle| {
            Arc::strong_count(handle) > 1 || handle.idle_for() < self.idle_ttl
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!(
                "Evicted {} idle session(s) ({} active)",
                evicted,
                sessions.len()
            );
        }
        evicted
    }

    /// Runs `evict_idle` every `period` until the returned task is aborted.
    pub fn spawn_sweeper(&self, period: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                store.evict_idle().await;
            }
        })
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| info!("Session {id} removed"))
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::session::Stage;

    #[tokio::test]
    async fn test_create_then_get_returns_same_handle() {
        let store = SessionStore::default();
        let handle = store.create().await;

        let fetched = store.get(handle.id).await.unwrap();
        assert!(Arc::ptr_eq(&handle, &fetched));
        assert_eq!(fetched.session.lock().await.stage(), Stage::Idle);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::default();
        let a = store.create().await;
        let b = store.create().await;
        assert_ne!(a.id, b.id);
        assert_eq!(store.len().await, 2);

        a.session.lock().await.push_candidate("only in a".to_string());
        assert!(b.session.lock().await.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let store = SessionStore::default();
        let err = store.get(Uuid::new_v4()).await.err().unwrap();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_session_evicted_on_next_create() {
        let store = SessionStore::with_idle_ttl(Duration::from_secs(60));
        let stale = store.create().await.id;

        tokio::time::advance(Duration::from_secs(61)).await;
        let fresh = store.create().await.id;

        assert!(matches!(store.get(stale).await, Err(AppError::NotFound(_))));
        assert!(store.get(fresh).await.is_ok());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_keeps_session_alive() {
        let store = SessionStore::with_idle_ttl(Duration::from_secs(60));
        let id = store.create().await.id;

        tokio::time::advance(Duration::from_secs(45)).await;
        store.get(id).await.unwrap();
        tokio::time::advance(Duration::from_secs(45)).await;

        assert_eq!(store.evict_idle().await, 0);
        assert!(store.get(id).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_in_use_is_not_evicted() {
        let store = SessionStore::with_idle_ttl(Duration::from_secs(60));
        let held = store.create().await;

        tokio::time::advance(Duration::from_secs(120)).await;
        assert_eq!(store.evict_idle().await, 0);

        let id = held.id;
        drop(held);
        assert_eq!(store.evict_idle().await, 1);
        assert!(store.get(id).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_evicts_in_background() {
        let store = SessionStore::with_idle_ttl(Duration::from_secs(60));
        let id = store.create().await.id;
        let sweeper = store.spawn_sweeper(Duration::from_secs(10));

        tokio::time::sleep(Duration::from_secs(75)).await;

        assert_eq!(store.len().await, 0);
        assert!(store.get(id).await.is_err());
        sweeper.abort();
    }

    #[tokio::test]
    async fn test_remove_discards_session() {
        let store = SessionStore::default();
        let handle = store.create().await;

        store.remove(handle.id).await.unwrap();
        assert!(store.get(handle.id).await.is_err());
        assert!(store.remove(handle.id).await.is_err());
        assert_eq!(store.len().await, 0);
    }
}
