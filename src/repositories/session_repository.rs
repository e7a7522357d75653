use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    errors::{AppError, AppResult},
    models::domain::Session,
};

/// Ordered id→Session store plus the id of the active session.
///
/// Reads hand out snapshots and writes replace whole sessions, so a caller never
/// observes a half-applied transition.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Stores a new session at the front of the list.
    async fn insert(&self, session: Session) -> AppResult<Session>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Session>>;
    /// Most-recent-first.
    async fn list(&self) -> AppResult<Vec<Session>>;
    async fn update(&self, session: Session) -> AppResult<Session>;
    /// Returns `false` when no such session existed. Removing the active
    /// session clears the active pointer.
    async fn delete(&self, id: &str) -> AppResult<bool>;
    async fn active_id(&self) -> AppResult<Option<String>>;
    async fn set_active(&self, id: Option<&str>) -> AppResult<()>;
}

#[derive(Default)]
struct Store {
    order: Vec<String>,
    sessions: HashMap<String, Session>,
    active: Option<String>,
}

#[derive(Default)]
pub struct InMemorySessionRepository {
    store: RwLock<Store>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn insert(&self, session: Session) -> AppResult<Session> {
        let mut store = self.store.write().await;
        if store.sessions.contains_key(session.id()) {
            return Err(AppError::AlreadyExists(format!(
                "Session with id '{}' already exists",
                session.id()
            )));
        }

        store.order.insert(0, session.id().to_string());
        store.sessions.insert(session.id().to_string(), session.clone());
        Ok(session)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Session>> {
        let store = self.store.read().await;
        Ok(store.sessions.get(id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Session>> {
        let store = self.store.read().await;
        Ok(store
            .order
            .iter()
            .filter_map(|id| store.sessions.get(id).cloned())
            .collect())
    }

    async fn update(&self, session: Session) -> AppResult<Session> {
        let mut store = self.store.write().await;
        let slot = store.sessions.get_mut(session.id()).ok_or_else(|| {
            AppError::NotFound(format!("Session with id '{}' not found", session.id()))
        })?;

        *slot = session.clone();
        Ok(session)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let mut store = self.store.write().await;
        if store.sessions.remove(id).is_none() {
            return Ok(false);
        }

        store.order.retain(|existing| existing != id);
        if store.active.as_deref() == Some(id) {
            store.active = None;
        }
        Ok(true)
    }

    async fn active_id(&self) -> AppResult<Option<String>> {
        let store = self.store.read().await;
        Ok(store.active.clone())
    }

    async fn set_active(&self, id: Option<&str>) -> AppResult<()> {
        let mut store = self.store.write().await;
        if let Some(id) = id {
            if !store.sessions.contains_key(id) {
                return Err(AppError::NotFound(format!("Session with id '{}' not found", id)));
            }
        }

        store.active = id.map(str::to_string);
        Ok(())
    }
}
