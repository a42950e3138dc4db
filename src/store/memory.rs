use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;

use super::SessionStore;
use crate::error::StoreError;
use crate::models::{Session, SessionKey};

/// 进程内会话存储
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionKey, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, key: SessionKey, initial: Session) -> Result<SessionKey, StoreError> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        debug!("创建会话: {}", key);
        sessions.insert(key.clone(), initial);
        Ok(key)
    }

    async fn get(&self, key: &SessionKey) -> Result<Session, StoreError> {
        let sessions = self
            .sessions
            .read()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        sessions
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn update(&self, key: &SessionKey, session: Session) -> Result<(), StoreError> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        match sessions.get_mut(key) {
            Some(slot) => {
                *slot = session;
                Ok(())
            }
            None => Err(StoreError::NotFound(key.to_string())),
        }
    }
}
