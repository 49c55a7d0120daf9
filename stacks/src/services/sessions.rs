use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;
use uuid::Uuid;

/// Opaque bearer-token session store: token → user id.
///
/// Tokens are random UUIDs handed out by login/register and revoked on
/// logout. No expiry; a restart drops all sessions with the rest of
/// the in-memory state.
#[derive(Debug, Clone, Default)]
pub struct SessionService {
    sessions: Arc<RwLock<HashMap<String, Uuid>>>,
}

impl SessionService {
    pub fn new() -> SessionService {
        SessionService::default()
    }

    pub async fn create(&self, user_id: Uuid) -> String {
        let token = Uuid::new_v4().to_string();
        self.sessions.write().await.insert(token.clone(), user_id);
        token
    }

    pub async fn resolve(&self, token: &str) -> Option<Uuid> {
        self.sessions.read().await.get(token).copied()
    }

    pub async fn revoke(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }
}
