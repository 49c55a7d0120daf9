use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::models::{ProfileUpdate, Role, User};

/// Shared store for registered accounts. Usernames are unique,
/// case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Arc<RwLock<Vec<User>>>,
}

impl UserDirectory {
    pub fn new() -> UserDirectory {
        UserDirectory::default()
    }

    pub async fn add_user(&self, user: User) -> Result<User> {
        let mut users = self.users.write().await;
        if users
            .iter()
            .any(|existing| existing.username.eq_ignore_ascii_case(&user.username))
        {
            return Err(CoreError::Conflict(format!(
                "username '{}' is already taken",
                user.username
            )));
        }
        users.push(user.clone());
        Ok(user)
    }

    pub async fn get(&self, id: Uuid) -> Option<User> {
        let users = self.users.read().await;
        users.iter().find(|user| user.id == id).cloned()
    }

    pub async fn find_by_username(&self, username: &str) -> Option<User> {
        let users = self.users.read().await;
        users
            .iter()
            .find(|user| user.username.eq_ignore_ascii_case(username))
            .cloned()
    }

    pub async fn list(&self) -> Vec<User> {
        self.users.read().await.clone()
    }

    pub async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<User> {
        update.validate()?;
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|user| user.id == id)
            .ok_or_else(|| CoreError::NotFound("user", id.to_string()))?;
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(display_name) = update.display_name {
            user.display_name = display_name;
        }
        Ok(user.clone())
    }

    pub async fn set_role(&self, id: Uuid, role: Role) -> Result<User> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|user| user.id == id)
            .ok_or_else(|| CoreError::NotFound("user", id.to_string()))?;
        user.role = role;
        Ok(user.clone())
    }
}
