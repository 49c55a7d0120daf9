use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{ToResponse, ToSchema};
use uuid::Uuid;

use crate::error::{CoreError, Result};

/// Role assigned to a user profile.
///
/// Roles form a lattice: Admin satisfies every requirement, Librarian
/// satisfies Librarian and Member, Member only Member.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Librarian,
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Librarian => "librarian",
            Role::Member => "member",
        }
    }

    /// Parse from a client-supplied string; `None` for unknown values.
    pub fn parse(s: &str) -> Option<Role> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "librarian" => Some(Role::Librarian),
            "member" => Some(Role::Member),
            _ => None,
        }
    }

    /// Whether this role meets the given requirement.
    pub fn satisfies(&self, required: Role) -> bool {
        match self {
            Role::Admin => true,
            Role::Librarian => required != Role::Admin,
            Role::Member => required == Role::Member,
        }
    }
}

/// A registered account. The password is stored as a bcrypt hash and
/// never serialized back to clients.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.id,
            role: self.role,
        }
    }
}

/// The acting identity the access policy evaluates: who is asking, and
/// with which role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Role,
}

/// Client-visible projection of a user record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, ToResponse)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub role: Role,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            role: user.role,
        }
    }
}

/// Profile update payload for the logged-in user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl ProfileUpdate {
    pub fn validate(&self) -> Result<()> {
        if let Some(email) = &self.email {
            if email.trim().is_empty() {
                return Err(CoreError::validation("email", "email must not be empty"));
            }
        }
        Ok(())
    }
}
