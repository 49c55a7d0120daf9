//! Account management: registration, login and the bootstrapped admin.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use stacks_core::error::{CoreError, Result};
use stacks_core::models::{Role, User, UserResponse};
use stacks_core::store::UserDirectory;

use crate::services::SessionService;
use crate::settings::config::Settings;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login/register response: the session token plus the user it belongs
/// to.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, utoipa::ToResponse)]
pub struct SessionResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Registers a new Member account and logs it in immediately.
pub async fn register(
    users: &UserDirectory,
    sessions: &SessionService,
    request: RegisterRequest,
) -> Result<SessionResponse> {
    if request.username.trim().is_empty() {
        return Err(CoreError::validation("username", "username must not be empty"));
    }
    if request.password.len() < 8 {
        return Err(CoreError::validation(
            "password",
            "password must be at least 8 characters",
        ));
    }

    let user = User {
        id: Uuid::new_v4(),
        username: request.username.trim().to_string(),
        email: request.email,
        display_name: request.username.trim().to_string(),
        password_hash: hash_password(&request.password)?,
        role: Role::Member,
        created_at: Utc::now(),
    };
    let user = users.add_user(user).await?;
    let token = sessions.create(user.id).await;
    info!("Registered new user '{}'", user.username);

    Ok(SessionResponse {
        token,
        user: UserResponse::from(&user),
    })
}

/// Verifies credentials and opens a session. Unknown usernames and
/// wrong passwords are indistinguishable to the caller.
pub async fn login(
    users: &UserDirectory,
    sessions: &SessionService,
    request: LoginRequest,
) -> Result<SessionResponse> {
    let Some(user) = users.find_by_username(&request.username).await else {
        warn!("Login attempt for unknown user '{}'", request.username);
        return Err(CoreError::Unauthorized);
    };

    let verified = bcrypt::verify(&request.password, &user.password_hash)
        .map_err(|e| CoreError::Internal(format!("password verification failed: {e}")))?;
    if !verified {
        warn!("Invalid password for user '{}'", user.username);
        return Err(CoreError::Unauthorized);
    }

    let token = sessions.create(user.id).await;
    Ok(SessionResponse {
        token,
        user: UserResponse::from(&user),
    })
}

/// Creates the admin account configured in settings, if any. A taken
/// username is left alone so restarts are harmless.
pub async fn bootstrap_admin(users: &UserDirectory, settings: &Settings) -> Result<()> {
    let Some(password) = &settings.api.admin_password else {
        return Ok(());
    };
    let username = settings.api.admin_username.clone();
    if users.find_by_username(&username).await.is_some() {
        return Ok(());
    }

    users
        .add_user(User {
            id: Uuid::new_v4(),
            username: username.clone(),
            email: String::new(),
            display_name: username.clone(),
            password_hash: hash_password(password)?,
            role: Role::Admin,
            created_at: Utc::now(),
        })
        .await?;
    info!("Bootstrapped admin account '{}'", username);
    Ok(())
}

fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| CoreError::Internal(format!("password hashing failed: {e}")))
}
