use axum::{
    extract::{Request, State},
    http::{self, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};
use uuid::Uuid;

use stacks_core::models::{Identity, Role};

use crate::api::error::AppError;
use crate::app_state::SharedAppState;

/// The authenticated caller, resolved from the bearer session token.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
    /// The session token this request authenticated with; logout
    /// revokes it.
    pub token: String,
}

impl CurrentUser {
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.id,
            role: self.role,
        }
    }
}

/// Request extension carrying the caller, if any. Anonymous requests
/// pass through with `None`; the access policy decides whether that is
/// acceptable per operation.
#[derive(Clone, Debug, Default)]
pub struct MaybeUser(pub Option<CurrentUser>);

impl MaybeUser {
    pub fn identity(&self) -> Option<Identity> {
        self.0.as_ref().map(CurrentUser::identity)
    }

    pub fn require(&self) -> Result<&CurrentUser, AppError> {
        self.0.as_ref().ok_or(AppError::Unauthorized)
    }
}

/// Identity middleware.
///
/// A missing Authorization header is not an error here: the request
/// proceeds anonymously and the policy layer rejects it where a login
/// is required. A *present but invalid* token is always a hard 401.
pub async fn auth(
    State(state): State<SharedAppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok());

    let current_user = match auth_header {
        None => {
            debug!("Anonymous request: {} {}", req.method(), req.uri());
            None
        }
        Some(header) => {
            let token = header.strip_prefix("Bearer ").unwrap_or(header);
            match resolve_session(&state, token).await {
                Some(user) => {
                    debug!("User authenticated: {} ({})", user.username, user.role.as_str());
                    Some(user)
                }
                None => {
                    warn!(
                        "Invalid session token | {} {} | user_agent: {:?}",
                        req.method(),
                        req.uri(),
                        req.headers()
                            .get("user-agent")
                            .and_then(|h| h.to_str().ok())
                            .unwrap_or("unknown")
                    );
                    return Err(StatusCode::UNAUTHORIZED);
                }
            }
        }
    };

    req.extensions_mut().insert(MaybeUser(current_user));
    Ok(next.run(req).await)
}

async fn resolve_session(state: &SharedAppState, token: &str) -> Option<CurrentUser> {
    let user_id = state.sessions.resolve(token).await?;
    let user = state.users.get(user_id).await?;
    Some(CurrentUser {
        id: user.id,
        username: user.username,
        role: user.role,
        token: token.to_string(),
    })
}
