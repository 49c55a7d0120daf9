//! Per-request policy evaluation.
//!
//! Every handler calls [`authorize`] (or builds an owner guard with
//! [`owner_guard`]) before touching a store, so the whole service runs
//! off one policy table instead of per-view checks.

use tracing::warn;
use uuid::Uuid;

use stacks_core::error::Result;
use stacks_core::models::Identity;
use stacks_core::policy::{Action, ResourceKind};

use crate::api::auth::MaybeUser;
use crate::api::error::AppError;
use crate::app_state::AppState;

/// Evaluate the access policy for operations whose rule does not
/// depend on the target entity (everything except Owner rules).
pub fn authorize(
    state: &AppState,
    user: &MaybeUser,
    resource: ResourceKind,
    action: Action,
) -> std::result::Result<(), AppError> {
    let identity = user.identity();
    state
        .policy
        .authorize(identity.as_ref(), resource, action, None)
        .map_err(|e| {
            warn!(
                "Access denied: {} {} for {}",
                resource.as_str(),
                action.as_str(),
                describe_caller(&identity)
            );
            AppError::from(e)
        })
}

/// Guard closure for owner-gated mutations; the store runs it against
/// the stored entity inside its write lock.
pub fn owner_guard(
    state: &AppState,
    user: &MaybeUser,
    resource: ResourceKind,
    action: Action,
) -> impl FnOnce(Option<Uuid>) -> Result<()> {
    let policy = state.policy.clone();
    let identity = user.identity();
    move |owner| {
        policy
            .authorize(identity.as_ref(), resource, action, owner)
            .inspect_err(|_| {
                warn!(
                    "Access denied: {} {} for {}",
                    resource.as_str(),
                    action.as_str(),
                    describe_caller(&identity)
                );
            })
    }
}

fn describe_caller(identity: &Option<Identity>) -> String {
    match identity {
        Some(identity) => format!("user {} ({})", identity.user_id, identity.role.as_str()),
        None => "anonymous caller".to_string(),
    }
}
