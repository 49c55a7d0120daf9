//! Declarative authorization policy.
//!
//! All role and ownership checks that gate mutating operations live in
//! one table: a mapping from (resource kind, action) to a rule. Every
//! request handler asks this component exactly once, before touching an
//! entity store. On denial the store is guaranteed unchanged.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::models::{Identity, Role};

/// CRUD operations the policy distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    List,
    Retrieve,
    Create,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::List => "list",
            Action::Retrieve => "retrieve",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

/// Entity kinds the policy knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Author,
    Book,
    Library,
    Post,
    Comment,
    User,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Author => "author",
            ResourceKind::Book => "book",
            ResourceKind::Library => "library",
            ResourceKind::Post => "post",
            ResourceKind::Comment => "comment",
            ResourceKind::User => "user",
        }
    }
}

/// Authorization rule attached to a (resource, action) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Anyone, including anonymous callers.
    Public,
    /// Any logged-in identity.
    Authenticated,
    /// A logged-in identity whose role satisfies the requirement.
    Role(Role),
    /// The entity's recorded author. Admins pass as a moderation
    /// override.
    Owner,
}

/// The policy table. Built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    rules: HashMap<(ResourceKind, Action), Rule>,
}

impl AccessPolicy {
    /// The default table. With `public_catalog_reads` set to false the
    /// catalog read endpoints (Author/Book/Library list and retrieve)
    /// require a logged-in identity instead of being public.
    pub fn new(public_catalog_reads: bool) -> Self {
        use Action::*;
        use ResourceKind::*;

        let read_rule = if public_catalog_reads {
            Rule::Public
        } else {
            Rule::Authenticated
        };

        let mut rules = HashMap::new();

        for resource in [Author, Book, Library] {
            rules.insert((resource, List), read_rule);
            rules.insert((resource, Retrieve), read_rule);
        }
        rules.insert((Author, Create), Rule::Role(Role::Librarian));
        rules.insert((Author, Update), Rule::Role(Role::Librarian));
        rules.insert((Author, Delete), Rule::Role(Role::Librarian));

        rules.insert((Book, Create), Rule::Authenticated);
        rules.insert((Book, Update), Rule::Role(Role::Librarian));
        rules.insert((Book, Delete), Rule::Role(Role::Librarian));

        rules.insert((Library, Create), Rule::Role(Role::Librarian));
        rules.insert((Library, Update), Rule::Role(Role::Librarian));
        rules.insert((Library, Delete), Rule::Role(Role::Admin));

        for resource in [Post, Comment] {
            rules.insert((resource, List), Rule::Public);
            rules.insert((resource, Retrieve), Rule::Public);
            rules.insert((resource, Create), Rule::Authenticated);
            rules.insert((resource, Update), Rule::Owner);
            rules.insert((resource, Delete), Rule::Owner);
        }

        rules.insert((User, List), Rule::Role(Role::Admin));
        rules.insert((User, Update), Rule::Role(Role::Admin));

        AccessPolicy { rules }
    }

    /// The rule for a (resource, action) pair. Pairs not present in the
    /// table fall back to requiring authentication.
    pub fn rule_for(&self, resource: ResourceKind, action: Action) -> Rule {
        self.rules
            .get(&(resource, action))
            .copied()
            .unwrap_or(Rule::Authenticated)
    }

    /// Evaluate the policy for one request.
    ///
    /// `owner` is the target entity's recorded author, where the entity
    /// has one. Anonymous callers failing a non-public rule get
    /// [`CoreError::Unauthorized`]; authenticated callers failing a
    /// role or ownership requirement get [`CoreError::Forbidden`].
    pub fn authorize(
        &self,
        identity: Option<&Identity>,
        resource: ResourceKind,
        action: Action,
        owner: Option<Uuid>,
    ) -> Result<()> {
        let rule = self.rule_for(resource, action);

        if rule == Rule::Public {
            return Ok(());
        }

        let identity = identity.ok_or(CoreError::Unauthorized)?;

        match rule {
            Rule::Public | Rule::Authenticated => Ok(()),
            Rule::Role(required) => {
                if identity.role.satisfies(required) {
                    Ok(())
                } else {
                    Err(CoreError::Forbidden(format!(
                        "{} requires the {} role",
                        describe(resource, action),
                        required.as_str()
                    )))
                }
            }
            Rule::Owner => {
                if identity.role == Role::Admin || owner == Some(identity.user_id) {
                    Ok(())
                } else {
                    Err(CoreError::Forbidden(format!(
                        "{} is restricted to the {} author",
                        describe(resource, action),
                        resource.as_str()
                    )))
                }
            }
        }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        AccessPolicy::new(true)
    }
}

fn describe(resource: ResourceKind, action: Action) -> String {
    format!("{} {}", resource.as_str(), action.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: Role) -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            role,
        }
    }

    #[test]
    fn anonymous_reads_are_public_by_default() {
        let policy = AccessPolicy::default();
        assert!(policy
            .authorize(None, ResourceKind::Book, Action::List, None)
            .is_ok());
        assert!(policy
            .authorize(None, ResourceKind::Post, Action::Retrieve, None)
            .is_ok());
    }

    #[test]
    fn catalog_reads_can_require_authentication() {
        let policy = AccessPolicy::new(false);
        assert_eq!(
            policy.authorize(None, ResourceKind::Book, Action::List, None),
            Err(CoreError::Unauthorized)
        );
        // Blog reads stay public either way.
        assert!(policy
            .authorize(None, ResourceKind::Post, Action::List, None)
            .is_ok());
        let member = identity(Role::Member);
        assert!(policy
            .authorize(Some(&member), ResourceKind::Book, Action::List, None)
            .is_ok());
    }

    #[test]
    fn anonymous_writes_are_unauthorized() {
        let policy = AccessPolicy::default();
        assert_eq!(
            policy.authorize(None, ResourceKind::Book, Action::Create, None),
            Err(CoreError::Unauthorized)
        );
        assert_eq!(
            policy.authorize(None, ResourceKind::Post, Action::Delete, Some(Uuid::new_v4())),
            Err(CoreError::Unauthorized)
        );
    }

    #[test]
    fn book_mutations_follow_the_role_scheme() {
        let policy = AccessPolicy::default();
        let member = identity(Role::Member);
        let librarian = identity(Role::Librarian);

        assert!(policy
            .authorize(Some(&member), ResourceKind::Book, Action::Create, None)
            .is_ok());
        assert!(matches!(
            policy.authorize(Some(&member), ResourceKind::Book, Action::Update, None),
            Err(CoreError::Forbidden(_))
        ));
        assert!(policy
            .authorize(Some(&librarian), ResourceKind::Book, Action::Update, None)
            .is_ok());
    }

    #[test]
    fn post_mutations_follow_the_ownership_scheme() {
        let policy = AccessPolicy::default();
        let owner = identity(Role::Member);
        let other = identity(Role::Member);
        let admin = identity(Role::Admin);

        assert!(policy
            .authorize(
                Some(&owner),
                ResourceKind::Post,
                Action::Update,
                Some(owner.user_id)
            )
            .is_ok());
        assert!(matches!(
            policy.authorize(
                Some(&other),
                ResourceKind::Post,
                Action::Update,
                Some(owner.user_id)
            ),
            Err(CoreError::Forbidden(_))
        ));
        // Admins override ownership for moderation.
        assert!(policy
            .authorize(
                Some(&admin),
                ResourceKind::Post,
                Action::Delete,
                Some(owner.user_id)
            )
            .is_ok());
    }

    #[test]
    fn library_delete_requires_admin() {
        let policy = AccessPolicy::default();
        let librarian = identity(Role::Librarian);
        assert!(matches!(
            policy.authorize(Some(&librarian), ResourceKind::Library, Action::Delete, None),
            Err(CoreError::Forbidden(_))
        ));
    }

    #[test]
    fn user_administration_requires_admin() {
        let policy = AccessPolicy::default();
        let librarian = identity(Role::Librarian);
        let admin = identity(Role::Admin);
        assert!(matches!(
            policy.authorize(Some(&librarian), ResourceKind::User, Action::List, None),
            Err(CoreError::Forbidden(_))
        ));
        assert!(policy
            .authorize(Some(&admin), ResourceKind::User, Action::Update, None)
            .is_ok());
    }
}
