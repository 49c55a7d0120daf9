use serde::{Deserialize, Serialize};
use utoipa::{ToResponse, ToSchema};
use uuid::Uuid;

use crate::error::{CoreError, Result};

/// A book author. A plain reference target for books, not an
/// access-control owner.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, ToResponse)]
pub struct Author {
    pub id: Uuid,
    pub name: String,
}

/// Write payload for creating or replacing an author.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthorRequest {
    pub name: String,
}

impl AuthorRequest {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::validation("name", "name must not be empty"));
        }
        Ok(())
    }
}

/// Author detail with the titles of their books, newest additions last.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, ToResponse)]
pub struct AuthorDetail {
    pub id: Uuid,
    pub name: String,
    pub books: Vec<String>,
}

impl AuthorDetail {
    pub fn new(author: Author, books: Vec<String>) -> Self {
        AuthorDetail {
            id: author.id,
            name: author.name,
            books,
        }
    }
}
