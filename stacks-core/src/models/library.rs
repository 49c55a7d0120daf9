use serde::{Deserialize, Serialize};
use utoipa::{ToResponse, ToSchema};
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::models::book::BookResponse;

/// A library holding a set of books via membership.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, ToResponse)]
pub struct Library {
    pub id: Uuid,
    pub name: String,
    pub book_ids: Vec<Uuid>,
}

/// Write payload for creating or renaming a library.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LibraryRequest {
    pub name: String,
}

impl LibraryRequest {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::validation("name", "name must not be empty"));
        }
        Ok(())
    }
}

/// Library detail with its member books resolved.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, ToResponse)]
pub struct LibraryDetail {
    pub id: Uuid,
    pub name: String,
    pub books: Vec<BookResponse>,
}

impl LibraryDetail {
    pub fn new(library: Library, books: Vec<BookResponse>) -> Self {
        LibraryDetail {
            id: library.id,
            name: library.name,
            books,
        }
    }
}
