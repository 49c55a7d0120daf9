use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{ToResponse, ToSchema};
use uuid::Uuid;

use crate::error::{CoreError, Result};

/// A catalogued book. `author_id` is a foreign reference to an
/// [`super::Author`]; it carries no ownership semantics.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, ToResponse)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub publication_year: i32,
    pub author_id: Uuid,
}

/// Write payload for creating or fully replacing a book.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookRequest {
    pub title: String,
    pub publication_year: i32,
    pub author_id: Uuid,
}

impl BookRequest {
    /// Field-level validation. Referential checks against the author
    /// table happen inside the catalog store, under its lock.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(CoreError::validation("title", "title must not be empty"));
        }
        validate_publication_year(self.publication_year)?;
        Ok(())
    }
}

/// Partial-update payload; absent fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct BookPatch {
    pub title: Option<String>,
    pub publication_year: Option<i32>,
    pub author_id: Option<Uuid>,
}

impl BookPatch {
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(CoreError::validation("title", "title must not be empty"));
            }
        }
        if let Some(year) = self.publication_year {
            validate_publication_year(year)?;
        }
        Ok(())
    }
}

/// Read payload: the book plus its resolved author name.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, ToResponse)]
pub struct BookResponse {
    pub id: Uuid,
    pub title: String,
    pub publication_year: i32,
    pub author_id: Uuid,
    pub author: String,
}

impl BookResponse {
    pub fn new(book: Book, author: String) -> Self {
        BookResponse {
            id: book.id,
            title: book.title,
            publication_year: book.publication_year,
            author_id: book.author_id,
            author,
        }
    }
}

pub fn current_year() -> i32 {
    Utc::now().year()
}

/// Publication year may not lie in the future.
pub fn validate_publication_year(year: i32) -> Result<()> {
    if year > current_year() {
        return Err(CoreError::validation(
            "publication_year",
            "publication year cannot be in the future",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn future_publication_year_is_rejected() {
        let err = validate_publication_year(current_year() + 1).unwrap_err();
        match err {
            CoreError::Validation { field, .. } => assert_eq!(field, "publication_year"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn current_and_past_years_are_accepted() {
        assert!(validate_publication_year(current_year()).is_ok());
        assert!(validate_publication_year(1813).is_ok());
    }

    #[test]
    fn empty_title_is_rejected() {
        let request = BookRequest {
            title: "   ".to_string(),
            publication_year: 2020,
            author_id: Uuid::new_v4(),
        };
        assert!(matches!(
            request.validate(),
            Err(CoreError::Validation { field: "title", .. })
        ));
    }
}
