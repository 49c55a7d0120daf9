//! List filtering, free-text search and allow-listed ordering.
//!
//! All filters are additive (AND). Sorting is stable, so ties keep the
//! store's insertion order.

use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::models::{BookResponse, PostResponse};

/// Query parameters accepted by the book list endpoint.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct BookQuery {
    /// Exact title match, case-insensitive.
    pub title: Option<String>,
    /// Case-insensitive substring match on the title.
    pub title_contains: Option<String>,
    /// Exact author id.
    pub author: Option<Uuid>,
    pub publication_year: Option<i32>,
    pub publication_year_gte: Option<i32>,
    pub publication_year_lte: Option<i32>,
    /// Free-text search across title and author name.
    pub search: Option<String>,
    /// Sort key from {title, publication_year}; `-` prefix for
    /// descending. Defaults to title ascending.
    pub ordering: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BookSortKey {
    Title,
    PublicationYear,
}

impl BookQuery {
    fn matches(&self, book: &BookResponse) -> bool {
        if let Some(title) = &self.title {
            if !book.title.eq_ignore_ascii_case(title) {
                return false;
            }
        }
        if let Some(fragment) = &self.title_contains {
            if !contains_ignore_case(&book.title, fragment) {
                return false;
            }
        }
        if let Some(author) = self.author {
            if book.author_id != author {
                return false;
            }
        }
        if let Some(year) = self.publication_year {
            if book.publication_year != year {
                return false;
            }
        }
        if let Some(year) = self.publication_year_gte {
            if book.publication_year < year {
                return false;
            }
        }
        if let Some(year) = self.publication_year_lte {
            if book.publication_year > year {
                return false;
            }
        }
        if let Some(needle) = &self.search {
            if !contains_ignore_case(&book.title, needle)
                && !contains_ignore_case(&book.author, needle)
            {
                return false;
            }
        }
        true
    }

    fn sort_key(&self) -> Result<(BookSortKey, bool)> {
        let Some(ordering) = &self.ordering else {
            return Ok((BookSortKey::Title, false));
        };
        let (key, descending) = split_ordering(ordering);
        match key {
            "title" => Ok((BookSortKey::Title, descending)),
            "publication_year" => Ok((BookSortKey::PublicationYear, descending)),
            other => Err(CoreError::validation(
                "ordering",
                format!("unsupported ordering key '{other}'"),
            )),
        }
    }
}

/// Apply a [`BookQuery`] to a listing in insertion order.
pub fn filter_and_sort_books(
    mut books: Vec<BookResponse>,
    query: &BookQuery,
) -> Result<Vec<BookResponse>> {
    let (key, descending) = query.sort_key()?;
    books.retain(|book| query.matches(book));
    // Stable sort with a direction-aware comparator: ties keep the
    // store's insertion order even when descending.
    books.sort_by(|a, b| {
        let ordering = match key {
            BookSortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            BookSortKey::PublicationYear => a.publication_year.cmp(&b.publication_year),
        };
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
    Ok(books)
}

/// Query parameters accepted by the post list endpoint.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct PostQuery {
    /// Free-text search across title, content and tags.
    pub q: Option<String>,
    /// Alias for `q`, kept for API-variant clients.
    pub search: Option<String>,
    /// Exact author (user) id.
    pub author: Option<Uuid>,
    /// Exact tag match, case-insensitive.
    pub tag: Option<String>,
    /// Sort key from {published_date, title}; `-` prefix for
    /// descending. Defaults to newest first.
    pub ordering: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PostSortKey {
    PublishedDate,
    Title,
}

impl PostQuery {
    fn needle(&self) -> Option<&str> {
        self.q.as_deref().or(self.search.as_deref())
    }

    fn matches(&self, post: &PostResponse) -> bool {
        if let Some(needle) = self.needle() {
            let hit = contains_ignore_case(&post.title, needle)
                || contains_ignore_case(&post.content, needle)
                || post.tags.iter().any(|tag| contains_ignore_case(tag, needle));
            if !hit {
                return false;
            }
        }
        if let Some(author) = self.author {
            if post.author_id != author {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if !post.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                return false;
            }
        }
        true
    }

    fn sort_key(&self) -> Result<(PostSortKey, bool)> {
        let Some(ordering) = &self.ordering else {
            // Newest posts first.
            return Ok((PostSortKey::PublishedDate, true));
        };
        let (key, descending) = split_ordering(ordering);
        match key {
            "published_date" => Ok((PostSortKey::PublishedDate, descending)),
            "title" => Ok((PostSortKey::Title, descending)),
            other => Err(CoreError::validation(
                "ordering",
                format!("unsupported ordering key '{other}'"),
            )),
        }
    }
}

/// Apply a [`PostQuery`] to a listing in insertion order.
pub fn filter_and_sort_posts(
    mut posts: Vec<PostResponse>,
    query: &PostQuery,
) -> Result<Vec<PostResponse>> {
    let (key, descending) = query.sort_key()?;
    posts.retain(|post| query.matches(post));
    posts.sort_by(|a, b| {
        let ordering = match key {
            PostSortKey::PublishedDate => a.published_date.cmp(&b.published_date),
            PostSortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        };
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
    Ok(posts)
}

fn split_ordering(ordering: &str) -> (&str, bool) {
    match ordering.strip_prefix('-') {
        Some(key) => (key, true),
        None => (ordering, false),
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(title: &str, year: i32, author: &str) -> BookResponse {
        BookResponse {
            id: Uuid::new_v4(),
            title: title.to_string(),
            publication_year: year,
            author_id: Uuid::new_v4(),
            author: author.to_string(),
        }
    }

    fn classics() -> Vec<BookResponse> {
        vec![
            book("Pride and Prejudice", 1813, "Jane Austen"),
            book("Nineteen Eighty-Four", 1949, "George Orwell"),
            book("Animal Farm", 1945, "George Orwell"),
            book("Sense and Sensibility", 1811, "Jane Austen"),
        ]
    }

    #[test]
    fn year_range_filter() {
        let query = BookQuery {
            publication_year_gte: Some(1900),
            ..Default::default()
        };
        let result = filter_and_sort_books(classics(), &query).unwrap();
        let years: Vec<i32> = result.iter().map(|b| b.publication_year).collect();
        assert_eq!(years, vec![1945, 1949]);
    }

    #[test]
    fn filters_are_additive() {
        let query = BookQuery {
            publication_year_gte: Some(1900),
            title_contains: Some("farm".to_string()),
            ..Default::default()
        };
        let result = filter_and_sort_books(classics(), &query).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "Animal Farm");
    }

    #[test]
    fn default_ordering_is_title_ascending() {
        let result = filter_and_sort_books(classics(), &BookQuery::default()).unwrap();
        assert_eq!(result[0].title, "Animal Farm");
        assert_eq!(result[3].title, "Sense and Sensibility");
    }

    #[test]
    fn descending_year_ordering() {
        let query = BookQuery {
            ordering: Some("-publication_year".to_string()),
            ..Default::default()
        };
        let result = filter_and_sort_books(classics(), &query).unwrap();
        let years: Vec<i32> = result.iter().map(|b| b.publication_year).collect();
        assert_eq!(years, vec![1949, 1945, 1813, 1811]);
    }

    #[test]
    fn unknown_ordering_key_is_a_validation_error() {
        let query = BookQuery {
            ordering: Some("isbn".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            filter_and_sort_books(classics(), &query),
            Err(CoreError::Validation {
                field: "ordering",
                ..
            })
        ));
    }

    #[test]
    fn search_spans_title_and_author() {
        let query = BookQuery {
            search: Some("orwell".to_string()),
            ..Default::default()
        };
        let result = filter_and_sort_books(classics(), &query).unwrap();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let first = book("Duplicate", 2000, "A");
        let second = book("Duplicate", 2001, "B");
        let ids = (first.id, second.id);
        let result =
            filter_and_sort_books(vec![first, second], &BookQuery::default()).unwrap();
        assert_eq!((result[0].id, result[1].id), ids);
    }

    fn post(title: &str, content: &str, tags: &[&str]) -> PostResponse {
        PostResponse {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: content.to_string(),
            author_id: Uuid::new_v4(),
            author: "poster".to_string(),
            published_date: chrono::Utc::now(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn post_search_spans_tags() {
        let posts = vec![
            post("Hello", "first", &["intro"]),
            post("Second", "body", &["rust", "axum"]),
        ];
        let query = PostQuery {
            q: Some("rust".to_string()),
            ..Default::default()
        };
        let result = filter_and_sort_posts(posts, &query).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "Second");
    }

    #[test]
    fn posts_default_to_newest_first() {
        let mut older = post("Old", "x", &[]);
        older.published_date = chrono::Utc::now() - chrono::Duration::days(2);
        let newer = post("New", "y", &[]);
        let result = filter_and_sort_posts(vec![older, newer], &PostQuery::default()).unwrap();
        assert_eq!(result[0].title, "New");
        assert_eq!(result[1].title, "Old");
    }
}
