use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::models::{
    Author, AuthorRequest, Book, BookPatch, BookRequest, BookResponse, Library, LibraryRequest,
};

#[derive(Debug, Default)]
struct CatalogState {
    authors: Vec<Author>,
    books: Vec<Book>,
    libraries: Vec<Library>,
}

impl CatalogState {
    fn author_name(&self, id: Uuid) -> Option<String> {
        self.authors
            .iter()
            .find(|author| author.id == id)
            .map(|author| author.name.clone())
    }

    fn require_author(&self, id: Uuid) -> Result<()> {
        if self.authors.iter().any(|author| author.id == id) {
            Ok(())
        } else {
            Err(CoreError::validation(
                "author_id",
                format!("no author with id {id}"),
            ))
        }
    }

    fn book_response(&self, book: &Book) -> BookResponse {
        let author = self.author_name(book.author_id).unwrap_or_default();
        BookResponse::new(book.clone(), author)
    }
}

/// Shared store for authors, books and libraries.
///
/// One lock guards all three tables so referential checks (a book's
/// author, a library's members) and the mutation they protect are a
/// single logical step.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    state: Arc<RwLock<CatalogState>>,
}

impl CatalogStore {
    pub fn new() -> CatalogStore {
        CatalogStore::default()
    }

    // Author operations

    pub async fn add_author(&self, request: AuthorRequest) -> Result<Author> {
        request.validate()?;
        let author = Author {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
        };
        self.state.write().await.authors.push(author.clone());
        Ok(author)
    }

    pub async fn list_authors(&self) -> Vec<Author> {
        self.state.read().await.authors.clone()
    }

    pub async fn get_author(&self, id: Uuid) -> Option<Author> {
        let state = self.state.read().await;
        state.authors.iter().find(|author| author.id == id).cloned()
    }

    /// The titles of an author's books, in catalog insertion order.
    pub async fn author_book_titles(&self, id: Uuid) -> Vec<String> {
        let state = self.state.read().await;
        state
            .books
            .iter()
            .filter(|book| book.author_id == id)
            .map(|book| book.title.clone())
            .collect()
    }

    pub async fn update_author(&self, id: Uuid, request: AuthorRequest) -> Result<Author> {
        request.validate()?;
        let mut state = self.state.write().await;
        let author = state
            .authors
            .iter_mut()
            .find(|author| author.id == id)
            .ok_or_else(|| CoreError::NotFound("author", id.to_string()))?;
        author.name = request.name.trim().to_string();
        Ok(author.clone())
    }

    /// Deletes an author and cascades to their books, mirroring a
    /// foreign-key cascade.
    pub async fn remove_author(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.write().await;
        let before = state.authors.len();
        state.authors.retain(|author| author.id != id);
        if state.authors.len() == before {
            return Err(CoreError::NotFound("author", id.to_string()));
        }
        let removed: Vec<Uuid> = state
            .books
            .iter()
            .filter(|book| book.author_id == id)
            .map(|book| book.id)
            .collect();
        state.books.retain(|book| book.author_id != id);
        for library in &mut state.libraries {
            library.book_ids.retain(|book_id| !removed.contains(book_id));
        }
        Ok(())
    }

    // Book operations

    pub async fn add_book(&self, request: BookRequest) -> Result<BookResponse> {
        request.validate()?;
        let mut state = self.state.write().await;
        state.require_author(request.author_id)?;
        let book = Book {
            id: Uuid::new_v4(),
            title: request.title.trim().to_string(),
            publication_year: request.publication_year,
            author_id: request.author_id,
        };
        state.books.push(book.clone());
        Ok(state.book_response(&book))
    }

    #[instrument]
    pub async fn list_books(&self) -> Vec<BookResponse> {
        let state = self.state.read().await;
        state
            .books
            .iter()
            .map(|book| state.book_response(book))
            .collect()
    }

    pub async fn get_book(&self, id: Uuid) -> Option<BookResponse> {
        let state = self.state.read().await;
        state
            .books
            .iter()
            .find(|book| book.id == id)
            .map(|book| state.book_response(book))
    }

    pub async fn update_book(&self, id: Uuid, request: BookRequest) -> Result<BookResponse> {
        request.validate()?;
        let mut state = self.state.write().await;
        state.require_author(request.author_id)?;
        let book = state
            .books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or_else(|| CoreError::NotFound("book", id.to_string()))?;
        book.title = request.title.trim().to_string();
        book.publication_year = request.publication_year;
        book.author_id = request.author_id;
        let book = book.clone();
        Ok(state.book_response(&book))
    }

    pub async fn patch_book(&self, id: Uuid, patch: BookPatch) -> Result<BookResponse> {
        patch.validate()?;
        let mut state = self.state.write().await;
        if let Some(author_id) = patch.author_id {
            state.require_author(author_id)?;
        }
        let book = state
            .books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or_else(|| CoreError::NotFound("book", id.to_string()))?;
        if let Some(title) = patch.title {
            book.title = title.trim().to_string();
        }
        if let Some(year) = patch.publication_year {
            book.publication_year = year;
        }
        if let Some(author_id) = patch.author_id {
            book.author_id = author_id;
        }
        let book = book.clone();
        Ok(state.book_response(&book))
    }

    pub async fn remove_book(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.write().await;
        let before = state.books.len();
        state.books.retain(|book| book.id != id);
        if state.books.len() == before {
            return Err(CoreError::NotFound("book", id.to_string()));
        }
        for library in &mut state.libraries {
            library.book_ids.retain(|book_id| *book_id != id);
        }
        Ok(())
    }

    pub async fn book_count(&self) -> usize {
        self.state.read().await.books.len()
    }

    // Library operations

    pub async fn add_library(&self, request: LibraryRequest) -> Result<Library> {
        request.validate()?;
        let library = Library {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            book_ids: Vec::new(),
        };
        self.state.write().await.libraries.push(library.clone());
        Ok(library)
    }

    pub async fn list_libraries(&self) -> Vec<Library> {
        self.state.read().await.libraries.clone()
    }

    pub async fn get_library(&self, id: Uuid) -> Option<(Library, Vec<BookResponse>)> {
        let state = self.state.read().await;
        let library = state.libraries.iter().find(|library| library.id == id)?;
        let books = library
            .book_ids
            .iter()
            .filter_map(|book_id| {
                state
                    .books
                    .iter()
                    .find(|book| book.id == *book_id)
                    .map(|book| state.book_response(book))
            })
            .collect();
        Some((library.clone(), books))
    }

    pub async fn update_library(&self, id: Uuid, request: LibraryRequest) -> Result<Library> {
        request.validate()?;
        let mut state = self.state.write().await;
        let library = state
            .libraries
            .iter_mut()
            .find(|library| library.id == id)
            .ok_or_else(|| CoreError::NotFound("library", id.to_string()))?;
        library.name = request.name.trim().to_string();
        Ok(library.clone())
    }

    pub async fn remove_library(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.write().await;
        let before = state.libraries.len();
        state.libraries.retain(|library| library.id != id);
        if state.libraries.len() == before {
            return Err(CoreError::NotFound("library", id.to_string()));
        }
        Ok(())
    }

    /// Adds a book to a library's membership. Adding twice is a no-op.
    pub async fn add_library_book(&self, library_id: Uuid, book_id: Uuid) -> Result<Library> {
        let mut state = self.state.write().await;
        if !state.books.iter().any(|book| book.id == book_id) {
            return Err(CoreError::NotFound("book", book_id.to_string()));
        }
        let library = state
            .libraries
            .iter_mut()
            .find(|library| library.id == library_id)
            .ok_or_else(|| CoreError::NotFound("library", library_id.to_string()))?;
        if !library.book_ids.contains(&book_id) {
            library.book_ids.push(book_id);
        }
        Ok(library.clone())
    }

    pub async fn remove_library_book(&self, library_id: Uuid, book_id: Uuid) -> Result<Library> {
        let mut state = self.state.write().await;
        let library = state
            .libraries
            .iter_mut()
            .find(|library| library.id == library_id)
            .ok_or_else(|| CoreError::NotFound("library", library_id.to_string()))?;
        let before = library.book_ids.len();
        library.book_ids.retain(|id| *id != book_id);
        if library.book_ids.len() == before {
            return Err(CoreError::NotFound("book", book_id.to_string()));
        }
        Ok(library.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author_request(name: &str) -> AuthorRequest {
        AuthorRequest {
            name: name.to_string(),
        }
    }

    fn book_request(title: &str, year: i32, author_id: Uuid) -> BookRequest {
        BookRequest {
            title: title.to_string(),
            publication_year: year,
            author_id,
        }
    }

    #[tokio::test]
    async fn book_round_trip() {
        let store = CatalogStore::new();
        let author = store.add_author(author_request("Jane Austen")).await.unwrap();
        let created = store
            .add_book(book_request("Pride and Prejudice", 1813, author.id))
            .await
            .unwrap();

        let fetched = store.get_book(created.id).await.unwrap();
        assert_eq!(fetched.title, "Pride and Prejudice");
        assert_eq!(fetched.publication_year, 1813);
        assert_eq!(fetched.author_id, author.id);
        assert_eq!(fetched.author, "Jane Austen");
    }

    #[tokio::test]
    async fn unknown_author_reference_is_a_field_error() {
        let store = CatalogStore::new();
        let err = store
            .add_book(book_request("Orphan", 2000, Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation {
                field: "author_id",
                ..
            }
        ));
        assert_eq!(store.book_count().await, 0);
    }

    #[tokio::test]
    async fn rejected_write_leaves_counts_unchanged() {
        let store = CatalogStore::new();
        let author = store.add_author(author_request("A")).await.unwrap();
        let future = crate::models::book::current_year() + 5;
        assert!(store
            .add_book(book_request("Tomorrow", future, author.id))
            .await
            .is_err());
        assert_eq!(store.book_count().await, 0);
    }

    #[tokio::test]
    async fn deleting_an_author_cascades_to_books_and_memberships() {
        let store = CatalogStore::new();
        let austen = store.add_author(author_request("Jane Austen")).await.unwrap();
        let orwell = store.add_author(author_request("George Orwell")).await.unwrap();
        let pride = store
            .add_book(book_request("Pride and Prejudice", 1813, austen.id))
            .await
            .unwrap();
        let farm = store
            .add_book(book_request("Animal Farm", 1945, orwell.id))
            .await
            .unwrap();
        let library = store
            .add_library(LibraryRequest {
                name: "Central".to_string(),
            })
            .await
            .unwrap();
        store.add_library_book(library.id, pride.id).await.unwrap();
        store.add_library_book(library.id, farm.id).await.unwrap();

        store.remove_author(austen.id).await.unwrap();

        assert!(store.get_book(pride.id).await.is_none());
        assert!(store.get_book(farm.id).await.is_some());
        let (library, books) = store.get_library(library.id).await.unwrap();
        assert_eq!(library.book_ids, vec![farm.id]);
        assert_eq!(books.len(), 1);
    }

    #[tokio::test]
    async fn second_delete_is_not_found() {
        let store = CatalogStore::new();
        let author = store.add_author(author_request("A")).await.unwrap();
        let book = store
            .add_book(book_request("Once", 2001, author.id))
            .await
            .unwrap();
        store.remove_book(book.id).await.unwrap();
        assert!(matches!(
            store.remove_book(book.id).await,
            Err(CoreError::NotFound("book", _))
        ));
    }

    #[tokio::test]
    async fn library_membership_add_is_idempotent() {
        let store = CatalogStore::new();
        let author = store.add_author(author_request("A")).await.unwrap();
        let book = store
            .add_book(book_request("B", 1990, author.id))
            .await
            .unwrap();
        let library = store
            .add_library(LibraryRequest {
                name: "Branch".to_string(),
            })
            .await
            .unwrap();
        store.add_library_book(library.id, book.id).await.unwrap();
        let library = store.add_library_book(library.id, book.id).await.unwrap();
        assert_eq!(library.book_ids.len(), 1);
    }
}
