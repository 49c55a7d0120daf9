//! In-memory entity stores.
//!
//! Each store is a cheaply clonable handle around `Arc<RwLock<…>>`
//! state. Entities are kept in insertion order, which list ordering
//! relies on for tie-breaking. Owner-gated mutations take a guard
//! closure that runs inside the write-lock critical section, so an
//! authorization predicate that evaluated false can never be followed
//! by that request's mutation.

pub mod blog;
pub mod catalog;
pub mod users;

pub use blog::BlogStore;
pub use catalog::CatalogStore;
pub use users::UserDirectory;
