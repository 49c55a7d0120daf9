pub mod auth;
pub mod authors;
pub mod books;
pub mod comments;
pub mod health;
pub mod info;
pub mod libraries;
pub mod posts;
pub mod users;
