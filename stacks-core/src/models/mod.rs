pub mod author;
pub mod book;
pub mod comment;
pub mod library;
pub mod post;
pub mod user;

pub use author::{Author, AuthorDetail, AuthorRequest};
pub use book::{Book, BookPatch, BookRequest, BookResponse};
pub use comment::{Comment, CommentRequest, CommentResponse};
pub use library::{Library, LibraryDetail, LibraryRequest};
pub use post::{Post, PostDetail, PostPatch, PostRequest, PostResponse};
pub use user::{Identity, ProfileUpdate, Role, User, UserResponse};
