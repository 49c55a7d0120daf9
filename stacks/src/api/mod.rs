pub mod auth;
pub mod authorize;
pub mod error;
pub mod handlers;
pub mod router;

#[cfg(test)]
pub mod test_utils;


#[cfg(test)]
mod book_api_tests;
