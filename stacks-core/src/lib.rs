pub mod error;
pub mod models;
pub mod policy;
pub mod query;
pub mod store;
