pub mod accounts;
pub mod sessions;

pub use sessions::SessionService;
