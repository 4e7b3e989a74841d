//! Business logic services.

pub mod sessions;

pub use sessions::SessionService;
