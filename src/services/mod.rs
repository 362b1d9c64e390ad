//! Business logic services

pub mod auth;
pub mod password;
pub mod sections;
pub mod slug;

pub use auth::{AuthService, AuthServiceError};
pub use slug::{generate_slug, unique_slug, SlugLookup};
