//! Repository layer
//!
//! One trait per entity with an SQLx implementation. Handlers depend on the
//! traits, which keeps them testable against in-memory SQLite pools.

pub mod admin;
pub mod carousel;
pub mod contact;
pub mod event;
pub mod membership;
pub mod news;
pub mod partner;
pub mod project;
pub mod resource;
mod section_store;
pub mod session;

pub use admin::{AdminRepository, SqlxAdminRepository};
pub use carousel::{CarouselRepository, SqlxCarouselRepository};
pub use contact::{ContactRepository, SqlxContactRepository};
pub use event::{EventFilter, EventRepository, SqlxEventRepository};
pub use membership::{MembershipRepository, SqlxMembershipRepository};
pub use news::{NewsRepository, SqlxNewsRepository};
pub use partner::{PartnerFilter, PartnerRepository, SqlxPartnerRepository};
pub use project::{ProjectRepository, SqlxProjectRepository};
pub use resource::{ResourceFilter, ResourceRepository, SqlxResourceRepository};
pub use session::{SessionRepository, SqlxSessionRepository};
