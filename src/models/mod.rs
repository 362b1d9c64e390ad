//! Data models
//!
//! Entity structs and input types for the SCIPI website. Wire names use
//! camelCase; database columns use snake_case.

pub mod admin;
pub mod carousel;
pub mod contact;
pub mod event;
pub mod membership;
pub mod news;
pub mod partner;
pub mod project;
pub mod resource;
pub mod section;
pub mod session;

pub use admin::{Admin, AdminInfo};
pub use carousel::{CarouselImage, CreateCarouselInput, UpdateCarouselInput};
pub use contact::{ContactSubmission, CreateContactInput, UpdateContactInput};
pub use event::{CreateEventInput, Event, UpdateEventInput};
pub use membership::{
    ApplicationStatus, CreateMembershipInput, MembershipApplication, ReviewMembershipInput,
};
pub use news::{CreateNewsInput, LinkType, News, UpdateNewsInput};
pub use partner::{CreatePartnerInput, Partner, UpdatePartnerInput};
pub use project::{CreateProjectInput, Project, UpdateProjectInput};
pub use resource::{
    CreateResourceInput, Resource, ResourceFile, ResourceFileInput, UpdateResourceInput,
};
pub use section::{
    ReorderItem, ReorderRequest, Section, SectionFile, SectionFileInput, SectionInput,
};
pub use session::Session;
