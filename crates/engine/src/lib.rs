//! Orchestration services for the backlog tracker.
//!
//! Each service is a plain struct holding its dependencies behind `Arc`
//! trait objects ([`BacklogStore`](backlog_db::BacklogStore),
//! [`ObjectStore`](backlog_storage::ObjectStore)), constructed once at
//! start-up and shared by the HTTP layer.
//!
//! | Service | Responsibility |
//! |---------|----------------|
//! | [`CascadeDeleter`] | project deletion across Postgres and object storage |
//! | [`MediaService`] | upload grants, asset registration, read URLs, best-effort deletes |
//! | [`StepService`] | single-step status changes and bulk target transitions |
//! | [`ProjectService`] | project CRUD, public listings, likes, admin listing |
//! | [`NoteService`] | progress notes and their public feeds |

mod access;
pub mod cascade;
pub mod error;
pub mod media;
pub mod notes;
pub mod projects;
pub mod steps;
pub mod views;

pub use cascade::{CascadeDeleter, CascadeReport, OwnerCascadeReport};
pub use error::{EngineError, EngineResult};
pub use media::{MediaService, UploadGrant};
pub use notes::NoteService;
pub use projects::ProjectService;
pub use steps::StepService;
