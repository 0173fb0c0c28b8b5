//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Multi-statement writes open their
//! own transaction.

pub mod like_repo;
pub mod media_asset_repo;
pub mod progress_note_repo;
pub mod project_repo;
pub mod step_repo;

pub use like_repo::LikeRepo;
pub use media_asset_repo::MediaAssetRepo;
pub use progress_note_repo::ProgressNoteRepo;
pub use project_repo::ProjectRepo;
pub use step_repo::StepRepo;
