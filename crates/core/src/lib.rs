//! Pure domain rules for the backlog tracker.
//!
//! Nothing in this crate performs I/O: persistence lives in `backlog_db`,
//! object storage in `backlog_storage`, orchestration in `backlog_engine`.

pub mod error;
pub mod media_key;
pub mod ownership;
pub mod pagination;
pub mod progress;
pub mod roles;
pub mod status;
pub mod template;
pub mod types;
pub mod validation;
