//! Request handlers.
//!
//! Handlers are thin: extract identity and input, call one engine service,
//! map errors via [`AppError`](crate::error::AppError).

pub mod admin;
pub mod media;
pub mod note;
pub mod project;
pub mod public;
pub mod step;
