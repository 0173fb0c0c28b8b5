use backlog_core::error::CoreError;
use backlog_storage::StorageError;

/// Errors returned by engine services.
///
/// Domain outcomes (`NotFound`, `AccessDenied`, `InvalidInput`) travel as
/// [`CoreError`]; infrastructure faults keep their source type.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type EngineResult<T> = Result<T, EngineError>;
