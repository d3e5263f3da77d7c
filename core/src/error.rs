use thiserror::Error;

/// Cache backend failure.
///
/// Persistence degrades to "no persistence" on these - they are logged and
/// swallowed by the persistence layer, never surfaced to the request.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache backend error: {0}")]
    Backend(Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CacheError {
    pub fn backend(error: impl std::error::Error + Send + Sync + 'static) -> Self { CacheError::Backend(Box::new(error)) }
}

/// Query execution failure. Execution correctness is the executor's
/// responsibility; these propagate uncaught through `FilterForm::result`.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Executor error: {0}")]
    Executor(Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),
}

impl QueryError {
    pub fn executor(error: impl std::error::Error + Send + Sync + 'static) -> Self { QueryError::Executor(Box::new(error)) }
}
