use thiserror::Error;

/// Hard failures surfaced to callers of the engine.
///
/// Batch enrichment never returns these for bad quantifier inputs; those are
/// logged and skipped. Only direct calculator calls, removal paths and flat
/// list filtering fail this way.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl EngineError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
