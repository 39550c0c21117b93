//! Error taxonomy shared by every pipeline stage.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Bad input: empty candidate name, non-positive or oversized count.
    #[error("validation error: {0}")]
    Validation(String),

    /// A write would break referential or uniqueness constraints.
    #[error("integrity error: {0}")]
    Integrity(String),

    /// Missing candidate or missing results.
    #[error("not found: {0}")]
    NotFound(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Storage(rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PipelineError {
    /// Stable short code, used by the CLI and in log fields.
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::Validation(_) => "E_VALIDATION",
            PipelineError::Integrity(_) => "E_INTEGRITY",
            PipelineError::NotFound(_) => "E_NOT_FOUND",
            PipelineError::Config(_) => "E_CONFIG",
            PipelineError::Storage(_) => "E_STORAGE",
            PipelineError::Io(_) => "E_IO",
            PipelineError::Serialization(_) => "E_SERIALIZATION",
        }
    }

    /// Errors raised by the pipeline contract itself, as opposed to the environment.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            PipelineError::Validation(_) | PipelineError::Integrity(_) | PipelineError::NotFound(_)
        )
    }
}

impl From<rusqlite::Error> for PipelineError {
    fn from(e: rusqlite::Error) -> Self {
        // Constraint failures (FK, UNIQUE, CHECK) surface as integrity errors.
        if let rusqlite::Error::SqliteFailure(ref err, ref msg) = e {
            if err.code == rusqlite::ErrorCode::ConstraintViolation {
                let detail = msg.clone().unwrap_or_else(|| err.to_string());
                return PipelineError::Integrity(detail);
            }
        }
        PipelineError::Storage(e)
    }
}
