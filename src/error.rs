use thiserror::Error;

/// Errors surfaced by the revenue and health engines.
///
/// Absent optional data (no revenue record, no tasks, no documents) is not an
/// error; those cases resolve to neutral values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid health score {0}: must be between 0 and 100")]
    InvalidScore(i64),
}

impl EngineError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        EngineError::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        EngineError::InvalidInput(msg.into())
    }
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
