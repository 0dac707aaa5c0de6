use thiserror::Error;

#[derive(Error, Debug)]
pub enum HearthError {
    // Lookup errors
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("session not found: {id}")]
    SessionNotFound { id: String },

    // Validation errors
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("session limit of {limit} reached")]
    TooManySessions { limit: usize },

    // Artifact integrity errors
    #[error("integrity error in {artifact}: {reason}")]
    Integrity { artifact: String, reason: String },

    // Serialization errors
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("bincode serialization error: {0}")]
    Bincode(String),

    // Config errors
    #[error("config error: {0}")]
    Config(String),

    // Prediction errors
    #[error("price predictor not loaded")]
    PredictorUnavailable,

    // IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    // Internal
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<Box<bincode::ErrorKind>> for HearthError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        HearthError::Bincode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HearthError>;

impl HearthError {
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        HearthError::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn integrity(artifact: impl Into<String>, reason: impl Into<String>) -> Self {
        HearthError::Integrity {
            artifact: artifact.into(),
            reason: reason.into(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            HearthError::NotFound { .. } | HearthError::SessionNotFound { .. } => 404,

            HearthError::InvalidArgument(_) => 400,

            HearthError::InvalidState(_) => 409,

            HearthError::TooManySessions { .. } => 429,

            HearthError::PredictorUnavailable => 503,

            _ => 500,
        }
    }
}
