use thiserror::Error;

#[derive(Debug, Error)]
pub enum SacjdError {
    #[error("Invalid parameter: {field} — {reason}")]
    InvalidParameter { field: String, reason: String },

    #[error("Numeric degenerate result in {context}")]
    NumericDegenerate { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for SacjdError {
    fn from(e: serde_json::Error) -> Self {
        SacjdError::SerializationError(e.to_string())
    }
}
