use thiserror::Error;

#[derive(Debug, Error)]
pub enum BizValError {
    /// The model is missing fields required by its business type, or declares
    /// a business type the engine does not know.
    #[error("Configuration error: {field}: {reason}")]
    Configuration { field: String, reason: String },

    /// An assumption is outside its valid domain (e.g. terminal growth at or
    /// above the discount rate).
    #[error("Invalid assumption: {field}: {reason}")]
    InvalidAssumption { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl BizValError {
    pub(crate) fn configuration(field: impl Into<String>, reason: impl Into<String>) -> Self {
        BizValError::Configuration {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_assumption(field: impl Into<String>, reason: impl Into<String>) -> Self {
        BizValError::InvalidAssumption {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for BizValError {
    fn from(e: serde_json::Error) -> Self {
        BizValError::Serialization(e.to_string())
    }
}
