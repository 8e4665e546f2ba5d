use thiserror::Error;

#[derive(Debug, Error)]
pub enum ZoneWiseError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Unknown market preset: {0}")]
    UnknownMarketPreset(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl ZoneWiseError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ZoneWiseError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for ZoneWiseError {
    fn from(e: serde_json::Error) -> Self {
        ZoneWiseError::SerializationError(e.to_string())
    }
}
