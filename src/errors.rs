use thiserror::Error;

/// Error type that captures programming and configuration failures in the form engine.
///
/// User-correctable conditions (missing required fields, unknown import keys) are not
/// represented here; they surface as form state instead.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Malformed path `{path}`: {reason}")]
    MalformedPath { path: String, reason: String },
    #[error("Field `{0}` is not present in the record template")]
    ShapeDrift(String),
    #[error("Unknown section: {0}")]
    UnknownSection(String),
    #[error("Unknown field: {0}")]
    UnknownField(String),
    #[error("Invalid value for `{path}`: {reason}")]
    InvalidValue { path: String, reason: String },
    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, FormError>;

impl FormError {
    pub(crate) fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        FormError::MalformedPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_value(path: impl Into<String>, reason: impl Into<String>) -> Self {
        FormError::InvalidValue {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for FormError {
    fn from(err: std::io::Error) -> Self {
        FormError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for FormError {
    fn from(err: serde_json::Error) -> Self {
        FormError::Storage(err.to_string())
    }
}
