use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid input in {field}: {message}")]
    InvalidInput { field: String, message: String },

    #[error("Timing source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Config parse error: {0}")]
    ConfigParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build an invalid-input error for the named field.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidInput { .. })
    }

    pub fn is_source_unavailable(&self) -> bool {
        matches!(self, Error::SourceUnavailable(_))
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::ConfigParseError(e.message().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message_names_field() {
        let err = Error::invalid("bpm", "must be positive, got 0");
        assert!(err.is_invalid_input());
        assert!(!err.is_source_unavailable());
        assert_eq!(
            err.to_string(),
            "Invalid input in bpm: must be positive, got 0"
        );
    }

    #[test]
    fn test_source_unavailable_is_distinct() {
        let err = Error::SourceUnavailable("analysis.json: not found".to_string());
        assert!(err.is_source_unavailable());
        assert!(!err.is_invalid_input());
    }
}
