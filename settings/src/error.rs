use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Required setting missing: {0}")]
    MissingField(String),

    #[error("Unknown environment: {0}")]
    InvalidEnvironment(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Environment file error: {0}")]
    EnvFile(String),
}

impl From<ValidationErrors> for SettingsError {
    fn from(err: ValidationErrors) -> Self {
        SettingsError::Validation(err.to_string())
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        SettingsError::Serialization(err.to_string())
    }
}

impl From<dotenv::Error> for SettingsError {
    fn from(err: dotenv::Error) -> Self {
        SettingsError::EnvFile(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SettingsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_display() {
        let err = SettingsError::MissingField("API_SERVER_URL".to_string());
        assert_eq!(err.to_string(), "Required setting missing: API_SERVER_URL");

        let err = SettingsError::InvalidEnvironment("staging".to_string());
        assert_eq!(err.to_string(), "Unknown environment: staging");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: SettingsError = json_err.into();
        assert!(matches!(err, SettingsError::Serialization(_)));
    }
}
