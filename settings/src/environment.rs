use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SettingsError;

/// Build profile the settings record was selected for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    pub const ALL: [Environment; 3] = [
        Environment::Development,
        Environment::Test,
        Environment::Production,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        *self == Environment::Production
    }

    /// Name of the profile-specific env file, e.g. `.env.production`.
    pub fn env_file_name(&self) -> String {
        format!(".env.{}", self.as_str())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Environment {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "prod" | "production" => Ok(Environment::Production),
            _ => Err(SettingsError::InvalidEnvironment(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("development", Environment::Development)]
    #[case("dev", Environment::Development)]
    #[case("DEVELOPMENT", Environment::Development)]
    #[case("Dev", Environment::Development)]
    #[case("test", Environment::Test)]
    #[case("TEST", Environment::Test)]
    #[case("production", Environment::Production)]
    #[case("prod", Environment::Production)]
    #[case(" Production ", Environment::Production)]
    fn test_environment_parsing(#[case] input: &str, #[case] expected: Environment) {
        assert_eq!(input.parse::<Environment>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_environment_is_rejected() {
        let err = "staging".parse::<Environment>().unwrap_err();
        assert_eq!(err, SettingsError::InvalidEnvironment("staging".to_string()));
    }

    #[test]
    fn test_environment_default() {
        assert_eq!(Environment::default(), Environment::Development);
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for env in Environment::ALL {
            assert_eq!(env.to_string().parse::<Environment>().unwrap(), env);
        }
    }

    #[test]
    fn test_env_file_name() {
        assert_eq!(Environment::Production.env_file_name(), ".env.production");
        assert_eq!(Environment::Test.env_file_name(), ".env.test");
    }

    #[test]
    fn test_only_production_is_production() {
        assert!(Environment::Production.is_production());
        assert!(!Environment::Development.is_production());
        assert!(!Environment::Test.is_production());
    }
}
