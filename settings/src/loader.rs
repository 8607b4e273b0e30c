use log::{debug, info, warn};
use std::collections::HashMap;
use std::env;
use std::path::Path;

use crate::config::EnvironmentSettings;
use crate::environment::Environment;
use crate::error::{Result, SettingsError};

pub const ENV_FILE_PATH: &str = "ENV_FILE_PATH";
pub const RUST_ENV: &str = "RUST_ENV";
pub const API_SERVER_URL: &str = "API_SERVER_URL";
pub const AUTH0_DOMAIN: &str = "AUTH0_DOMAIN";
pub const AUTH0_AUDIENCE: &str = "AUTH0_AUDIENCE";
pub const AUTH0_CLIENT_ID: &str = "AUTH0_CLIENT_ID";
pub const AUTH0_CALLBACK_URL: &str = "AUTH0_CALLBACK_URL";

/// Variables from `.env` files, layered under the process environment.
///
/// Values are read with `dotenv`'s iterator API and never written back into
/// the process environment. A variable already set in the process wins over
/// the same key in a file, the same precedence `dotenv()` itself applies.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    file_vars: HashMap<String, String>,
    process_env: bool,
}

impl EnvSource {
    /// Reads env files from the working directory. See [`EnvSource::discover_in`].
    pub fn discover(profile: Option<Environment>) -> Result<Self> {
        Self::discover_in(Path::new("."), profile)
    }

    /// Reads env files from `dir`.
    ///
    /// With `ENV_FILE_PATH` set and non-empty only that file is read, and it
    /// must exist. Otherwise `.env` is read when present, then `.env.<profile>`
    /// on top of it unless the profile is development. The profile is `profile`
    /// when given, else the `RUST_ENV` hint. A file that exists but does not
    /// parse is an error; a missing optional file is skipped.
    pub fn discover_in(dir: &Path, profile: Option<Environment>) -> Result<Self> {
        let mut source = Self {
            file_vars: HashMap::new(),
            process_env: true,
        };

        if let Ok(env_file_path) = env::var(ENV_FILE_PATH) {
            if !env_file_path.is_empty() {
                info!("Loading environment from {}: {}", ENV_FILE_PATH, env_file_path);
                let path = Path::new(&env_file_path);
                if !path.exists() {
                    return Err(SettingsError::EnvFile(format!(
                        "{} points at {}, which does not exist",
                        ENV_FILE_PATH, env_file_path
                    )));
                }
                source.merge_file(path)?;
                // No other env file is consulted
                return Ok(source);
            }
        }

        let base_file = dir.join(".env");
        if base_file.exists() {
            source.merge_file(&base_file)?;
        }

        let environment_hint = profile.unwrap_or_else(|| {
            source
                .get(RUST_ENV)
                .and_then(|value| value.parse().ok())
                .unwrap_or_default()
        });
        if environment_hint != Environment::Development {
            let profile_file = dir.join(environment_hint.env_file_name());
            if profile_file.exists() {
                source.merge_file(&profile_file)?;
            } else {
                warn!("Environment file {} not found, skipping", profile_file.display());
            }
        }

        Ok(source)
    }

    /// A source holding only the variables of one file; the process environment is ignored.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            file_vars: read_env_file(path.as_ref())?,
            process_env: false,
        })
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            file_vars: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            process_env: false,
        }
    }

    /// Non-empty, trimmed value for `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        let non_empty = |value: String| {
            let value = value.trim().to_string();
            (!value.is_empty()).then_some(value)
        };
        let from_process = if self.process_env {
            env::var(key).ok().and_then(non_empty)
        } else {
            None
        };
        from_process.or_else(|| self.file_vars.get(key).cloned().and_then(non_empty))
    }

    /// Profile named by `RUST_ENV`; development when unset.
    pub fn environment(&self) -> Result<Environment> {
        match self.get(RUST_ENV) {
            Some(value) => value.parse(),
            None => Ok(Environment::Development),
        }
    }

    fn merge_file(&mut self, path: &Path) -> Result<()> {
        let vars = read_env_file(path).map_err(|e| match e {
            SettingsError::EnvFile(msg) => {
                SettingsError::EnvFile(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;
        debug!("Read {} variables from {}", vars.len(), path.display());
        self.file_vars.extend(vars);
        Ok(())
    }
}

/// Parses a dotenv-format file without touching the process environment.
// Deprecated in dotenv 0.15; the remaining API writes into the process environment.
#[allow(deprecated)]
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    dotenv::from_path_iter(path)?
        .map(|item| item.map_err(SettingsError::from))
        .collect()
}

impl EnvironmentSettings {
    /// Loads the settings for the profile named by `RUST_ENV`.
    pub fn load() -> Result<Self> {
        let source = EnvSource::discover(None)?;
        let environment = source.environment()?;
        Self::from_source(environment, &source)
    }

    /// Loads the settings for an explicit profile, ignoring `RUST_ENV`.
    pub fn load_for(environment: Environment) -> Result<Self> {
        let source = EnvSource::discover(Some(environment))?;
        Self::from_source(environment, &source)
    }

    pub fn from_source(environment: Environment, source: &EnvSource) -> Result<Self> {
        Self::from_lookup(environment, |key| source.get(key))
    }

    /// Builds the record for `environment`, overriding built-in values with
    /// whatever `lookup` returns. Production has no built-in values, so every
    /// override is required there.
    pub fn from_lookup<F>(environment: Environment, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        info!("Loading configuration for environment: {}", environment);

        let mut settings = Self::for_environment(environment);
        {
            let overrides = [
                (API_SERVER_URL, &mut settings.api_server_url),
                (AUTH0_DOMAIN, &mut settings.auth0.url),
                (AUTH0_AUDIENCE, &mut settings.auth0.audience),
                (AUTH0_CLIENT_ID, &mut settings.auth0.client_id),
                (AUTH0_CALLBACK_URL, &mut settings.auth0.callback_url),
            ];

            for (key, field) in overrides {
                let value = lookup(key)
                    .map(|value| value.trim().to_string())
                    .filter(|value| !value.is_empty());
                match value {
                    Some(value) => {
                        debug!("{} overridden from environment", key);
                        *field = value;
                    }
                    None if environment.is_production() => {
                        return Err(SettingsError::MissingField(format!(
                            "{} must be set in production",
                            key
                        )));
                    }
                    None => {}
                }
            }
        }

        settings.validate_fields()?;
        settings.log_configuration();

        Ok(settings)
    }
}
