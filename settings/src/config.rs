use log::{info, warn};
use serde::{Deserialize, Serialize};
use url::{Host, Url};
use validator::Validate;

use crate::auth0::{parse_url, Auth0Settings};
use crate::environment::Environment;
use crate::error::{Result, SettingsError};

/// Deployment constants for the client: build flag, backend base URL and Auth0 parameters.
///
/// Built once at startup and handed to consumers by reference. Nothing in this
/// crate mutates a record after it has been constructed.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct EnvironmentSettings {
    pub production: bool,

    /// Base address of the backend HTTP service
    #[serde(rename = "apiServerUrl")]
    #[validate(url(message = "API server URL must be a valid URL"))]
    pub api_server_url: String,

    #[validate]
    pub auth0: Auth0Settings,
}

impl EnvironmentSettings {
    /// The built-in record for a build profile.
    ///
    /// Production has no baked-in deployment: every string field is empty and
    /// the loader requires each one to come from the environment.
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Development => Self::development(),
            Environment::Test => Self::test(),
            Environment::Production => Self {
                production: true,
                api_server_url: String::new(),
                auth0: Auth0Settings {
                    url: String::new(),
                    audience: String::new(),
                    client_id: String::new(),
                    callback_url: String::new(),
                },
            },
        }
    }

    pub fn development() -> Self {
        Self {
            production: false,
            api_server_url: "http://127.0.0.1:5000".to_string(),
            auth0: Auth0Settings {
                url: "anthonyoliko.us".to_string(),
                audience: "coffee_shop2".to_string(),
                client_id: "PjPLd0SgNgpr6eZxYtDNZ1bXhk7UiZm4".to_string(),
                callback_url: "http://127.0.0.1:8100".to_string(),
            },
        }
    }

    pub fn test() -> Self {
        Self {
            production: false,
            api_server_url: "http://localhost:5001".to_string(),
            auth0: Auth0Settings {
                url: "anthonyoliko.us".to_string(),
                audience: "coffee_shop2".to_string(),
                client_id: "PjPLd0SgNgpr6eZxYtDNZ1bXhk7UiZm4".to_string(),
                callback_url: "http://localhost:8100".to_string(),
            },
        }
    }

    pub fn api_base_url(&self) -> Result<Url> {
        parse_url(&self.api_server_url)
    }

    /// Resolves a backend route such as `/drinks` or `/drinks/7` against the API base URL.
    /// A path prefix on the base URL (e.g. `https://host/api`) is kept.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let mut base = self.api_base_url()?;
        if !base.path().ends_with('/') {
            let prefixed = format!("{}/", base.path());
            base.set_path(&prefixed);
        }
        let url = base
            .join(path.trim_start_matches('/'))
            .map_err(|e| SettingsError::InvalidUrl(format!("{}: {}", path, e)))?;

        // An absolute `path` would replace the API host entirely
        if url.origin() != base.origin() {
            return Err(SettingsError::InvalidUrl(format!(
                "{} is not a route on {}",
                path, self.api_server_url
            )));
        }
        Ok(url)
    }

    /// Field validation plus the rules that only apply to production builds.
    pub fn validate_fields(&self) -> Result<()> {
        self.validate()?;

        if self.production {
            if is_loopback(&self.api_server_url)? {
                return Err(SettingsError::Validation(
                    "Production API server URL cannot point at a loopback host".to_string(),
                ));
            }
            if is_loopback(&self.auth0.callback_url)? {
                return Err(SettingsError::Validation(
                    "Production Auth0 callback URL cannot point at a loopback host".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// JSON in the key layout the client bundle expects.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn log_configuration(&self) {
        info!("Configuration loaded successfully");
        info!("Production build: {}", self.production);
        info!("API server: {}", self.api_server_url);
        info!(
            "Auth0: tenant {} (audience: {}, client: {})",
            self.auth0.tenant_domain(),
            self.auth0.audience,
            self.auth0.client_id
        );
        info!("Auth0 callback: {}", self.auth0.callback_url);

        if !self.production {
            warn!("Running with a development build profile");
        }
    }
}

fn is_loopback(value: &str) -> Result<bool> {
    let url = parse_url(value)?;
    Ok(match url.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => ip.is_loopback() || ip.is_unspecified(),
        Some(Host::Ipv6(ip)) => ip.is_loopback() || ip.is_unspecified(),
        None => false,
    })
}
