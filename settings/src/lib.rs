//! Environment settings for the coffee shop client.
//!
//! One [`EnvironmentSettings`] record per build profile carries the backend API
//! base URL and the Auth0 client parameters. Build it once at startup, with
//! [`EnvironmentSettings::load`] or [`EnvironmentSettings::for_environment`],
//! and pass it by reference to whatever talks to the API or the identity provider.

pub mod auth0;
pub mod config;
pub mod environment;
pub mod error;
pub mod loader;

// Re-export commonly used items
pub use auth0::Auth0Settings;
pub use config::EnvironmentSettings;
pub use environment::Environment;
pub use error::{Result, SettingsError};
pub use loader::EnvSource;
