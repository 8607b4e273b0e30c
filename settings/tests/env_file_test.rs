use pretty_assertions::assert_eq;
use settings::loader::read_env_file;
use settings::{EnvSource, Environment, EnvironmentSettings, SettingsError};
use std::fs;
use tempfile::TempDir;

fn write_env_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn production_settings_from_env_file() {
    let dir = TempDir::new().unwrap();
    let path = write_env_file(
        &dir,
        ".env.production",
        "RUST_ENV=production\n\
         # deployed client\n\
         API_SERVER_URL=https://api.coffee.example.com\n\
         AUTH0_DOMAIN=anthonyoliko.us\n\
         AUTH0_AUDIENCE=coffee_shop2\n\
         AUTH0_CLIENT_ID=PjPLd0SgNgpr6eZxYtDNZ1bXhk7UiZm4\n\
         AUTH0_CALLBACK_URL=\"https://coffee.example.com\"\n",
    );

    let source = EnvSource::from_file(&path).unwrap();
    let environment = source.environment().unwrap();
    assert_eq!(environment, Environment::Production);

    let settings = EnvironmentSettings::from_source(environment, &source).unwrap();
    assert!(settings.production);
    assert_eq!(settings.api_server_url, "https://api.coffee.example.com");
    assert_eq!(settings.auth0.callback_url, "https://coffee.example.com");
    assert_eq!(settings.auth0.issuer(), "https://anthonyoliko.us.auth0.com/");
}

#[test]
fn incomplete_production_env_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_env_file(
        &dir,
        ".env.production",
        "API_SERVER_URL=https://api.coffee.example.com\n",
    );

    let source = EnvSource::from_file(&path).unwrap();
    let err = EnvironmentSettings::from_source(Environment::Production, &source).unwrap_err();
    assert!(matches!(err, SettingsError::MissingField(_)));
}

#[test]
fn development_env_file_overrides_single_field() {
    let dir = TempDir::new().unwrap();
    let path = write_env_file(&dir, ".env", "API_SERVER_URL=http://127.0.0.1:5050\n");

    let source = EnvSource::from_file(&path).unwrap();
    let settings = EnvironmentSettings::from_source(Environment::Development, &source).unwrap();

    assert_eq!(settings.api_server_url, "http://127.0.0.1:5050");
    assert_eq!(
        settings.auth0,
        EnvironmentSettings::development().auth0
    );
}

#[test]
fn missing_env_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = read_env_file(&dir.path().join(".env.missing")).unwrap_err();
    assert!(matches!(err, SettingsError::EnvFile(_)));
}
