use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::{Origin, Url};
use validator::Validate;

use crate::error::{Result, SettingsError};

lazy_static! {
    static ref DOMAIN_REGEX: Regex = Regex::new(
        r"^[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*$"
    )
    .unwrap();
}

const AUTH0_HOST_SUFFIX: &str = ".auth0.com";

/// Identity-provider parameters for the Auth0 tenant the client logs in against.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct Auth0Settings {
    /// Tenant domain prefix, e.g. `anthonyoliko.us` for `anthonyoliko.us.auth0.com`
    #[validate(length(min = 1, message = "Auth0 domain is required"))]
    #[validate(regex(path = "DOMAIN_REGEX", message = "Auth0 domain must be a bare domain"))]
    pub url: String,

    /// API identifier the issued access tokens are scoped to
    #[validate(length(min = 1, message = "Auth0 audience is required"))]
    pub audience: String,

    /// Public client identifier of the registered application
    #[serde(rename = "clientId")]
    #[validate(length(min = 1, message = "Auth0 client id is required"))]
    pub client_id: String,

    /// Where Auth0 redirects after login
    #[serde(rename = "callbackURL")]
    #[validate(url(message = "Auth0 callback URL must be a valid URL"))]
    pub callback_url: String,
}

impl Auth0Settings {
    /// Full tenant host. A value that already names an `auth0.com` host is kept as is.
    pub fn tenant_domain(&self) -> String {
        let domain = self.url.trim_end_matches('/');
        if domain.ends_with(AUTH0_HOST_SUFFIX) {
            domain.to_string()
        } else {
            format!("{}{}", domain, AUTH0_HOST_SUFFIX)
        }
    }

    /// Token issuer (`iss` claim) for this tenant.
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.tenant_domain())
    }

    /// Location of the tenant's signing keys, used by the API to verify RS256 tokens.
    pub fn jwks_url(&self) -> String {
        format!("https://{}/.well-known/jwks.json", self.tenant_domain())
    }

    /// Login URL the client navigates to. `callback_path` is appended to the
    /// callback URL to form `redirect_uri`.
    pub fn authorize_url(&self, callback_path: Option<&str>) -> Result<Url> {
        let redirect_uri = self.redirect_uri(callback_path);
        let base = format!("https://{}/authorize", self.tenant_domain());

        Url::parse_with_params(
            &base,
            &[
                ("audience", self.audience.as_str()),
                ("response_type", "token"),
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", redirect_uri.as_str()),
            ],
        )
        .map_err(|e| SettingsError::InvalidUrl(format!("{}: {}", base, e)))
    }

    /// Logout URL; Auth0 returns to `return_to`, or to the callback URL when none is given.
    pub fn logout_url(&self, return_to: Option<&str>) -> Result<Url> {
        let return_to = return_to.unwrap_or(self.callback_url.as_str());
        let base = format!("https://{}/v2/logout", self.tenant_domain());

        Url::parse_with_params(
            &base,
            &[
                ("client_id", self.client_id.as_str()),
                ("returnTo", return_to),
            ],
        )
        .map_err(|e| SettingsError::InvalidUrl(format!("{}: {}", base, e)))
    }

    pub fn callback_origin(&self) -> Result<Origin> {
        parse_url(&self.callback_url).map(|url| url.origin())
    }

    /// Whether the callback lands on the origin the client is actually served from.
    pub fn callback_matches_origin(&self, served_from: &str) -> Result<bool> {
        let served = parse_url(served_from)?;
        Ok(self.callback_origin()? == served.origin())
    }

    fn redirect_uri(&self, callback_path: Option<&str>) -> String {
        match callback_path {
            Some(path) if !path.is_empty() => format!(
                "{}/{}",
                self.callback_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
            _ => self.callback_url.clone(),
        }
    }
}

pub(crate) fn parse_url(value: &str) -> Result<Url> {
    Url::parse(value).map_err(|e| SettingsError::InvalidUrl(format!("{}: {}", value, e)))
}
