pub mod schema;

use crate::api::schema::{ApiVersion, LOGIN_SUCCESS_MESSAGE};
use crate::config::{AuthMode, Configuration};
use crate::error::InventoryError;
use log::{debug, info};
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde_json::Value;

pub const API_KEY_SCHEME: &str = "X-OITC-API";

/// Single-shot client for the openITCOCKPIT HTTP API. The cookie store keeps
/// the session between `login` and `fetch_satellites`.
pub struct ApiClient<'a> {
    config: &'a Configuration,
    client: Client,
}

impl<'a> ApiClient<'a> {
    pub fn new(config: &'a Configuration) -> Result<Self, InventoryError> {
        let client = Client::builder()
            .cookie_store(true)
            .danger_accept_invalid_certs(!config.validate_certs)
            .timeout(config.timeout)
            .build()?;

        Ok(ApiClient { config, client })
    }

    /// Opens a session. A no-op when authenticating with an API key.
    pub fn login(&self) -> Result<(), InventoryError> {
        let AuthMode::Session {
            username,
            password,
            ldap,
        } = &self.config.auth
        else {
            return Ok(());
        };

        let version = self.config.api_version;
        let url = self.config.endpoint(version.login_path());
        debug!("Logging in as '{}' at {} (API v{})", username, url, version);

        let request = self.client.post(&url).header(ACCEPT, "application/json");
        let request = match version {
            ApiVersion::V3 => request.form(&version.legacy_login_form(username, password, *ldap)),
            ApiVersion::V4 => request.json(&version.login_body(username, password, *ldap)),
        };

        let response = request.send()?;
        check_login(response)?;

        info!("Logged in to {}", self.config.url);
        Ok(())
    }

    pub fn fetch_satellites(&self) -> Result<Value, InventoryError> {
        let url = self.config.endpoint(self.config.api_version.satellites_path());
        debug!(
            "Fetching satellites from {} (API v{})",
            url, self.config.api_version
        );

        let mut request = self.client.get(&url).header(ACCEPT, "application/json");
        if let AuthMode::ApiKey(key) = &self.config.auth {
            request = request.header(AUTHORIZATION, format!("{} {}", API_KEY_SCHEME, key.as_str()));
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(InventoryError::SatelliteFetchFailed(format!(
                "{} returned HTTP {}",
                url, status
            )));
        }

        response
            .json::<Value>()
            .map_err(|e| InventoryError::SatelliteParseError(e.to_string()))
    }
}

fn check_login(response: Response) -> Result<(), InventoryError> {
    let status = response.status();
    if !status.is_success() {
        return Err(InventoryError::AuthenticationFailed(format!("HTTP {}", status)));
    }

    let body: Value = response
        .json()
        .map_err(|e| InventoryError::AuthenticationFailed(format!("unreadable response: {e}")))?;

    match body.get("message").and_then(Value::as_str) {
        Some(LOGIN_SUCCESS_MESSAGE) => Ok(()),
        Some(message) => Err(InventoryError::AuthenticationFailed(message.to_string())),
        None => Err(InventoryError::AuthenticationFailed(
            "response carries no login message".to_string(),
        )),
    }
}
