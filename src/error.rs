use thiserror::Error;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Could not find any configuration file, searched: {0}")]
    ConfigurationNotFound(String),
    #[error("Please specify {0} in the configuration file")]
    ConfigurationIncomplete(String),
    #[error("Invalid configuration: {0}")]
    ConfigurationInvalid(String),
    #[error("Login failed: {0}")]
    AuthenticationFailed(String),
    #[error("Could not fetch satellite data: {0}")]
    SatelliteFetchFailed(String),
    #[error("Could not parse satellite data: {0}")]
    SatelliteParseError(String),
}

impl InventoryError {
    /// Fatal errors abort the run; the others degrade to a smaller inventory.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            InventoryError::SatelliteFetchFailed(_) | InventoryError::SatelliteParseError(_)
        )
    }
}

impl From<ini::Error> for InventoryError {
    fn from(err: ini::Error) -> Self {
        InventoryError::ConfigurationInvalid(err.to_string())
    }
}

impl From<reqwest::Error> for InventoryError {
    fn from(err: reqwest::Error) -> Self {
        InventoryError::SatelliteFetchFailed(err.to_string())
    }
}
