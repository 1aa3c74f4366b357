use crate::api::schema::ApiVersion;
use crate::error::InventoryError;
use ini::{Ini, ParseOption, Properties};
use log::debug;
use std::fmt;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use zeroize::Zeroizing;

pub const CONFIG_FILE_NAME: &str = "openitcockpit.ini";
const SECTION: &str = "openitcockpit";

const DEFAULT_URL: &str = "https://127.0.0.1";
const DEFAULT_MASTER_HOSTNAME: &str = "localhost";
const DEFAULT_MASTER_ADDRESS: &str = "127.0.0.1";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub enum AuthMode {
    Session {
        username: String,
        password: Zeroizing<String>,
        ldap: bool,
    },
    ApiKey(Zeroizing<String>),
}

impl fmt::Debug for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMode::Session { username, ldap, .. } => f
                .debug_struct("Session")
                .field("username", username)
                .field("password", &"<redacted>")
                .field("ldap", ldap)
                .finish(),
            AuthMode::ApiKey(_) => f.debug_tuple("ApiKey").field(&"<redacted>").finish(),
        }
    }
}

#[derive(Debug)]
pub struct Configuration {
    pub url: String,
    pub auth: AuthMode,
    pub api_version: ApiVersion,
    pub master_hostname: String,
    pub master_address: String,
    pub validate_certs: bool,
    pub timeout: Duration,
}

impl Configuration {
    /// System-wide, per-user, working directory, then next to the executable.
    pub fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("/etc/ansible").join(CONFIG_FILE_NAME)];

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".ansible").join(CONFIG_FILE_NAME));
        }

        paths.push(PathBuf::from(CONFIG_FILE_NAME));

        if let Some(install_dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            paths.push(install_dir.join(CONFIG_FILE_NAME));
        }

        paths
    }

    pub fn load() -> Result<Self, InventoryError> {
        Self::load_from(&Self::candidate_paths())
    }

    /// Loads the first existing file of `paths`.
    pub fn load_from(paths: &[PathBuf]) -> Result<Self, InventoryError> {
        let path = paths.iter().find(|p| p.is_file()).ok_or_else(|| {
            let searched: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
            InventoryError::ConfigurationNotFound(searched.join(", "))
        })?;

        debug!("Loading configuration from {}", path.display());
        let ini = Ini::load_from_file_opt(path, parse_option())?;
        Self::from_ini(&ini)
    }

    pub fn from_ini(ini: &Ini) -> Result<Self, InventoryError> {
        let empty = Properties::new();
        let section = ini.section(Some(SECTION)).unwrap_or(&empty);

        let url = get_or(section, "url", DEFAULT_URL)
            .trim_end_matches('/')
            .to_string();
        let master_hostname = get_or(section, "master_hostname", DEFAULT_MASTER_HOSTNAME);
        let master_address = match section.get("master_address") {
            Some(address) if address.trim().is_empty() => master_hostname.to_string(),
            Some(address) => address.trim().to_string(),
            None => DEFAULT_MASTER_ADDRESS.to_string(),
        };
        let master_hostname = master_hostname.to_string();

        let ldap = get_bool(section, "ldap", false)?;
        let validate_certs = get_bool(section, "validate_certs", false)?;

        let api_version = match section.get("api_version") {
            Some(version) => version.parse::<ApiVersion>()?,
            None => ApiVersion::default(),
        };

        let timeout = match section.get("timeout") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                InventoryError::ConfigurationInvalid(format!(
                    "timeout must be a number of seconds, got '{raw}'"
                ))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let auth = match non_empty(section, "apikey") {
            Some(key) => {
                if api_version == ApiVersion::V3 {
                    return Err(InventoryError::ConfigurationInvalid(
                        "apikey authentication requires api_version = 4".to_string(),
                    ));
                }
                AuthMode::ApiKey(Zeroizing::new(key.to_string()))
            }
            None => match (non_empty(section, "username"), section.get("password")) {
                (Some(username), Some(password)) if !password.is_empty() => AuthMode::Session {
                    username: username.to_string(),
                    password: Zeroizing::new(password.to_string()),
                    ldap,
                },
                _ => {
                    let wanted = match api_version {
                        ApiVersion::V3 => "username and password",
                        ApiVersion::V4 => "username and password or apikey",
                    };
                    return Err(InventoryError::ConfigurationIncomplete(wanted.to_string()));
                }
            },
        };

        Ok(Configuration {
            url,
            auth,
            api_version,
            master_hostname,
            master_address,
            validate_certs,
            timeout: Duration::from_secs(timeout),
        })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.url, path)
    }

    pub fn master_is_local(&self) -> bool {
        self.master_address
            .parse::<IpAddr>()
            .map(|ip| ip.is_loopback())
            .unwrap_or(false)
    }
}

/// Values are taken literally: no escapes, no quote stripping.
fn parse_option() -> ParseOption {
    ParseOption {
        enabled_escape: false,
        enabled_quote: false,
        ..Default::default()
    }
}

fn get_or<'a>(section: &'a Properties, key: &str, default: &'a str) -> &'a str {
    section.get(key).map(str::trim).unwrap_or(default)
}

fn non_empty<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn get_bool(section: &Properties, key: &str, default: bool) -> Result<bool, InventoryError> {
    let Some(raw) = section.get(key) else {
        return Ok(default);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Ok(true),
        "0" | "no" | "false" | "off" => Ok(false),
        _ => Err(InventoryError::ConfigurationInvalid(format!(
            "{key} must be a boolean, got '{raw}'"
        ))),
    }
}
