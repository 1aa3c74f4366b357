use crate::error::InventoryError;
use serde::Deserialize;
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// Success marker both login endpoints put into the `message` field.
pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful";

/// The openITCOCKPIT API contract to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiVersion {
    /// 3.x: form login on `/login/login.json`, satellites wrapped in `Satellite` objects.
    #[default]
    V3,
    /// 4.x: JSON login or API key, flat satellite objects.
    V4,
}

impl FromStr for ApiVersion {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "3" => Ok(ApiVersion::V3),
            "4" => Ok(ApiVersion::V4),
            other => Err(InventoryError::ConfigurationInvalid(format!(
                "unsupported api_version '{other}', expected 3 or 4"
            ))),
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiVersion::V3 => write!(f, "3"),
            ApiVersion::V4 => write!(f, "4"),
        }
    }
}

/// Names of the three groups every inventory carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupNames {
    pub all: &'static str,
    pub master: &'static str,
    pub satellites: &'static str,
}

/// A satellite as the rest of the pipeline sees it, whatever the API returned.
#[derive(Debug, Clone, PartialEq)]
pub struct SatelliteRecord {
    pub name: String,
    pub address: String,
    pub timezone: Option<String>,
    pub container: Option<Value>,
}

/// Records decoded before the first malformed one, plus that error if any.
#[derive(Debug)]
pub struct ParsedSatellites {
    pub records: Vec<SatelliteRecord>,
    pub error: Option<InventoryError>,
}

#[derive(Deserialize)]
struct LegacyEnvelope {
    #[serde(rename = "Satellite")]
    satellite: LegacySatellite,
}

#[derive(Deserialize)]
struct LegacySatellite {
    name: String,
    address: String,
    #[serde(default)]
    timezone: Option<String>,
    #[serde(default)]
    container: Option<Value>,
}

#[derive(Deserialize)]
struct Satellite {
    name: String,
    address: String,
    #[serde(default)]
    timezone: Option<String>,
    #[serde(default)]
    container_id: Option<Value>,
}

impl ApiVersion {
    pub fn login_path(&self) -> &'static str {
        match self {
            ApiVersion::V3 => "/login/login.json",
            ApiVersion::V4 => "/users/login.json",
        }
    }

    pub fn satellites_path(&self) -> &'static str {
        match self {
            ApiVersion::V3 => "/distribute_module/satellites.json",
            ApiVersion::V4 => "/distribute_module/satellites/index.json",
        }
    }

    fn satellites_field(&self) -> &'static str {
        match self {
            // misspelled in the 3.x API
            ApiVersion::V3 => "all_satelittes",
            ApiVersion::V4 => "all_satellites",
        }
    }

    pub fn group_names(&self) -> GroupNames {
        match self {
            ApiVersion::V3 => GroupNames {
                all: "openitcockpit",
                master: "oitc-master",
                satellites: "oitc-satellite",
            },
            ApiVersion::V4 => GroupNames {
                all: "openitcockpit",
                master: "oitc_master",
                satellites: "oitc_satellites",
            },
        }
    }

    /// Form fields for the 3.x login endpoint.
    pub fn legacy_login_form<'a>(
        &self,
        username: &'a str,
        password: &'a str,
        ldap: bool,
    ) -> Vec<(&'static str, &'a str)> {
        if ldap {
            vec![
                ("data[LoginUser][auth_method]", "ldap"),
                ("data[LoginUser][samaccountname]", username),
                ("data[LoginUser][password]", password),
            ]
        } else {
            vec![
                ("data[LoginUser][auth_method]", "session"),
                ("data[LoginUser][email]", username),
                ("data[LoginUser][password]", password),
            ]
        }
    }

    /// JSON body for the 4.x login endpoint.
    pub fn login_body(&self, username: &str, password: &str, ldap: bool) -> Value {
        if ldap {
            json!({
                "auth_method": "ldap",
                "samaccountname": username,
                "password": password,
            })
        } else {
            json!({
                "auth_method": "session",
                "email": username,
                "password": password,
            })
        }
    }

    pub fn decode_satellite(&self, value: &Value) -> Result<SatelliteRecord, serde_json::Error> {
        match self {
            ApiVersion::V3 => {
                let envelope = LegacyEnvelope::deserialize(value)?;
                let sat = envelope.satellite;
                Ok(SatelliteRecord {
                    name: sat.name,
                    address: sat.address,
                    timezone: sat.timezone,
                    container: sat.container,
                })
            }
            ApiVersion::V4 => {
                let sat = Satellite::deserialize(value)?;
                Ok(SatelliteRecord {
                    name: sat.name,
                    address: sat.address,
                    timezone: sat.timezone,
                    container: sat.container_id,
                })
            }
        }
    }

    /// Decodes the satellite list out of a response body, stopping at the
    /// first record that does not match the schema.
    pub fn parse_satellites(&self, body: &Value) -> ParsedSatellites {
        let field = self.satellites_field();
        let list = match body.get(field).and_then(Value::as_array) {
            Some(list) => list,
            None => {
                return ParsedSatellites {
                    records: Vec::new(),
                    error: Some(InventoryError::SatelliteParseError(format!(
                        "response has no '{field}' list"
                    ))),
                }
            }
        };

        let mut records = Vec::with_capacity(list.len());
        for (idx, item) in list.iter().enumerate() {
            match self.decode_satellite(item) {
                Ok(record) => records.push(record),
                Err(e) => {
                    return ParsedSatellites {
                        records,
                        error: Some(InventoryError::SatelliteParseError(format!(
                            "record {idx} of '{field}': {e}"
                        ))),
                    }
                }
            }
        }

        ParsedSatellites {
            records,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_version_from_str() {
        assert_eq!("3".parse::<ApiVersion>().unwrap(), ApiVersion::V3);
        assert_eq!(" 4 ".parse::<ApiVersion>().unwrap(), ApiVersion::V4);

        let err = "5".parse::<ApiVersion>().unwrap_err();
        assert!(matches!(err, InventoryError::ConfigurationInvalid(_)));
    }

    #[test]
    fn test_api_version_display_round_trips() {
        for version in [ApiVersion::V3, ApiVersion::V4] {
            assert_eq!(version.to_string().parse::<ApiVersion>().unwrap(), version);
        }
    }

    #[test]
    fn test_decode_legacy_satellite() {
        let value = json!({
            "Satellite": {
                "id": "1",
                "name": "sat-berlin",
                "address": "10.0.0.5",
                "timezone": "Europe/Berlin",
                "container": "7"
            }
        });

        let record = ApiVersion::V3.decode_satellite(&value).unwrap();
        assert_eq!(
            record,
            SatelliteRecord {
                name: "sat-berlin".to_string(),
                address: "10.0.0.5".to_string(),
                timezone: Some("Europe/Berlin".to_string()),
                container: Some(json!("7")),
            }
        );
    }

    #[test]
    fn test_decode_flat_satellite_without_timezone() {
        let value = json!({
            "id": 3,
            "name": "sat-oslo",
            "address": "10.0.1.9",
            "container_id": 12
        });

        let record = ApiVersion::V4.decode_satellite(&value).unwrap();
        assert_eq!(record.timezone, None);
        assert_eq!(record.container, Some(json!(12)));
    }

    #[test]
    fn test_flat_record_is_rejected_by_legacy_schema() {
        let value = json!({"name": "sat", "address": "10.0.0.1"});
        assert!(ApiVersion::V3.decode_satellite(&value).is_err());
    }

    #[test]
    fn test_parse_satellites_keeps_response_order() {
        let body = json!({
            "all_satellites": [
                {"name": "c", "address": "10.0.0.3"},
                {"name": "a", "address": "10.0.0.1"},
                {"name": "b", "address": "10.0.0.2"}
            ]
        });

        let parsed = ApiVersion::V4.parse_satellites(&body);
        assert!(parsed.error.is_none());
        let names: Vec<&str> = parsed.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_parse_satellites_stops_at_malformed_record() {
        let body = json!({
            "all_satelittes": [
                {"Satellite": {"name": "one", "address": "10.0.0.1", "timezone": null, "container": 1}},
                {"Satellite": {"name": "two"}},
                {"Satellite": {"name": "three", "address": "10.0.0.3"}}
            ]
        });

        let parsed = ApiVersion::V3.parse_satellites(&body);
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].name, "one");
        assert!(matches!(
            parsed.error,
            Some(InventoryError::SatelliteParseError(_))
        ));
    }

    #[test]
    fn test_parse_satellites_missing_list() {
        let parsed = ApiVersion::V4.parse_satellites(&json!({"all_satelittes": []}));
        assert!(parsed.records.is_empty());
        assert!(parsed.error.is_some());
    }

    #[test]
    fn test_login_payloads() {
        let form = ApiVersion::V3.legacy_login_form("jdoe", "secret", true);
        assert_eq!(form[0], ("data[LoginUser][auth_method]", "ldap"));
        assert_eq!(form[1], ("data[LoginUser][samaccountname]", "jdoe"));

        let body = ApiVersion::V4.login_body("admin@example.com", "secret", false);
        assert_eq!(body["email"], "admin@example.com");
        assert_eq!(body["auth_method"], "session");
    }
}
