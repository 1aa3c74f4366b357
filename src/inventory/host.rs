use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Host {
    #[serde(skip)]
    pub name: String,
    vars: IndexMap<String, Value>,
}

impl Host {
    pub fn new(name: &str) -> Self {
        Host {
            name: name.to_string(),
            vars: IndexMap::new(),
        }
    }

    /// Sets `address` and mirrors it into `ansible_host`.
    pub fn with_address(name: &str, address: &str) -> Self {
        let mut host = Host::new(name);
        host.set_var("address", Value::from(address));
        host.set_var("ansible_host", Value::from(address));
        host
    }

    pub fn get_var(&self, key: &str) -> Option<&Value> {
        self.vars.get(key)
    }

    pub fn set_var(&mut self, key: &str, value: Value) {
        self.vars.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_address_is_mirrored() {
        let host = Host::with_address("sat", "10.0.0.1");
        assert_eq!(host.get_var("address"), Some(&json!("10.0.0.1")));
        assert_eq!(host.get_var("ansible_host"), Some(&json!("10.0.0.1")));
    }

    #[test]
    fn test_serializes_vars_only() {
        let mut host = Host::with_address("sat", "10.0.0.1");
        host.set_var("timezone", Value::Null);

        let out = serde_json::to_string(&host).unwrap();
        assert_eq!(
            out,
            r#"{"address":"10.0.0.1","ansible_host":"10.0.0.1","timezone":null}"#
        );
    }
}
