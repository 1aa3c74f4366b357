pub mod group;
pub mod host;
pub mod manager;

use crate::inventory::group::Group;
use crate::inventory::host::Host;
use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Groups plus the `_meta.hostvars` block, as printed for `--list`.
#[derive(Clone, Debug, Default)]
pub struct Inventory {
    groups: IndexMap<String, Group>,
    hosts: IndexMap<String, Host>,
}

#[derive(Serialize)]
struct Meta<'a> {
    hostvars: &'a IndexMap<String, Host>,
}

impl Serialize for Inventory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len() + 1))?;
        for (name, group) in &self.groups {
            map.serialize_entry(name, group)?;
        }
        map.serialize_entry(
            "_meta",
            &Meta {
                hostvars: &self.hosts,
            },
        )?;
        map.end()
    }
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_host(&self, name: &str) -> Option<&Host> {
        self.hosts.get(name)
    }

    pub fn get_group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    pub fn list_hosts(&self) -> Vec<&Host> {
        self.hosts.values().collect()
    }

    /// Inserts or replaces a host, keeping its original position on replace.
    pub fn add_host(&mut self, host: Host) {
        self.hosts.insert(host.name.clone(), host);
    }

    /// Adds `host_name` to `group_name`, creating the group if needed.
    pub fn add_to_group(&mut self, group_name: &str, host_name: &str) {
        self.ensure_group(group_name).add_host(host_name);
    }

    pub fn ensure_group(&mut self, group_name: &str) -> &mut Group {
        self.groups
            .entry(group_name.to_string())
            .or_insert_with(|| Group::new(group_name))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Vars of `name`, or `{}` for a host this inventory does not know.
    pub fn host_json(&self, name: &str) -> serde_json::Result<String> {
        match self.hosts.get(name) {
            Some(host) => serde_json::to_string(host),
            None => Ok("{}".to_string()),
        }
    }
}
