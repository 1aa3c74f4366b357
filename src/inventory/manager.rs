use super::host::Host;
use super::Inventory;
use crate::api::schema::{GroupNames, SatelliteRecord};
use crate::api::ApiClient;
use crate::config::Configuration;
use crate::error::InventoryError;
use log::{debug, info, warn};
use serde_json::Value;

/// Builds the inventory in three stages: seed the master, authenticate, then
/// fetch and merge satellites. Only a rejected login stops the build.
pub struct InventoryManager<'a> {
    config: &'a Configuration,
    groups: GroupNames,
    inventory: Inventory,
}

impl<'a> InventoryManager<'a> {
    /// Creates the manager with the master host already seeded.
    pub fn new(config: &'a Configuration) -> Self {
        let mut manager = InventoryManager {
            config,
            groups: config.api_version.group_names(),
            inventory: Inventory::new(),
        };
        manager.seed_master();
        manager
    }

    pub fn build(config: &'a Configuration) -> Result<Inventory, InventoryError> {
        let mut manager = Self::new(config);

        match manager.fetch_and_merge() {
            Ok(count) => info!("Merged {count} satellites"),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => warn!("{e}"),
        }

        Ok(manager.into_inventory())
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn into_inventory(self) -> Inventory {
        self.inventory
    }

    fn seed_master(&mut self) {
        let config = self.config;
        let name = config.master_hostname.as_str();
        let mut master = Host::with_address(name, &config.master_address);
        if config.master_is_local() {
            master.set_var("ansible_connection", Value::from("local"));
        }
        self.inventory.add_host(master);

        self.inventory.add_to_group(self.groups.all, name);
        self.inventory.add_to_group(self.groups.master, name);
        self.inventory.ensure_group(self.groups.satellites);
    }

    fn fetch_and_merge(&mut self) -> Result<usize, InventoryError> {
        let client = ApiClient::new(self.config)?;
        client.login()?;

        let body = client.fetch_satellites()?;
        let parsed = self.config.api_version.parse_satellites(&body);
        let count = self.merge_satellites(parsed.records);

        match parsed.error {
            Some(e) => {
                if count > 0 {
                    warn!("Keeping {count} satellites decoded before the error");
                }
                Err(e)
            }
            None => Ok(count),
        }
    }

    /// Adds satellites in the given order and returns how many were merged.
    pub fn merge_satellites<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = SatelliteRecord>,
    {
        let mut count = 0;
        for record in records {
            debug!("Adding satellite '{}' ({})", record.name, record.address);

            let mut host = Host::with_address(&record.name, &record.address);
            host.set_var(
                "timezone",
                record.timezone.map(Value::from).unwrap_or(Value::Null),
            );
            if let Some(container) = record.container {
                host.set_var("container", container);
            }
            self.inventory.add_host(host);

            self.inventory.add_to_group(self.groups.all, &record.name);
            self.inventory
                .add_to_group(self.groups.satellites, &record.name);
            count += 1;
        }
        count
    }
}
