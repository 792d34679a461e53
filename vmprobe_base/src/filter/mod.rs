//! # Inventory Filter
//!
//! Reduces a raw [`InventorySnapshot`] to the objects a check may evaluate.
//! VM rules apply in a fixed order: resource pool scoping, then name
//! exclusion, then power state. Hosts are never filtered since other
//! objects resolve their parents through them.
//!
//! The filter is pure: the same snapshot and criteria always yield the same
//! scoped inventory, in snapshot order.

use crate::api::errors::ConfigurationError;
use crate::log_debug;
use crate::types::criteria::FilterCriteria;
use crate::types::custom_attribute::CustomAttributeIndex;
use crate::types::inventory::{
    Cluster, Datastore, Host, InventorySnapshot, ResourcePool, TriggeredAlarm, VirtualMachine,
};
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Validated filter ready to be applied to snapshots
#[derive(Debug, Clone)]
pub struct InventoryFilter {
    criteria: FilterCriteria,
}

impl InventoryFilter {
    /// Validate `criteria`; conflicting options are rejected here, before any
    /// inventory object is looked at
    pub fn new(criteria: FilterCriteria) -> Result<Self, ConfigurationError> {
        criteria.validate()?;
        Ok(Self { criteria })
    }

    /// Apply the criteria to one snapshot
    pub fn apply<'a>(&self, snapshot: &'a InventorySnapshot) -> ScopedInventory<'a> {
        let pool_names: HashMap<&str, &str> = snapshot
            .resource_pools
            .iter()
            .map(|pool| (pool.id.as_str(), pool.name.as_str()))
            .collect();

        let virtual_machines: Vec<&VirtualMachine> = snapshot
            .virtual_machines
            .iter()
            .filter(|vm| !vm.template)
            .filter(|vm| {
                let pool = vm
                    .resource_pool
                    .as_deref()
                    .and_then(|id| pool_names.get(id).copied());
                self.pool_in_scope(pool)
            })
            .filter(|vm| !self.criteria.ignore_vm_names.contains(&vm.name))
            .filter(|vm| self.criteria.include_powered_off || !vm.is_powered_off())
            .collect();

        let datastores: Vec<&Datastore> = snapshot
            .datastores
            .iter()
            .filter(|ds| !self.criteria.ignore_datastore_names.contains(&ds.name))
            .collect();

        let resource_pools: Vec<&ResourcePool> = snapshot
            .resource_pools
            .iter()
            .filter(|pool| self.pool_in_scope(Some(pool.name.as_str())))
            .collect();

        let alarms: Vec<&TriggeredAlarm> = snapshot
            .alarms
            .iter()
            .filter(|alarm| self.keep_alarm(alarm))
            .collect();

        log_debug!("Inventory filtered",
            "vms" => format!("{}/{}", virtual_machines.len(), snapshot.virtual_machines.len()),
            "datastores" => format!("{}/{}", datastores.len(), snapshot.datastores.len()),
            "resource_pools" => format!("{}/{}", resource_pools.len(), snapshot.resource_pools.len()),
            "alarms" => format!("{}/{}", alarms.len(), snapshot.alarms.len())
        );

        ScopedInventory::new(snapshot, virtual_machines, datastores, resource_pools, alarms)
    }

    /// Pool scoping for one pool name; `None` means "outside any pool"
    fn pool_in_scope(&self, pool: Option<&str>) -> bool {
        let include = &self.criteria.include_resource_pools;
        let exclude = &self.criteria.exclude_resource_pools;

        if !include.is_empty() {
            return pool.map_or(false, |name| include.contains(name));
        }
        if !exclude.is_empty() {
            return pool.map_or(true, |name| !exclude.contains(name));
        }
        true
    }

    fn keep_alarm(&self, alarm: &TriggeredAlarm) -> bool {
        let criteria = &self.criteria;
        let entity_type = alarm.entity.entity_type;

        if !criteria.include_managed_types.is_empty()
            && !criteria.include_managed_types.contains(&entity_type)
        {
            return false;
        }
        if criteria.exclude_managed_types.contains(&entity_type) {
            return false;
        }

        if alarm.acknowledged && !criteria.include_acknowledged_alarms {
            return false;
        }

        let name = alarm.name.to_lowercase();
        let name_matches = |patterns: &BTreeSet<String>| {
            patterns
                .iter()
                .any(|pattern| name.contains(&pattern.to_lowercase()))
        };
        if !criteria.include_alarm_names.is_empty() && !name_matches(&criteria.include_alarm_names)
        {
            return false;
        }
        if name_matches(&criteria.exclude_alarm_names) {
            return false;
        }

        if !criteria.include_alarm_statuses.is_empty()
            && !criteria.include_alarm_statuses.contains(&alarm.status)
        {
            return false;
        }
        !criteria.exclude_alarm_statuses.contains(&alarm.status)
    }
}

/// Candidate objects for one probe run plus lookups into the full snapshot
#[derive(Debug)]
pub struct ScopedInventory<'a> {
    snapshot: &'a InventorySnapshot,
    pub virtual_machines: Vec<&'a VirtualMachine>,
    pub datastores: Vec<&'a Datastore>,
    pub resource_pools: Vec<&'a ResourcePool>,
    pub alarms: Vec<&'a TriggeredAlarm>,
    hosts_by_id: HashMap<&'a str, &'a Host>,
    clusters_by_id: HashMap<&'a str, &'a Cluster>,
    datastores_by_id: HashMap<&'a str, &'a Datastore>,
    scoped_datastore_ids: HashSet<&'a str>,
    attributes: CustomAttributeIndex<'a>,
}

impl<'a> ScopedInventory<'a> {
    fn new(
        snapshot: &'a InventorySnapshot,
        virtual_machines: Vec<&'a VirtualMachine>,
        datastores: Vec<&'a Datastore>,
        resource_pools: Vec<&'a ResourcePool>,
        alarms: Vec<&'a TriggeredAlarm>,
    ) -> Self {
        let hosts_by_id = snapshot
            .hosts
            .iter()
            .map(|host| (host.id.as_str(), host))
            .collect();
        let clusters_by_id = snapshot
            .clusters
            .iter()
            .map(|cluster| (cluster.id.as_str(), cluster))
            .collect();
        let datastores_by_id = snapshot
            .datastores
            .iter()
            .map(|ds| (ds.id.as_str(), ds))
            .collect();
        let scoped_datastore_ids = datastores.iter().map(|&ds| ds.id.as_str()).collect();

        Self {
            snapshot,
            virtual_machines,
            datastores,
            resource_pools,
            alarms,
            hosts_by_id,
            clusters_by_id,
            datastores_by_id,
            scoped_datastore_ids,
            attributes: CustomAttributeIndex::build(&snapshot.custom_attributes),
        }
    }

    pub fn snapshot(&self) -> &'a InventorySnapshot {
        self.snapshot
    }

    /// Reference time for every age and uptime metric
    pub fn collected_at(&self) -> DateTime<Utc> {
        self.snapshot.collected_at
    }

    /// All hosts in the snapshot, unfiltered
    pub fn hosts(&self) -> &'a [Host] {
        &self.snapshot.hosts
    }

    pub fn host(&self, id: &str) -> Option<&'a Host> {
        self.hosts_by_id.get(id).copied()
    }

    pub fn cluster(&self, id: &str) -> Option<&'a Cluster> {
        self.clusters_by_id.get(id).copied()
    }

    /// Any datastore in the snapshot, including ignored ones
    pub fn datastore(&self, id: &str) -> Option<&'a Datastore> {
        self.datastores_by_id.get(id).copied()
    }

    /// True unless the datastore was removed by the name filter
    pub fn is_datastore_in_scope(&self, id: &str) -> bool {
        self.scoped_datastore_ids.contains(id)
    }

    pub fn attributes(&self) -> &CustomAttributeIndex<'a> {
        &self.attributes
    }
}
