//! # Inventory Model
//!
//! Point-in-time view of the virtualization inventory. Every probe invocation
//! materializes a fresh [`InventorySnapshot`] from the fetcher's JSON document;
//! nothing here is mutated after deserialization.
//!
//! Parent relations (host of a VM, pool of a VM, cluster of a host) are weak:
//! they hold the referenced object's identifier only.

use crate::types::custom_attribute::CustomAttributeEntry;
use crate::types::hardware_version::HardwareVersion;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Bytes in one GiB, the unit operators use for size thresholds
pub const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

// ============================================================================
// TYPE TAGS
// ============================================================================

/// Managed entity type tag as reported by the inventory service
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ManagedEntityType {
    Datacenter,
    ClusterComputeResource,
    HostSystem,
    Datastore,
    VirtualMachine,
    ResourcePool,
    Network,
    Folder,
}

impl ManagedEntityType {
    pub const ALL: [ManagedEntityType; 8] = [
        Self::Datacenter,
        Self::ClusterComputeResource,
        Self::HostSystem,
        Self::Datastore,
        Self::VirtualMachine,
        Self::ResourcePool,
        Self::Network,
        Self::Folder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Datacenter => "Datacenter",
            Self::ClusterComputeResource => "ClusterComputeResource",
            Self::HostSystem => "HostSystem",
            Self::Datastore => "Datastore",
            Self::VirtualMachine => "VirtualMachine",
            Self::ResourcePool => "ResourcePool",
            Self::Network => "Network",
            Self::Folder => "Folder",
        }
    }
}

impl FromStr for ManagedEntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|k| k.as_str()).collect();
                format!(
                    "unknown managed entity type '{}' (valid: {})",
                    s,
                    valid.join(", ")
                )
            })
    }
}

impl fmt::Display for ManagedEntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of inventory object an evaluation result is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Host,
    Datastore,
    VirtualMachine,
    ResourcePool,
    Alarm,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Host => "host",
            Self::Datastore => "datastore",
            Self::VirtualMachine => "vm",
            Self::ResourcePool => "resource pool",
            Self::Alarm => "alarm",
        };
        f.write_str(label)
    }
}

/// Stable reference to an inventory object
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    pub kind: ObjectKind,
    pub id: String,
    pub name: String,
}

impl ObjectRef {
    pub fn new(kind: ObjectKind, id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' ({})", self.kind, self.name, self.id)
    }
}

// ============================================================================
// OBJECT STATE ENUMERATIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PowerState {
    PoweredOn,
    PoweredOff,
    Suspended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolsStatus {
    ToolsOk,
    ToolsOld,
    ToolsNotRunning,
    ToolsNotInstalled,
}

/// Overall status of a triggered alarm
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmStatus {
    Gray,
    Green,
    Yellow,
    Red,
}

impl FromStr for AlarmStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gray" | "grey" => Ok(Self::Gray),
            "green" => Ok(Self::Green),
            "yellow" => Ok(Self::Yellow),
            "red" => Ok(Self::Red),
            other => Err(format!(
                "unknown alarm status '{}' (valid: gray, green, yellow, red)",
                other
            )),
        }
    }
}

impl fmt::Display for AlarmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Gray => "gray",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        };
        f.write_str(label)
    }
}

// ============================================================================
// INVENTORY OBJECTS
// ============================================================================

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub datacenter: Option<String>,
    #[serde(default)]
    pub default_hardware_version: Option<HardwareVersion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Host {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub datacenter: Option<String>,
    #[serde(default)]
    pub cluster: Option<String>,
    #[serde(default)]
    pub memory_total_bytes: u64,
    #[serde(default)]
    pub memory_usage_bytes: u64,
    #[serde(default)]
    pub cpu_total_mhz: u64,
    #[serde(default)]
    pub cpu_usage_mhz: u64,
    #[serde(default)]
    pub in_maintenance: bool,
    /// Default virtual hardware version offered to new VMs on this host
    #[serde(default)]
    pub default_hardware_version: Option<HardwareVersion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Datastore {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub datacenter: Option<String>,
    #[serde(default)]
    pub capacity_bytes: u64,
    #[serde(default)]
    pub free_bytes: u64,
    #[serde(default = "default_true")]
    pub accessible: bool,
}

impl Datastore {
    /// Used space as a percentage of capacity; `None` when capacity is unknown
    pub fn used_percent(&self) -> Option<f64> {
        if self.capacity_bytes == 0 {
            return None;
        }
        let used = self.capacity_bytes.saturating_sub(self.free_bytes);
        Some(used as f64 / self.capacity_bytes as f64 * 100.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VmSnapshot {
    pub id: String,
    pub name: String,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VirtualMachine {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub datacenter: Option<String>,
    /// Identifier of the host currently running the VM
    #[serde(default)]
    pub host: Option<String>,
    /// Identifier of the resource pool; `None` when outside any pool
    #[serde(default)]
    pub resource_pool: Option<String>,
    /// Identifiers of the datastores backing the VM's disks
    #[serde(default)]
    pub datastores: Vec<String>,
    pub power_state: PowerState,
    pub hardware_version: HardwareVersion,
    #[serde(default)]
    pub template: bool,
    #[serde(default)]
    pub uptime_seconds: Option<u64>,
    #[serde(default)]
    pub num_cpu: u32,
    #[serde(default)]
    pub snapshots: Vec<VmSnapshot>,
    #[serde(default)]
    pub consolidation_needed: bool,
    #[serde(default)]
    pub tools_status: Option<ToolsStatus>,
}

impl VirtualMachine {
    pub fn is_powered_off(&self) -> bool {
        self.power_state == PowerState::PoweredOff
    }

    pub fn oldest_snapshot(&self) -> Option<&VmSnapshot> {
        self.snapshots.iter().min_by_key(|s| s.created)
    }

    pub fn snapshots_size_bytes(&self) -> u64 {
        self.snapshots.iter().map(|s| s.size_bytes).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcePool {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub datacenter: Option<String>,
    #[serde(default)]
    pub memory_usage_bytes: u64,
}

/// Entity an alarm was triggered on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlarmEntity {
    pub entity_type: ManagedEntityType,
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggeredAlarm {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub datacenter: Option<String>,
    pub entity: AlarmEntity,
    pub status: AlarmStatus,
    #[serde(default)]
    pub acknowledged: bool,
    #[serde(default)]
    pub triggered_at: Option<DateTime<Utc>>,
}

// ============================================================================
// POLYMORPHIC VIEW
// ============================================================================

/// Borrowed view over any evaluated inventory object
#[derive(Debug, Clone, Copy)]
pub enum InventoryObject<'a> {
    Host(&'a Host),
    Datastore(&'a Datastore),
    VirtualMachine(&'a VirtualMachine),
    ResourcePool(&'a ResourcePool),
    Alarm(&'a TriggeredAlarm),
}

impl<'a> InventoryObject<'a> {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Host(_) => ObjectKind::Host,
            Self::Datastore(_) => ObjectKind::Datastore,
            Self::VirtualMachine(_) => ObjectKind::VirtualMachine,
            Self::ResourcePool(_) => ObjectKind::ResourcePool,
            Self::Alarm(_) => ObjectKind::Alarm,
        }
    }

    pub fn id(&self) -> &'a str {
        match *self {
            Self::Host(h) => &h.id,
            Self::Datastore(d) => &d.id,
            Self::VirtualMachine(v) => &v.id,
            Self::ResourcePool(p) => &p.id,
            Self::Alarm(a) => &a.key,
        }
    }

    pub fn name(&self) -> &'a str {
        match *self {
            Self::Host(h) => &h.name,
            Self::Datastore(d) => &d.name,
            Self::VirtualMachine(v) => &v.name,
            Self::ResourcePool(p) => &p.name,
            Self::Alarm(a) => &a.name,
        }
    }

    pub fn datacenter(&self) -> Option<&'a str> {
        match *self {
            Self::Host(h) => h.datacenter.as_deref(),
            Self::Datastore(d) => d.datacenter.as_deref(),
            Self::VirtualMachine(v) => v.datacenter.as_deref(),
            Self::ResourcePool(p) => p.datacenter.as_deref(),
            Self::Alarm(a) => a.datacenter.as_deref(),
        }
    }

    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef::new(self.kind(), self.id(), self.name())
    }
}

/// Conversion into the polymorphic inventory view
pub trait AsInventoryObject {
    fn as_inventory_object(&self) -> InventoryObject<'_>;

    fn object_ref(&self) -> ObjectRef {
        self.as_inventory_object().object_ref()
    }
}

impl AsInventoryObject for Host {
    fn as_inventory_object(&self) -> InventoryObject<'_> {
        InventoryObject::Host(self)
    }
}

impl AsInventoryObject for Datastore {
    fn as_inventory_object(&self) -> InventoryObject<'_> {
        InventoryObject::Datastore(self)
    }
}

impl AsInventoryObject for VirtualMachine {
    fn as_inventory_object(&self) -> InventoryObject<'_> {
        InventoryObject::VirtualMachine(self)
    }
}

impl AsInventoryObject for ResourcePool {
    fn as_inventory_object(&self) -> InventoryObject<'_> {
        InventoryObject::ResourcePool(self)
    }
}

impl AsInventoryObject for TriggeredAlarm {
    fn as_inventory_object(&self) -> InventoryObject<'_> {
        InventoryObject::Alarm(self)
    }
}

// ============================================================================
// SNAPSHOT
// ============================================================================

/// Complete inventory snapshot handed over by the fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventorySnapshot {
    /// Collection time; the reference "now" for every age and uptime metric
    pub collected_at: DateTime<Utc>,

    /// Environment-wide default hardware version, when the fetcher resolved one
    #[serde(default)]
    pub default_hardware_version: Option<HardwareVersion>,

    #[serde(default)]
    pub clusters: Vec<Cluster>,
    #[serde(default)]
    pub hosts: Vec<Host>,
    #[serde(default)]
    pub datastores: Vec<Datastore>,
    #[serde(default)]
    pub virtual_machines: Vec<VirtualMachine>,
    #[serde(default)]
    pub resource_pools: Vec<ResourcePool>,
    #[serde(default)]
    pub alarms: Vec<TriggeredAlarm>,
    #[serde(default)]
    pub custom_attributes: Vec<CustomAttributeEntry>,
}

impl InventorySnapshot {
    /// Empty snapshot collected at `collected_at`
    pub fn empty(collected_at: DateTime<Utc>) -> Self {
        Self {
            collected_at,
            default_hardware_version: None,
            clusters: Vec::new(),
            hosts: Vec::new(),
            datastores: Vec::new(),
            virtual_machines: Vec::new(),
            resource_pools: Vec::new(),
            alarms: Vec::new(),
            custom_attributes: Vec::new(),
        }
    }

    /// Parse from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Iterate every evaluable object in the snapshot
    pub fn objects(&self) -> impl Iterator<Item = InventoryObject<'_>> {
        self.hosts
            .iter()
            .map(InventoryObject::Host)
            .chain(self.datastores.iter().map(InventoryObject::Datastore))
            .chain(
                self.virtual_machines
                    .iter()
                    .map(InventoryObject::VirtualMachine),
            )
            .chain(self.resource_pools.iter().map(InventoryObject::ResourcePool))
            .chain(self.alarms.iter().map(InventoryObject::Alarm))
    }

    /// Structural sanity check: identifiers must be unique per object kind
    pub fn validate(&self) -> Result<(), String> {
        let mut seen: HashSet<(ObjectKind, &str)> = HashSet::new();
        for object in self.objects() {
            if !seen.insert((object.kind(), object.id())) {
                return Err(format!(
                    "duplicate {} identifier '{}' in inventory snapshot",
                    object.kind(),
                    object.id()
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vm(id: &str) -> VirtualMachine {
        VirtualMachine {
            id: id.to_string(),
            name: format!("name-{}", id),
            datacenter: None,
            host: None,
            resource_pool: None,
            datastores: Vec::new(),
            power_state: PowerState::PoweredOn,
            hardware_version: HardwareVersion::new(15),
            template: false,
            uptime_seconds: None,
            num_cpu: 2,
            snapshots: Vec::new(),
            consolidation_needed: false,
            tools_status: None,
        }
    }

    #[test]
    fn test_managed_entity_type_parsing() {
        assert_eq!(
            "hostsystem".parse::<ManagedEntityType>().unwrap(),
            ManagedEntityType::HostSystem
        );
        assert_eq!(
            " Datastore ".parse::<ManagedEntityType>().unwrap(),
            ManagedEntityType::Datastore
        );
        let err = "Toaster".parse::<ManagedEntityType>().unwrap_err();
        assert!(err.contains("VirtualMachine"));
    }

    #[test]
    fn test_alarm_status_parsing_and_order() {
        assert_eq!("RED".parse::<AlarmStatus>().unwrap(), AlarmStatus::Red);
        assert_eq!("grey".parse::<AlarmStatus>().unwrap(), AlarmStatus::Gray);
        assert!("purple".parse::<AlarmStatus>().is_err());
        assert!(AlarmStatus::Red > AlarmStatus::Yellow);
    }

    #[test]
    fn test_datastore_used_percent() {
        let ds = Datastore {
            id: "ds-1".to_string(),
            name: "ds01".to_string(),
            datacenter: None,
            capacity_bytes: 200,
            free_bytes: 50,
            accessible: true,
        };
        assert_eq!(ds.used_percent(), Some(75.0));

        let unknown = Datastore {
            capacity_bytes: 0,
            ..ds
        };
        assert_eq!(unknown.used_percent(), None);
    }

    #[test]
    fn test_snapshot_helpers() {
        let mut machine = vm("vm-1");
        let older = "2026-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let newer = "2026-02-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        machine.snapshots = vec![
            VmSnapshot {
                id: "s2".to_string(),
                name: "after patch".to_string(),
                created: newer,
                size_bytes: 10,
            },
            VmSnapshot {
                id: "s1".to_string(),
                name: "before patch".to_string(),
                created: older,
                size_bytes: 5,
            },
        ];

        assert_eq!(machine.oldest_snapshot().unwrap().id, "s1");
        assert_eq!(machine.snapshots_size_bytes(), 15);
    }

    #[test]
    fn test_snapshot_validation_rejects_duplicate_ids() {
        let mut snapshot = InventorySnapshot::empty(Utc::now());
        snapshot.virtual_machines = vec![vm("vm-1"), vm("vm-2")];
        assert!(snapshot.validate().is_ok());

        snapshot.virtual_machines.push(vm("vm-1"));
        let err = snapshot.validate().unwrap_err();
        assert!(err.contains("vm-1"));
    }

    #[test]
    fn test_object_ref_from_inventory_object() {
        let machine = vm("vm-9");
        let object_ref = machine.object_ref();
        assert_eq!(object_ref.kind, ObjectKind::VirtualMachine);
        assert_eq!(object_ref.id, "vm-9");
        assert_eq!(object_ref.to_string(), "vm 'name-vm-9' (vm-9)");
    }

    #[test]
    fn test_snapshot_deserialization_defaults() {
        let json = r#"{
            "collected_at": "2026-03-01T12:00:00Z",
            "virtual_machines": [
                {"id": "vm-1", "name": "web01", "power_state": "poweredOn", "hardware_version": "vmx-19"}
            ]
        }"#;
        let snapshot = InventorySnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.virtual_machines.len(), 1);
        assert!(snapshot.hosts.is_empty());
        let machine = &snapshot.virtual_machines[0];
        assert_eq!(machine.hardware_version, HardwareVersion::new(19));
        assert!(machine.resource_pool.is_none());
        assert!(!machine.template);
    }
}
