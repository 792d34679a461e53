//! Probe catalogue
//!
//! One [`InventoryCheck`] per supervisor command. Threshold-based checks
//! share [`threshold_result`]; status-based checks map inventory states to
//! severities directly.

pub mod alarms;
pub mod datastore;
pub mod hardware_version;
pub mod host;
pub mod pairing;
pub mod snapshots;
pub mod vm;

pub use alarms::AlarmsCheck;
pub use datastore::DatastoreUsageCheck;
pub use hardware_version::HardwareVersionCheck;
pub use host::{HostCpuCheck, HostMemoryCheck};
pub use pairing::HostDatastorePairingCheck;
pub use snapshots::{SnapshotAgeCheck, SnapshotCountCheck, SnapshotSizeCheck};
pub use vm::{DiskConsolidationCheck, ToolsCheck, VmUptimeCheck};

use vmprobe_base::api::{ConfigurationError, ProbeConfig};
use vmprobe_base::evaluation::classify;
use vmprobe_base::results::{EvaluationResult, Observed};
use vmprobe_base::strategies::InventoryCheck;
use vmprobe_base::types::{Direction, ObjectRef, ThresholdPair};

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Resolve a check's thresholds from configuration, falling back to defaults
pub fn resolve_thresholds(
    config: &ProbeConfig,
    check: &str,
    defaults: ThresholdPair<f64>,
) -> Result<ThresholdPair<f64>, ConfigurationError> {
    config.thresholds_for(check).resolve(defaults)
}

/// Classify a higher-is-worse metric and phrase the reason
pub fn threshold_result(
    object: ObjectRef,
    metric: f64,
    observed: Observed,
    thresholds: &ThresholdPair<f64>,
    label: &str,
) -> EvaluationResult {
    let severity = classify(metric, thresholds, Direction::HigherIsWorse);
    let reason = if severity.is_problem() {
        format!("{} {} ({})", label, observed, thresholds)
    } else {
        format!("{} {} within thresholds", label, observed)
    };
    EvaluationResult::new(object, observed, severity, reason)
}

/// Boxed constructor shape expected by the check registry
pub type BoxedCheck = Result<Box<dyn InventoryCheck>, ConfigurationError>;

#[cfg(test)]
pub(crate) mod fixtures {
    //! Inventory builders shared by the check tests

    use chrono::{DateTime, Utc};
    use vmprobe_base::execution::ProbeEngine;
    use vmprobe_base::filter::InventoryFilter;
    use vmprobe_base::results::ProbeOutcome;
    use vmprobe_base::strategies::InventoryCheck;
    use vmprobe_base::types::inventory::{
        Datastore, Host, InventorySnapshot, PowerState, VirtualMachine,
    };
    use vmprobe_base::types::{FilterCriteria, HardwareVersion};

    /// Run a check through the full filter/aggregate pipeline
    pub fn run(check: Box<dyn InventoryCheck>, snapshot: &InventorySnapshot) -> ProbeOutcome {
        let filter = InventoryFilter::new(FilterCriteria::default()).unwrap();
        ProbeEngine::new(filter, check).execute(snapshot).unwrap()
    }

    pub fn collected_at() -> DateTime<Utc> {
        "2026-03-01T12:00:00Z".parse().unwrap()
    }

    pub fn snapshot() -> InventorySnapshot {
        InventorySnapshot::empty(collected_at())
    }

    pub fn vm(id: &str) -> VirtualMachine {
        VirtualMachine {
            id: id.to_string(),
            name: format!("name-{}", id),
            datacenter: Some("DC1".to_string()),
            host: Some("host-1".to_string()),
            resource_pool: None,
            datastores: Vec::new(),
            power_state: PowerState::PoweredOn,
            hardware_version: HardwareVersion::new(19),
            template: false,
            uptime_seconds: None,
            num_cpu: 2,
            snapshots: Vec::new(),
            consolidation_needed: false,
            tools_status: None,
        }
    }

    pub fn host(id: &str) -> Host {
        Host {
            id: id.to_string(),
            name: format!("esx-{}", id),
            datacenter: Some("DC1".to_string()),
            cluster: None,
            memory_total_bytes: 0,
            memory_usage_bytes: 0,
            cpu_total_mhz: 0,
            cpu_usage_mhz: 0,
            in_maintenance: false,
            default_hardware_version: None,
        }
    }

    pub fn datastore(id: &str, capacity: u64, free: u64) -> Datastore {
        Datastore {
            id: id.to_string(),
            name: format!("store-{}", id),
            datacenter: Some("DC1".to_string()),
            capacity_bytes: capacity,
            free_bytes: free,
            accessible: true,
        }
    }
}
