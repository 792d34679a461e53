//! # vmprobe SDK
//!
//! Concrete inventory checks and the `vmprobe` command line.
//! Provides datastore, host, snapshot, VM state, alarm, hardware version
//! and host/datastore pairing probes.

pub mod checks;
pub mod cli;

use vmprobe_base::strategies::{CheckRegistry, RegistryError};

/// Create a registry with all available checks
///
/// Includes:
/// - Capacity checks (datastore usage, host memory and CPU)
/// - Snapshot checks (age, count, size)
/// - VM state checks (uptime, tools, disk consolidation)
/// - Triggered alarms
/// - Hardware version compliance and host/datastore pairing
pub fn create_check_registry() -> Result<CheckRegistry, RegistryError> {
    use checks::*;

    let mut registry = CheckRegistry::new();

    registry.register(
        datastore::NAME,
        DatastoreUsageCheck::DESCRIPTION,
        DatastoreUsageCheck::from_config,
    )?;
    registry.register(
        host::MEMORY_NAME,
        HostMemoryCheck::DESCRIPTION,
        HostMemoryCheck::from_config,
    )?;
    registry.register(
        host::CPU_NAME,
        HostCpuCheck::DESCRIPTION,
        HostCpuCheck::from_config,
    )?;

    registry.register(
        snapshots::AGE_NAME,
        SnapshotAgeCheck::DESCRIPTION,
        SnapshotAgeCheck::from_config,
    )?;
    registry.register(
        snapshots::COUNT_NAME,
        SnapshotCountCheck::DESCRIPTION,
        SnapshotCountCheck::from_config,
    )?;
    registry.register(
        snapshots::SIZE_NAME,
        SnapshotSizeCheck::DESCRIPTION,
        SnapshotSizeCheck::from_config,
    )?;

    registry.register(
        vm::UPTIME_NAME,
        VmUptimeCheck::DESCRIPTION,
        VmUptimeCheck::from_config,
    )?;
    registry.register(
        vm::TOOLS_NAME,
        ToolsCheck::DESCRIPTION,
        ToolsCheck::from_config,
    )?;
    registry.register(
        vm::CONSOLIDATION_NAME,
        DiskConsolidationCheck::DESCRIPTION,
        DiskConsolidationCheck::from_config,
    )?;

    registry.register(
        alarms::NAME,
        AlarmsCheck::DESCRIPTION,
        AlarmsCheck::from_config,
    )?;
    registry.register(
        hardware_version::NAME,
        HardwareVersionCheck::DESCRIPTION,
        HardwareVersionCheck::from_config,
    )?;
    registry.register(
        pairing::NAME,
        HostDatastorePairingCheck::DESCRIPTION,
        HostDatastorePairingCheck::from_config,
    )?;

    Ok(registry)
}
