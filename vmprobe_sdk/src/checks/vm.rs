//! Per-VM state checks: uptime, guest tools status and pending disk
//! consolidation

use crate::checks::{resolve_thresholds, threshold_result, BoxedCheck, SECONDS_PER_DAY};
use vmprobe_base::api::ProbeConfig;
use vmprobe_base::evaluation::{scope_of, CheckEvaluation};
use vmprobe_base::filter::ScopedInventory;
use vmprobe_base::results::{EvaluationError, EvaluationResult, Observed};
use vmprobe_base::strategies::InventoryCheck;
use vmprobe_base::types::{
    AsInventoryObject, ObjectRef, PowerState, ThresholdPair, ToolsStatus, VirtualMachine,
};

pub const UPTIME_NAME: &str = "vm-uptime";
pub const TOOLS_NAME: &str = "tools";
pub const CONSOLIDATION_NAME: &str = "disk-consolidation";

/// Uptime in days of powered-on VMs
#[derive(Debug, Clone)]
pub struct VmUptimeCheck {
    thresholds: ThresholdPair<f64>,
}

impl VmUptimeCheck {
    pub const DESCRIPTION: &str = "Uptime in days of each powered-on VM";

    pub const DEFAULT_THRESHOLDS: ThresholdPair<f64> = ThresholdPair {
        warning: 60.0,
        critical: 90.0,
    };

    pub fn new(thresholds: ThresholdPair<f64>) -> Self {
        Self { thresholds }
    }

    pub fn from_config(config: &ProbeConfig) -> BoxedCheck {
        let thresholds = resolve_thresholds(config, UPTIME_NAME, Self::DEFAULT_THRESHOLDS)?;
        Ok(Box::new(Self::new(thresholds)))
    }
}

impl InventoryCheck for VmUptimeCheck {
    fn check_name(&self) -> &str {
        UPTIME_NAME
    }

    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    fn scope(&self, scoped: &ScopedInventory<'_>) -> Vec<ObjectRef> {
        scoped
            .virtual_machines
            .iter()
            .filter(|vm| vm.power_state == PowerState::PoweredOn)
            .map(|vm| vm.object_ref())
            .collect()
    }

    fn evaluate(&self, scoped: &ScopedInventory<'_>) -> Result<CheckEvaluation, EvaluationError> {
        Ok(scoped
            .virtual_machines
            .iter()
            .filter(|vm| vm.power_state == PowerState::PoweredOn)
            .map(|vm| match vm.uptime_seconds {
                Some(seconds) => {
                    let days = seconds as f64 / SECONDS_PER_DAY;
                    threshold_result(
                        vm.object_ref(),
                        days,
                        Observed::Days(days),
                        &self.thresholds,
                        "uptime",
                    )
                }
                None => EvaluationResult::warning(
                    vm.object_ref(),
                    Observed::Absent,
                    "powered-on VM reports no uptime",
                ),
            })
            .collect())
    }
}

/// Guest tools status per VM
#[derive(Debug, Clone, Default)]
pub struct ToolsCheck;

impl ToolsCheck {
    pub const DESCRIPTION: &str = "Guest tools installation and running state of each VM";

    pub fn from_config(_config: &ProbeConfig) -> BoxedCheck {
        Ok(Box::new(Self))
    }

    fn evaluate_vm(vm: &VirtualMachine) -> EvaluationResult {
        if vm.is_powered_off() {
            return EvaluationResult::ok(
                vm.object_ref(),
                Observed::Status("poweredOff".to_string()),
                "tools not evaluated on a powered-off VM",
            );
        }
        let status = |label: &str| Observed::Status(label.to_string());
        match vm.tools_status {
            Some(ToolsStatus::ToolsOk) => {
                EvaluationResult::ok(vm.object_ref(), status("toolsOk"), "tools running and current")
            }
            Some(ToolsStatus::ToolsOld) => {
                EvaluationResult::warning(vm.object_ref(), status("toolsOld"), "tools outdated")
            }
            Some(ToolsStatus::ToolsNotRunning) => EvaluationResult::critical(
                vm.object_ref(),
                status("toolsNotRunning"),
                "tools not running",
            ),
            Some(ToolsStatus::ToolsNotInstalled) => EvaluationResult::critical(
                vm.object_ref(),
                status("toolsNotInstalled"),
                "tools not installed",
            ),
            None => EvaluationResult::warning(
                vm.object_ref(),
                Observed::Absent,
                "tools status not reported",
            ),
        }
    }
}

impl InventoryCheck for ToolsCheck {
    fn check_name(&self) -> &str {
        TOOLS_NAME
    }

    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    fn scope(&self, scoped: &ScopedInventory<'_>) -> Vec<ObjectRef> {
        scope_of(scoped.virtual_machines.iter().copied())
    }

    fn evaluate(&self, scoped: &ScopedInventory<'_>) -> Result<CheckEvaluation, EvaluationError> {
        Ok(scoped
            .virtual_machines
            .iter()
            .map(|vm| Self::evaluate_vm(vm))
            .collect())
    }
}

/// VMs whose disks need consolidation
#[derive(Debug, Clone, Default)]
pub struct DiskConsolidationCheck;

impl DiskConsolidationCheck {
    pub const DESCRIPTION: &str = "VMs with disks that need consolidation";

    pub fn from_config(_config: &ProbeConfig) -> BoxedCheck {
        Ok(Box::new(Self))
    }
}

impl InventoryCheck for DiskConsolidationCheck {
    fn check_name(&self) -> &str {
        CONSOLIDATION_NAME
    }

    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    fn scope(&self, scoped: &ScopedInventory<'_>) -> Vec<ObjectRef> {
        scope_of(scoped.virtual_machines.iter().copied())
    }

    fn evaluate(&self, scoped: &ScopedInventory<'_>) -> Result<CheckEvaluation, EvaluationError> {
        Ok(scoped
            .virtual_machines
            .iter()
            .map(|vm| {
                if vm.consolidation_needed {
                    EvaluationResult::warning(
                        vm.object_ref(),
                        Observed::Status("consolidationNeeded".to_string()),
                        "disk consolidation needed",
                    )
                } else {
                    EvaluationResult::ok(
                        vm.object_ref(),
                        Observed::Status("consolidated".to_string()),
                        "no consolidation needed",
                    )
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::fixtures;
    use vmprobe_base::results::Severity;
    use vmprobe_base::types::FilterCriteria;
    use vmprobe_base::execution::ProbeEngine;
    use vmprobe_base::filter::InventoryFilter;

    const DAY: u64 = 86_400;

    #[test]
    fn test_uptime_only_covers_powered_on_vms() {
        let mut short = fixtures::vm("vm-1");
        short.uptime_seconds = Some(10 * DAY);
        let mut long = fixtures::vm("vm-2");
        long.uptime_seconds = Some(95 * DAY);
        let mut suspended = fixtures::vm("vm-3");
        suspended.power_state = PowerState::Suspended;
        suspended.uptime_seconds = Some(400 * DAY);
        let unknown = fixtures::vm("vm-4");

        let mut inventory = fixtures::snapshot();
        inventory.virtual_machines = vec![short, long, suspended, unknown];

        let outcome = fixtures::run(
            VmUptimeCheck::from_config(&ProbeConfig::default()).unwrap(),
            &inventory,
        );
        assert_eq!(outcome.results.len(), 3);
        assert_eq!(outcome.results[0].severity, Severity::Ok);
        assert_eq!(outcome.results[1].severity, Severity::Critical);
        assert_eq!(outcome.results[2].object.id, "vm-4");
        assert_eq!(outcome.results[2].severity, Severity::Warning);
    }

    #[test]
    fn test_tools_status_mapping() {
        let statuses = [
            Some(ToolsStatus::ToolsOk),
            Some(ToolsStatus::ToolsOld),
            Some(ToolsStatus::ToolsNotRunning),
            Some(ToolsStatus::ToolsNotInstalled),
            None,
        ];
        let mut inventory = fixtures::snapshot();
        inventory.virtual_machines = statuses
            .iter()
            .enumerate()
            .map(|(i, status)| {
                let mut vm = fixtures::vm(&format!("vm-{}", i));
                vm.tools_status = *status;
                vm
            })
            .collect();

        let outcome = fixtures::run(ToolsCheck::from_config(&ProbeConfig::default()).unwrap(), &inventory);
        let severities: Vec<Severity> = outcome.results.iter().map(|r| r.severity).collect();
        assert_eq!(
            severities,
            vec![
                Severity::Ok,
                Severity::Warning,
                Severity::Critical,
                Severity::Critical,
                Severity::Warning
            ]
        );
    }

    #[test]
    fn test_tools_ignores_powered_off_vms() {
        let mut off = fixtures::vm("vm-1");
        off.power_state = PowerState::PoweredOff;
        off.tools_status = Some(ToolsStatus::ToolsNotRunning);

        let mut inventory = fixtures::snapshot();
        inventory.virtual_machines = vec![off];

        let criteria = FilterCriteria {
            include_powered_off: true,
            ..FilterCriteria::default()
        };
        let engine = ProbeEngine::new(InventoryFilter::new(criteria).unwrap(), Box::new(ToolsCheck));
        let outcome = engine.execute(&inventory).unwrap();
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.overall, Severity::Ok);
    }

    #[test]
    fn test_consolidation_needed_warns() {
        let mut pending = fixtures::vm("vm-1");
        pending.consolidation_needed = true;

        let mut inventory = fixtures::snapshot();
        inventory.virtual_machines = vec![pending, fixtures::vm("vm-2")];

        let outcome = fixtures::run(Box::new(DiskConsolidationCheck), &inventory);
        assert_eq!(outcome.overall, Severity::Warning);
        assert_eq!(outcome.findings().count(), 1);
    }
}
