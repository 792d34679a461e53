//! VM snapshot checks: age of the oldest snapshot, snapshot count and the
//! cumulative snapshot size

use crate::checks::{resolve_thresholds, threshold_result, BoxedCheck, SECONDS_PER_DAY};
use vmprobe_base::api::ProbeConfig;
use vmprobe_base::evaluation::{scope_of, CheckEvaluation};
use vmprobe_base::filter::ScopedInventory;
use vmprobe_base::results::{EvaluationError, EvaluationResult, Observed};
use vmprobe_base::strategies::InventoryCheck;
use vmprobe_base::types::{AsInventoryObject, ObjectRef, ThresholdPair, BYTES_PER_GIB};

pub const AGE_NAME: &str = "snapshots-age";
pub const COUNT_NAME: &str = "snapshots-count";
pub const SIZE_NAME: &str = "snapshots-size";

/// Age in days of each VM's oldest snapshot
#[derive(Debug, Clone)]
pub struct SnapshotAgeCheck {
    thresholds: ThresholdPair<f64>,
}

impl SnapshotAgeCheck {
    pub const DESCRIPTION: &str = "Age in days of the oldest snapshot of each VM";

    pub const DEFAULT_THRESHOLDS: ThresholdPair<f64> = ThresholdPair {
        warning: 1.0,
        critical: 2.0,
    };

    pub fn new(thresholds: ThresholdPair<f64>) -> Self {
        Self { thresholds }
    }

    pub fn from_config(config: &ProbeConfig) -> BoxedCheck {
        let thresholds = resolve_thresholds(config, AGE_NAME, Self::DEFAULT_THRESHOLDS)?;
        Ok(Box::new(Self::new(thresholds)))
    }
}

impl InventoryCheck for SnapshotAgeCheck {
    fn check_name(&self) -> &str {
        AGE_NAME
    }

    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    fn scope(&self, scoped: &ScopedInventory<'_>) -> Vec<ObjectRef> {
        scope_of(scoped.virtual_machines.iter().copied())
    }

    fn evaluate(&self, scoped: &ScopedInventory<'_>) -> Result<CheckEvaluation, EvaluationError> {
        let now = scoped.collected_at();

        Ok(scoped
            .virtual_machines
            .iter()
            .map(|vm| match vm.oldest_snapshot() {
                None => EvaluationResult::ok(vm.object_ref(), Observed::Count(0), "no snapshots"),
                Some(oldest) => {
                    // Snapshots stamped after collection count as brand new
                    let seconds = (now - oldest.created).num_seconds().max(0);
                    let days = seconds as f64 / SECONDS_PER_DAY;
                    threshold_result(
                        vm.object_ref(),
                        days,
                        Observed::Days(days),
                        &self.thresholds,
                        &format!("oldest snapshot '{}' age", oldest.name),
                    )
                }
            })
            .collect())
    }
}

/// Number of snapshots per VM
#[derive(Debug, Clone)]
pub struct SnapshotCountCheck {
    thresholds: ThresholdPair<f64>,
}

impl SnapshotCountCheck {
    pub const DESCRIPTION: &str = "Number of snapshots of each VM";

    pub const DEFAULT_THRESHOLDS: ThresholdPair<f64> = ThresholdPair {
        warning: 4.0,
        critical: 25.0,
    };

    pub fn new(thresholds: ThresholdPair<f64>) -> Self {
        Self { thresholds }
    }

    pub fn from_config(config: &ProbeConfig) -> BoxedCheck {
        let thresholds = resolve_thresholds(config, COUNT_NAME, Self::DEFAULT_THRESHOLDS)?;
        Ok(Box::new(Self::new(thresholds)))
    }
}

impl InventoryCheck for SnapshotCountCheck {
    fn check_name(&self) -> &str {
        COUNT_NAME
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
                let count = vm.snapshots.len() as u64;
                threshold_result(
                    vm.object_ref(),
                    count as f64,
                    Observed::Count(count),
                    &self.thresholds,
                    "snapshot count",
                )
            })
            .collect())
    }
}

/// Cumulative snapshot size in GB per VM
#[derive(Debug, Clone)]
pub struct SnapshotSizeCheck {
    thresholds: ThresholdPair<f64>,
}

impl SnapshotSizeCheck {
    pub const DESCRIPTION: &str = "Cumulative size in GB of the snapshots of each VM";

    pub const DEFAULT_THRESHOLDS: ThresholdPair<f64> = ThresholdPair {
        warning: 20.0,
        critical: 40.0,
    };

    pub fn new(thresholds: ThresholdPair<f64>) -> Self {
        Self { thresholds }
    }

    pub fn from_config(config: &ProbeConfig) -> BoxedCheck {
        let thresholds = resolve_thresholds(config, SIZE_NAME, Self::DEFAULT_THRESHOLDS)?;
        Ok(Box::new(Self::new(thresholds)))
    }
}

impl InventoryCheck for SnapshotSizeCheck {
    fn check_name(&self) -> &str {
        SIZE_NAME
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
                let gigabytes = vm.snapshots_size_bytes() as f64 / BYTES_PER_GIB;
                threshold_result(
                    vm.object_ref(),
                    gigabytes,
                    Observed::Gigabytes(gigabytes),
                    &self.thresholds,
                    "snapshot size",
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::fixtures;
    use chrono::Duration;
    use vmprobe_base::results::Severity;
    use vmprobe_base::types::VmSnapshot;

    fn snapshot_taken(id: &str, hours_ago: i64, size_gib: u64) -> VmSnapshot {
        VmSnapshot {
            id: id.to_string(),
            name: format!("snap-{}", id),
            created: fixtures::collected_at() - Duration::hours(hours_ago),
            size_bytes: size_gib * BYTES_PER_GIB as u64,
        }
    }

    #[test]
    fn test_age_uses_collection_time_and_oldest_snapshot() {
        let mut fresh = fixtures::vm("vm-1");
        fresh.snapshots = vec![snapshot_taken("a", 2, 1)];
        let mut stale = fixtures::vm("vm-2");
        stale.snapshots = vec![snapshot_taken("b", 2, 1), snapshot_taken("c", 30, 1)];
        let mut ancient = fixtures::vm("vm-3");
        ancient.snapshots = vec![snapshot_taken("d", 72, 1)];
        let none = fixtures::vm("vm-4");

        let mut inventory = fixtures::snapshot();
        inventory.virtual_machines = vec![fresh, stale, ancient, none];

        let outcome = fixtures::run(
            SnapshotAgeCheck::from_config(&ProbeConfig::default()).unwrap(),
            &inventory,
        );
        let severities: Vec<Severity> = outcome.results.iter().map(|r| r.severity).collect();
        assert_eq!(
            severities,
            vec![Severity::Ok, Severity::Warning, Severity::Critical, Severity::Ok]
        );
        assert!(outcome.results[1].reason.contains("snap-c"));
        assert_eq!(outcome.results[3].reason, "no snapshots");
    }

    #[test]
    fn test_count_thresholds() {
        let mut many = fixtures::vm("vm-1");
        many.snapshots = (0..5).map(|i| snapshot_taken(&i.to_string(), 1, 0)).collect();

        let mut inventory = fixtures::snapshot();
        inventory.virtual_machines = vec![many, fixtures::vm("vm-2")];

        let outcome = fixtures::run(
            SnapshotCountCheck::from_config(&ProbeConfig::default()).unwrap(),
            &inventory,
        );
        assert_eq!(outcome.results[0].severity, Severity::Warning);
        assert_eq!(outcome.results[0].observed, Observed::Count(5));
        assert_eq!(outcome.results[1].severity, Severity::Ok);
    }

    #[test]
    fn test_size_sums_all_snapshots() {
        let mut large = fixtures::vm("vm-1");
        large.snapshots = vec![snapshot_taken("a", 1, 25), snapshot_taken("b", 1, 20)];

        let mut inventory = fixtures::snapshot();
        inventory.virtual_machines = vec![large];

        let outcome = fixtures::run(
            SnapshotSizeCheck::from_config(&ProbeConfig::default()).unwrap(),
            &inventory,
        );
        assert_eq!(outcome.overall, Severity::Critical);
        assert_eq!(outcome.results[0].observed, Observed::Gigabytes(45.0));
    }
}
