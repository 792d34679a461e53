//! Host memory and CPU usage checks

use crate::checks::{resolve_thresholds, threshold_result, BoxedCheck};
use vmprobe_base::api::ProbeConfig;
use vmprobe_base::evaluation::{scope_of, CheckEvaluation};
use vmprobe_base::filter::ScopedInventory;
use vmprobe_base::results::{EvaluationError, EvaluationResult, Observed};
use vmprobe_base::strategies::InventoryCheck;
use vmprobe_base::types::{AsInventoryObject, Host, ObjectRef, ThresholdPair};

pub const MEMORY_NAME: &str = "host-memory";
pub const CPU_NAME: &str = "host-cpu";

const DEFAULT_THRESHOLDS: ThresholdPair<f64> = ThresholdPair {
    warning: 80.0,
    critical: 95.0,
};

fn usage_percent(used: u64, total: u64) -> Option<f64> {
    if total == 0 {
        return None;
    }
    Some(used as f64 / total as f64 * 100.0)
}

/// Shared evaluation for both host usage checks
fn evaluate_hosts(
    scoped: &ScopedInventory<'_>,
    thresholds: &ThresholdPair<f64>,
    label: &str,
    usage: impl Fn(&Host) -> Option<f64>,
) -> CheckEvaluation {
    scoped
        .hosts()
        .iter()
        .map(|host| {
            if host.in_maintenance {
                return EvaluationResult::ok(
                    host.object_ref(),
                    Observed::Status("maintenance".to_string()),
                    "host is in maintenance mode",
                );
            }
            match usage(host) {
                Some(percent) => threshold_result(
                    host.object_ref(),
                    percent,
                    Observed::Percent(percent),
                    thresholds,
                    label,
                ),
                None => EvaluationResult::warning(
                    host.object_ref(),
                    Observed::Absent,
                    format!("host reports no {} capacity", label),
                ),
            }
        })
        .collect()
}

/// Memory usage percentage per host
#[derive(Debug, Clone)]
pub struct HostMemoryCheck {
    thresholds: ThresholdPair<f64>,
}

impl HostMemoryCheck {
    pub const DESCRIPTION: &str = "Memory usage of each host as a percentage of installed memory";

    pub fn new(thresholds: ThresholdPair<f64>) -> Self {
        Self { thresholds }
    }

    pub fn from_config(config: &ProbeConfig) -> BoxedCheck {
        let thresholds = resolve_thresholds(config, MEMORY_NAME, DEFAULT_THRESHOLDS)?;
        Ok(Box::new(Self::new(thresholds)))
    }
}

impl InventoryCheck for HostMemoryCheck {
    fn check_name(&self) -> &str {
        MEMORY_NAME
    }

    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    fn scope(&self, scoped: &ScopedInventory<'_>) -> Vec<ObjectRef> {
        scope_of(scoped.hosts())
    }

    fn evaluate(&self, scoped: &ScopedInventory<'_>) -> Result<CheckEvaluation, EvaluationError> {
        Ok(evaluate_hosts(scoped, &self.thresholds, "memory", |host| {
            usage_percent(host.memory_usage_bytes, host.memory_total_bytes)
        }))
    }
}

/// CPU usage percentage per host
#[derive(Debug, Clone)]
pub struct HostCpuCheck {
    thresholds: ThresholdPair<f64>,
}

impl HostCpuCheck {
    pub const DESCRIPTION: &str = "CPU usage of each host as a percentage of total capacity";

    pub fn new(thresholds: ThresholdPair<f64>) -> Self {
        Self { thresholds }
    }

    pub fn from_config(config: &ProbeConfig) -> BoxedCheck {
        let thresholds = resolve_thresholds(config, CPU_NAME, DEFAULT_THRESHOLDS)?;
        Ok(Box::new(Self::new(thresholds)))
    }
}

impl InventoryCheck for HostCpuCheck {
    fn check_name(&self) -> &str {
        CPU_NAME
    }

    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    fn scope(&self, scoped: &ScopedInventory<'_>) -> Vec<ObjectRef> {
        scope_of(scoped.hosts())
    }

    fn evaluate(&self, scoped: &ScopedInventory<'_>) -> Result<CheckEvaluation, EvaluationError> {
        Ok(evaluate_hosts(scoped, &self.thresholds, "cpu", |host| {
            usage_percent(host.cpu_usage_mhz, host.cpu_total_mhz)
        }))
    }
}
