//! # Hardware-Version Evaluator
//!
//! Compares each in-scope VM's virtual hardware version against a baseline.
//! Exactly one [`HardwareVersionMode`] is active per evaluator; the mode is
//! chosen and validated when the evaluator is built.
//!
//! Known limitation: the outdated-by mode uses the newest version observed
//! among in-scope VMs as its baseline rather than an authoritative upstream
//! value, so the same inventory filtered differently can yield different
//! findings.

use crate::api::errors::ConfigurationError;
use crate::evaluation::{classify, scope_of, CheckEvaluation};
use crate::filter::ScopedInventory;
use crate::log_debug;
use crate::results::{EvaluationError, EvaluationResult, Observed, Severity};
use crate::types::hardware_version::HardwareVersion;
use crate::types::inventory::{AsInventoryObject, ObjectRef, VirtualMachine};
use crate::types::threshold::{Direction, ThresholdPair};
use serde::{Deserialize, Serialize};

pub const OPT_HOMOGENEOUS: &str = "homogeneous";
pub const OPT_OUTDATED_BY_WARNING: &str = "outdated-by-warning";
pub const OPT_OUTDATED_BY_CRITICAL: &str = "outdated-by-critical";
pub const OPT_MINIMUM_REQUIRED: &str = "minimum-required";
pub const OPT_DEFAULT_IS_MINIMUM: &str = "default-is-minimum";

/// Hardware-version mode flags as configured
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HardwareVersionOptions {
    pub homogeneous: bool,
    pub outdated_by_warning: Option<u32>,
    pub outdated_by_critical: Option<u32>,
    pub minimum_required: Option<HardwareVersion>,
    pub default_is_minimum: bool,
}

impl HardwareVersionOptions {
    /// Fill unset fields from `fallback`
    pub fn or(self, fallback: HardwareVersionOptions) -> HardwareVersionOptions {
        HardwareVersionOptions {
            homogeneous: self.homogeneous || fallback.homogeneous,
            outdated_by_warning: self.outdated_by_warning.or(fallback.outdated_by_warning),
            outdated_by_critical: self.outdated_by_critical.or(fallback.outdated_by_critical),
            minimum_required: self.minimum_required.or(fallback.minimum_required),
            default_is_minimum: self.default_is_minimum || fallback.default_is_minimum,
        }
    }
}

/// Compliance mode with its mode-specific parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HardwareVersionMode {
    /// Every VM must run the newest observed version; lagging VMs warn
    Homogeneous,
    /// Distance from the newest observed version, classified by the pair
    OutdatedBy(ThresholdPair<u32>),
    /// Fixed floor; VMs below it are critical
    MinimumRequired(HardwareVersion),
    /// Host or cluster default is the floor; VMs below it warn
    DefaultIsMinimum,
}

impl HardwareVersionMode {
    /// Select the single active mode; no flags at all selects `Homogeneous`
    pub fn from_options(options: &HardwareVersionOptions) -> Result<Self, ConfigurationError> {
        let mut selected: Vec<&'static str> = Vec::new();
        if options.homogeneous {
            selected.push(OPT_HOMOGENEOUS);
        }
        if options.outdated_by_warning.is_some() {
            selected.push(OPT_OUTDATED_BY_WARNING);
        } else if options.outdated_by_critical.is_some() {
            selected.push(OPT_OUTDATED_BY_CRITICAL);
        }
        if options.minimum_required.is_some() {
            selected.push(OPT_MINIMUM_REQUIRED);
        }
        if options.default_is_minimum {
            selected.push(OPT_DEFAULT_IS_MINIMUM);
        }

        if let [first, second, ..] = selected.as_slice() {
            return Err(ConfigurationError::conflict(first, second));
        }

        if let Some(pair) = ThresholdPair::from_options(
            options.outdated_by_warning,
            options.outdated_by_critical,
            OPT_OUTDATED_BY_WARNING,
            OPT_OUTDATED_BY_CRITICAL,
        )? {
            return Ok(Self::OutdatedBy(pair));
        }
        if let Some(minimum) = options.minimum_required {
            return Ok(Self::MinimumRequired(minimum));
        }
        if options.default_is_minimum {
            return Ok(Self::DefaultIsMinimum);
        }
        Ok(Self::Homogeneous)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Homogeneous => OPT_HOMOGENEOUS,
            Self::OutdatedBy(_) => "outdated-by",
            Self::MinimumRequired(_) => OPT_MINIMUM_REQUIRED,
            Self::DefaultIsMinimum => OPT_DEFAULT_IS_MINIMUM,
        }
    }
}

/// Evaluator bound to one immutable mode
#[derive(Debug, Clone)]
pub struct HardwareVersionEvaluator {
    mode: HardwareVersionMode,
}

impl HardwareVersionEvaluator {
    pub fn new(mode: HardwareVersionMode) -> Self {
        Self { mode }
    }

    pub fn from_options(options: &HardwareVersionOptions) -> Result<Self, ConfigurationError> {
        Ok(Self::new(HardwareVersionMode::from_options(options)?))
    }

    /// Every in-scope VM
    pub fn scope(&self, scoped: &ScopedInventory<'_>) -> Vec<ObjectRef> {
        scope_of(scoped.virtual_machines.iter().copied())
    }

    /// Evaluate every in-scope VM
    ///
    /// Fails with `UpstreamDataUnavailable` when the default-is-minimum mode
    /// finds no default version for a VM.
    pub fn evaluate(&self, scoped: &ScopedInventory<'_>) -> Result<CheckEvaluation, EvaluationError> {
        let observed_max = scoped
            .virtual_machines
            .iter()
            .map(|vm| vm.hardware_version)
            .max();

        log_debug!("Evaluating hardware versions",
            "mode" => self.mode.name(),
            "vms" => scoped.virtual_machines.len(),
            "observed_max" => observed_max.map_or_else(|| "none".to_string(), |v| v.to_string())
        );

        let mut evaluation = CheckEvaluation::new();
        for vm in &scoped.virtual_machines {
            let result = match self.mode {
                HardwareVersionMode::Homogeneous => {
                    Self::against_newest(vm, observed_max.unwrap_or(vm.hardware_version))
                }
                HardwareVersionMode::OutdatedBy(pair) => {
                    Self::outdated_by(vm, observed_max.unwrap_or(vm.hardware_version), pair)
                }
                HardwareVersionMode::MinimumRequired(minimum) => Self::minimum(vm, minimum),
                HardwareVersionMode::DefaultIsMinimum => {
                    let (baseline, source) = Self::default_baseline(vm, scoped)?;
                    Self::against_default(vm, baseline, source)
                }
            };
            evaluation.record(result);
        }

        Ok(evaluation)
    }

    fn against_newest(vm: &VirtualMachine, baseline: HardwareVersion) -> EvaluationResult {
        let version = vm.hardware_version;
        if version < baseline {
            EvaluationResult::warning(
                vm.object_ref(),
                Observed::Version(version),
                format!(
                    "hardware version {} is older than newest in-scope version {}",
                    version, baseline
                ),
            )
        } else {
            EvaluationResult::ok(
                vm.object_ref(),
                Observed::Version(version),
                format!("hardware version {} is current", version),
            )
        }
    }

    fn outdated_by(
        vm: &VirtualMachine,
        baseline: HardwareVersion,
        pair: ThresholdPair<u32>,
    ) -> EvaluationResult {
        let version = vm.hardware_version;
        let delta = version.behind(baseline);
        let thresholds = ThresholdPair::new(f64::from(pair.warning), f64::from(pair.critical));
        let severity = classify(f64::from(delta), &thresholds, Direction::HigherIsWorse);

        EvaluationResult::new(
            vm.object_ref(),
            Observed::Version(version),
            severity,
            format!(
                "hardware version {} is {} version(s) behind {} ({})",
                version, delta, baseline, pair
            ),
        )
    }

    fn minimum(vm: &VirtualMachine, minimum: HardwareVersion) -> EvaluationResult {
        let version = vm.hardware_version;
        if version < minimum {
            EvaluationResult::critical(
                vm.object_ref(),
                Observed::Version(version),
                format!(
                    "hardware version {} is below required minimum {}",
                    version, minimum
                ),
            )
        } else {
            EvaluationResult::ok(
                vm.object_ref(),
                Observed::Version(version),
                format!("hardware version {} meets minimum {}", version, minimum),
            )
        }
    }

    fn against_default(
        vm: &VirtualMachine,
        baseline: HardwareVersion,
        source: &str,
    ) -> EvaluationResult {
        let version = vm.hardware_version;
        let severity = if version < baseline {
            Severity::Warning
        } else {
            Severity::Ok
        };
        EvaluationResult::new(
            vm.object_ref(),
            Observed::Version(version),
            severity,
            format!(
                "hardware version {} compared with {} default {}",
                version, source, baseline
            ),
        )
    }

    /// Host default, then cluster default, then the snapshot-wide default
    fn default_baseline(
        vm: &VirtualMachine,
        scoped: &ScopedInventory<'_>,
    ) -> Result<(HardwareVersion, &'static str), EvaluationError> {
        let host = vm.host.as_deref().and_then(|id| scoped.host(id));

        if let Some(version) = host.and_then(|h| h.default_hardware_version) {
            return Ok((version, "host"));
        }

        let cluster = host
            .and_then(|h| h.cluster.as_deref())
            .and_then(|id| scoped.cluster(id));
        if let Some(version) = cluster.and_then(|c| c.default_hardware_version) {
            return Ok((version, "cluster"));
        }

        if let Some(version) = scoped.snapshot().default_hardware_version {
            return Ok((version, "environment"));
        }

        Err(EvaluationError::upstream_data_unavailable(format!(
            "no default hardware version known for the host or cluster of VM '{}'",
            vm.name
        )))
    }
}
