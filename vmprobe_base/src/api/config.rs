//! # Probe Configuration
//!
//! File-backed configuration for a probe run. The TOML file supplies the
//! baseline; command-line values are layered on top with the `with_*`
//! methods, so a flag always overrides the file.
//!
//! ```toml
//! timeout_secs = 15
//!
//! [filter]
//! exclude_resource_pools = ["Test"]
//! ignore_datastore_names = ["scratch"]
//!
//! [thresholds.datastore-usage]
//! warning = 85
//! critical = 92
//!
//! [pairing]
//! shared_attribute = "Location"
//! shared_separator = "-"
//!
//! [hardware_version]
//! minimum_required = "vmx-13"
//! ```

use crate::api::errors::ConfigurationError;
use crate::evaluation::{HardwareVersionOptions, PairingOptions};
use crate::types::criteria::FilterCriteria;
use crate::types::threshold::ThresholdOptions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Complete configuration for one probe invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeConfig {
    /// Wall-clock budget for the whole run
    pub timeout_secs: u64,

    pub filter: FilterCriteria,

    /// Threshold overrides keyed by check name
    pub thresholds: BTreeMap<String, ThresholdOptions>,

    pub pairing: PairingOptions,

    pub hardware_version: HardwareVersionOptions,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            filter: FilterCriteria::default(),
            thresholds: BTreeMap::new(),
            pairing: PairingOptions::default(),
            hardware_version: HardwareVersionOptions::default(),
        }
    }
}

impl ProbeConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigurationError> {
        toml::from_str(content).map_err(|e| ConfigurationError::load_failed("<inline>", e))
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigurationError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::load_failed(&display, e))?;
        toml::from_str(&content).map_err(|e| ConfigurationError::load_failed(&display, e))
    }

    /// Threshold overrides configured for `check`; empty when none
    pub fn thresholds_for(&self, check: &str) -> ThresholdOptions {
        self.thresholds.get(check).copied().unwrap_or_default()
    }

    pub fn with_timeout(mut self, timeout_secs: Option<u64>) -> Self {
        if let Some(timeout_secs) = timeout_secs {
            self.timeout_secs = timeout_secs;
        }
        self
    }

    pub fn with_filter(mut self, overrides: FilterCriteria) -> Self {
        self.filter = self.filter.merged_with(overrides);
        self
    }

    pub fn with_thresholds(mut self, check: &str, overrides: ThresholdOptions) -> Self {
        let merged = overrides.or(self.thresholds_for(check));
        if merged != ThresholdOptions::default() {
            self.thresholds.insert(check.to_string(), merged);
        }
        self
    }

    pub fn with_pairing(mut self, overrides: PairingOptions) -> Self {
        self.pairing = overrides.or(self.pairing);
        self
    }

    pub fn with_hardware_version(mut self, overrides: HardwareVersionOptions) -> Self {
        self.hardware_version = overrides.or(self.hardware_version);
        self
    }

    /// Checks shared by every probe; check-specific options are validated
    /// when the check is built
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.timeout_secs == 0 {
            return Err(ConfigurationError::invalid_value(
                "timeout",
                "0",
                "timeout must be at least one second",
            ));
        }
        self.filter.validate()
    }
}
