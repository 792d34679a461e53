//! Command-line surface of the `vmprobe` binary
//!
//! Flags are layered over the optional TOML configuration file: list options
//! extend the file's lists, scalar options replace the file's values.

use clap::{Parser, ValueEnum};
use std::collections::BTreeSet;
use std::path::PathBuf;
use vmprobe_base::api::{ConfigurationError, ProbeConfig};
use vmprobe_base::evaluation::{HardwareVersionOptions, PairingOptions};
use vmprobe_base::types::{
    AlarmStatus, FilterCriteria, HardwareVersion, ManagedEntityType, ThresholdOptions,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "vmprobe")]
#[command(about = "vSphere inventory monitoring probe", version)]
pub struct Args {
    /// Check to run (see --list)
    #[arg(required_unless_present = "list")]
    pub check: Option<String>,

    /// Inventory snapshot JSON produced by the fetcher
    #[arg(long, short = 'i', required_unless_present = "list")]
    pub inventory: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, short = 'c', env = "VMPROBE_CONFIG")]
    pub config: Option<PathBuf>,

    /// List available checks and exit
    #[arg(long, default_value_t = false)]
    pub list: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Wall-clock budget in seconds
    #[arg(long, short = 't')]
    pub timeout: Option<u64>,

    /// Debug logging on stderr
    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,

    #[arg(long, short = 'w')]
    pub warning: Option<f64>,

    #[arg(long, short = 'C')]
    pub critical: Option<f64>,

    // Filter
    #[arg(long = "include-rp", value_delimiter = ',')]
    pub include_resource_pools: Vec<String>,

    #[arg(long = "exclude-rp", value_delimiter = ',')]
    pub exclude_resource_pools: Vec<String>,

    #[arg(long = "ignore-vm", value_delimiter = ',')]
    pub ignore_vm_names: Vec<String>,

    #[arg(long = "ignore-datastore", value_delimiter = ',')]
    pub ignore_datastore_names: Vec<String>,

    #[arg(long, default_value_t = false)]
    pub include_powered_off: bool,

    #[arg(long = "include-type", value_delimiter = ',')]
    pub include_managed_types: Vec<ManagedEntityType>,

    #[arg(long = "exclude-type", value_delimiter = ',')]
    pub exclude_managed_types: Vec<ManagedEntityType>,

    #[arg(long = "include-acknowledged", default_value_t = false)]
    pub include_acknowledged_alarms: bool,

    #[arg(long = "include-name", value_delimiter = ',')]
    pub include_alarm_names: Vec<String>,

    #[arg(long = "exclude-name", value_delimiter = ',')]
    pub exclude_alarm_names: Vec<String>,

    #[arg(long = "include-status", value_delimiter = ',')]
    pub include_alarm_statuses: Vec<AlarmStatus>,

    #[arg(long = "exclude-status", value_delimiter = ',')]
    pub exclude_alarm_statuses: Vec<AlarmStatus>,

    // Pairing
    #[arg(long = "custom-attribute")]
    pub shared_attribute: Option<String>,

    #[arg(long = "separator")]
    pub shared_separator: Option<String>,

    #[arg(long)]
    pub host_attribute: Option<String>,

    #[arg(long)]
    pub host_separator: Option<String>,

    #[arg(long)]
    pub datastore_attribute: Option<String>,

    #[arg(long)]
    pub datastore_separator: Option<String>,

    /// Skip hosts and datastores without the pairing attribute
    #[arg(long = "ignore-missing-attributes", default_value_t = false)]
    pub ignore_missing: bool,

    // Hardware version
    #[arg(long, default_value_t = false)]
    pub homogeneous: bool,

    #[arg(long)]
    pub outdated_by_warning: Option<u32>,

    #[arg(long)]
    pub outdated_by_critical: Option<u32>,

    #[arg(long)]
    pub minimum_required: Option<HardwareVersion>,

    #[arg(long, default_value_t = false)]
    pub default_is_minimum: bool,
}

fn to_set<T: Ord + Clone>(values: &[T]) -> BTreeSet<T> {
    values.iter().cloned().collect()
}

impl Args {
    /// File configuration (when given) with command-line overrides applied
    pub fn load_config(&self) -> Result<ProbeConfig, ConfigurationError> {
        let base = match &self.config {
            Some(path) => ProbeConfig::from_file(path)?,
            None => ProbeConfig::default(),
        };
        Ok(self.apply_to(base))
    }

    pub fn apply_to(&self, config: ProbeConfig) -> ProbeConfig {
        let mut config = config
            .with_timeout(self.timeout)
            .with_filter(self.filter_overrides())
            .with_pairing(self.pairing_overrides())
            .with_hardware_version(self.hardware_version_overrides());

        if let Some(check) = &self.check {
            config = config.with_thresholds(
                check,
                ThresholdOptions {
                    warning: self.warning,
                    critical: self.critical,
                },
            );
        }
        config
    }

    fn filter_overrides(&self) -> FilterCriteria {
        FilterCriteria {
            include_resource_pools: to_set(&self.include_resource_pools),
            exclude_resource_pools: to_set(&self.exclude_resource_pools),
            ignore_vm_names: to_set(&self.ignore_vm_names),
            ignore_datastore_names: to_set(&self.ignore_datastore_names),
            include_powered_off: self.include_powered_off,
            include_managed_types: to_set(&self.include_managed_types),
            exclude_managed_types: to_set(&self.exclude_managed_types),
            include_acknowledged_alarms: self.include_acknowledged_alarms,
            include_alarm_names: to_set(&self.include_alarm_names),
            exclude_alarm_names: to_set(&self.exclude_alarm_names),
            include_alarm_statuses: to_set(&self.include_alarm_statuses),
            exclude_alarm_statuses: to_set(&self.exclude_alarm_statuses),
        }
    }

    fn pairing_overrides(&self) -> PairingOptions {
        PairingOptions {
            shared_attribute: self.shared_attribute.clone(),
            shared_separator: self.shared_separator.clone(),
            host_attribute: self.host_attribute.clone(),
            host_separator: self.host_separator.clone(),
            datastore_attribute: self.datastore_attribute.clone(),
            datastore_separator: self.datastore_separator.clone(),
            ignore_missing: self.ignore_missing,
        }
    }

    fn hardware_version_overrides(&self) -> HardwareVersionOptions {
        HardwareVersionOptions {
            homogeneous: self.homogeneous,
            outdated_by_warning: self.outdated_by_warning,
            outdated_by_critical: self.outdated_by_critical,
            minimum_required: self.minimum_required,
            default_is_minimum: self.default_is_minimum,
        }
    }
}
