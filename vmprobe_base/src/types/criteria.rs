//! Declarative inclusion/exclusion rules for the inventory filter

use crate::api::errors::ConfigurationError;
use crate::types::inventory::{AlarmStatus, ManagedEntityType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Filter configuration shared by every check
///
/// Each include/exclude pair is mutually exclusive; [`FilterCriteria::validate`]
/// must pass before the criteria are applied to any object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterCriteria {
    /// Only VMs in one of these pools are evaluated
    pub include_resource_pools: BTreeSet<String>,
    /// VMs in one of these pools are skipped
    pub exclude_resource_pools: BTreeSet<String>,
    pub ignore_vm_names: BTreeSet<String>,
    pub ignore_datastore_names: BTreeSet<String>,
    pub include_powered_off: bool,

    /// Alarm entity types to keep
    pub include_managed_types: BTreeSet<ManagedEntityType>,
    /// Alarm entity types to drop
    pub exclude_managed_types: BTreeSet<ManagedEntityType>,
    pub include_acknowledged_alarms: bool,
    /// Case-insensitive substrings of alarm names to keep
    pub include_alarm_names: BTreeSet<String>,
    /// Case-insensitive substrings of alarm names to drop
    pub exclude_alarm_names: BTreeSet<String>,
    pub include_alarm_statuses: BTreeSet<AlarmStatus>,
    pub exclude_alarm_statuses: BTreeSet<AlarmStatus>,
}

impl FilterCriteria {
    /// Reject criteria with both sides of an include/exclude axis populated
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let axes = [
            (
                !self.include_resource_pools.is_empty(),
                !self.exclude_resource_pools.is_empty(),
                "include-rp",
                "exclude-rp",
            ),
            (
                !self.include_managed_types.is_empty(),
                !self.exclude_managed_types.is_empty(),
                "include-type",
                "exclude-type",
            ),
            (
                !self.include_alarm_names.is_empty(),
                !self.exclude_alarm_names.is_empty(),
                "include-name",
                "exclude-name",
            ),
            (
                !self.include_alarm_statuses.is_empty(),
                !self.exclude_alarm_statuses.is_empty(),
                "include-status",
                "exclude-status",
            ),
        ];

        for (include_set, exclude_set, include_option, exclude_option) in axes {
            if include_set && exclude_set {
                return Err(ConfigurationError::conflict(include_option, exclude_option));
            }
        }

        Ok(())
    }

    /// Layer `overrides` on top: sets are unioned, flags are OR-ed
    pub fn merged_with(mut self, overrides: FilterCriteria) -> FilterCriteria {
        self.include_resource_pools
            .extend(overrides.include_resource_pools);
        self.exclude_resource_pools
            .extend(overrides.exclude_resource_pools);
        self.ignore_vm_names.extend(overrides.ignore_vm_names);
        self.ignore_datastore_names
            .extend(overrides.ignore_datastore_names);
        self.include_powered_off |= overrides.include_powered_off;
        self.include_managed_types
            .extend(overrides.include_managed_types);
        self.exclude_managed_types
            .extend(overrides.exclude_managed_types);
        self.include_acknowledged_alarms |= overrides.include_acknowledged_alarms;
        self.include_alarm_names.extend(overrides.include_alarm_names);
        self.exclude_alarm_names.extend(overrides.exclude_alarm_names);
        self.include_alarm_statuses
            .extend(overrides.include_alarm_statuses);
        self.exclude_alarm_statuses
            .extend(overrides.exclude_alarm_statuses);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn names(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_default_criteria_are_valid() {
        assert!(FilterCriteria::default().validate().is_ok());
    }

    #[test]
    fn test_pool_include_and_exclude_conflict() {
        let criteria = FilterCriteria {
            include_resource_pools: names(&["Production"]),
            exclude_resource_pools: names(&["Test"]),
            ..Default::default()
        };

        assert_matches!(
            criteria.validate(),
            Err(ConfigurationError::Conflict { ref first, ref second })
                if first == "include-rp" && second == "exclude-rp"
        );
    }

    #[test]
    fn test_managed_type_include_and_exclude_conflict() {
        let criteria = FilterCriteria {
            include_managed_types: [ManagedEntityType::Datastore].into_iter().collect(),
            exclude_managed_types: [ManagedEntityType::HostSystem].into_iter().collect(),
            ..Default::default()
        };
        assert_matches!(criteria.validate(), Err(ConfigurationError::Conflict { .. }));
    }

    #[test]
    fn test_alarm_status_conflict() {
        let criteria = FilterCriteria {
            include_alarm_statuses: [AlarmStatus::Red].into_iter().collect(),
            exclude_alarm_statuses: [AlarmStatus::Yellow].into_iter().collect(),
            ..Default::default()
        };
        assert_matches!(criteria.validate(), Err(ConfigurationError::Conflict { .. }));
    }

    #[test]
    fn test_one_sided_axes_are_valid() {
        let criteria = FilterCriteria {
            exclude_resource_pools: names(&["Test"]),
            include_managed_types: [ManagedEntityType::VirtualMachine].into_iter().collect(),
            include_alarm_names: names(&["cpu"]),
            ..Default::default()
        };
        assert!(criteria.validate().is_ok());
    }

    #[test]
    fn test_merge_unions_sets_and_flags() {
        let file = FilterCriteria {
            ignore_vm_names: names(&["vm-a"]),
            ..Default::default()
        };
        let cli = FilterCriteria {
            ignore_vm_names: names(&["vm-b"]),
            include_powered_off: true,
            ..Default::default()
        };

        let merged = file.merged_with(cli);
        assert_eq!(merged.ignore_vm_names, names(&["vm-a", "vm-b"]));
        assert!(merged.include_powered_off);
    }

    #[test]
    fn test_toml_round_trip_of_criteria() {
        let criteria: FilterCriteria = toml::from_str(
            r#"
            include_resource_pools = ["Production"]
            include_managed_types = ["Datastore", "HostSystem"]
            include_alarm_statuses = ["red"]
            "#,
        )
        .unwrap();

        assert_eq!(criteria.include_resource_pools, names(&["Production"]));
        assert!(criteria
            .include_managed_types
            .contains(&ManagedEntityType::HostSystem));
        assert!(criteria.include_alarm_statuses.contains(&AlarmStatus::Red));
        assert!(!criteria.include_powered_off);
    }
}
