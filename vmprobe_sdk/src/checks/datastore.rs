//! Datastore usage check

use crate::checks::{resolve_thresholds, threshold_result, BoxedCheck};
use vmprobe_base::api::ProbeConfig;
use vmprobe_base::evaluation::{scope_of, CheckEvaluation};
use vmprobe_base::filter::ScopedInventory;
use vmprobe_base::results::{EvaluationError, EvaluationResult, Observed};
use vmprobe_base::strategies::InventoryCheck;
use vmprobe_base::types::{AsInventoryObject, ObjectRef, ThresholdPair};

pub const NAME: &str = "datastore-usage";

/// Used-space percentage per datastore
#[derive(Debug, Clone)]
pub struct DatastoreUsageCheck {
    thresholds: ThresholdPair<f64>,
}

impl DatastoreUsageCheck {
    pub const DESCRIPTION: &str = "Used space of each datastore as a percentage of capacity";

    pub const DEFAULT_THRESHOLDS: ThresholdPair<f64> = ThresholdPair {
        warning: 90.0,
        critical: 95.0,
    };

    pub fn new(thresholds: ThresholdPair<f64>) -> Self {
        Self { thresholds }
    }

    pub fn from_config(config: &ProbeConfig) -> BoxedCheck {
        let thresholds = resolve_thresholds(config, NAME, Self::DEFAULT_THRESHOLDS)?;
        Ok(Box::new(Self::new(thresholds)))
    }
}

impl InventoryCheck for DatastoreUsageCheck {
    fn check_name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    fn scope(&self, scoped: &ScopedInventory<'_>) -> Vec<ObjectRef> {
        scope_of(scoped.datastores.iter().copied())
    }

    fn evaluate(&self, scoped: &ScopedInventory<'_>) -> Result<CheckEvaluation, EvaluationError> {
        Ok(scoped
            .datastores
            .iter()
            .map(|ds| {
                if !ds.accessible {
                    return EvaluationResult::critical(
                        ds.object_ref(),
                        Observed::Status("inaccessible".to_string()),
                        "datastore is not accessible",
                    );
                }
                match ds.used_percent() {
                    Some(used) => threshold_result(
                        ds.object_ref(),
                        used,
                        Observed::Percent(used),
                        &self.thresholds,
                        "usage",
                    ),
                    None => EvaluationResult::warning(
                        ds.object_ref(),
                        Observed::Absent,
                        "datastore reports no capacity",
                    ),
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

    const GIB: u64 = 1024 * 1024 * 1024;

    #[test]
    fn test_usage_classification() {
        let mut snapshot = fixtures::snapshot();
        snapshot.datastores = vec![
            fixtures::datastore("ds-1", 100 * GIB, 50 * GIB),
            fixtures::datastore("ds-2", 100 * GIB, 8 * GIB),
            fixtures::datastore("ds-3", 100 * GIB, 3 * GIB),
        ];

        let outcome = fixtures::run(
            DatastoreUsageCheck::from_config(&ProbeConfig::default()).unwrap(),
            &snapshot,
        );

        let severities: Vec<Severity> = outcome.results.iter().map(|r| r.severity).collect();
        assert_eq!(
            severities,
            vec![Severity::Ok, Severity::Warning, Severity::Critical]
        );
        assert_eq!(outcome.overall, Severity::Critical);
    }

    #[test]
    fn test_configured_thresholds_apply() {
        let config = ProbeConfig::from_toml_str(
            "[thresholds.datastore-usage]\nwarning = 40\ncritical = 60",
        )
        .unwrap();
        let mut snapshot = fixtures::snapshot();
        snapshot.datastores = vec![fixtures::datastore("ds-1", 100 * GIB, 50 * GIB)];

        let outcome = fixtures::run(DatastoreUsageCheck::from_config(&config).unwrap(), &snapshot);
        assert_eq!(outcome.overall, Severity::Warning);
        assert!(outcome.results[0].reason.contains("50.00%"));
    }

    #[test]
    fn test_inaccessible_and_unknown_capacity() {
        let mut inaccessible = fixtures::datastore("ds-1", 100 * GIB, 90 * GIB);
        inaccessible.accessible = false;
        let mut snapshot = fixtures::snapshot();
        snapshot.datastores = vec![inaccessible, fixtures::datastore("ds-2", 0, 0)];

        let outcome = fixtures::run(Box::new(DatastoreUsageCheck::new(
            DatastoreUsageCheck::DEFAULT_THRESHOLDS,
        )), &snapshot);
        assert_eq!(outcome.results[0].severity, Severity::Critical);
        assert_eq!(outcome.results[1].severity, Severity::Warning);
        assert_eq!(outcome.results[1].observed, Observed::Absent);
    }

    #[test]
    fn test_half_threshold_pair_is_rejected() {
        let config = ProbeConfig::from_toml_str("[thresholds.datastore-usage]\nwarning = 40").unwrap();
        assert!(DatastoreUsageCheck::from_config(&config).is_err());
    }
}
