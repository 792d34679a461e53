//! # Evaluation Result Types
//!
//! Per-object records produced by evaluators and the final outcome of one
//! probe run. Designed for serialization to JSON next to the plugin text.

use crate::results::Severity;
use crate::types::hardware_version::HardwareVersion;
use crate::types::inventory::ObjectRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Observed fact a severity was derived from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Observed {
    Percent(f64),
    Count(u64),
    Days(f64),
    Gigabytes(f64),
    Version(HardwareVersion),
    /// Derived comparison key
    Key(String),
    /// Free-form status or description
    Status(String),
    /// The source value does not exist on the object
    Absent,
}

impl fmt::Display for Observed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent(value) => write!(f, "{:.2}%", value),
            Self::Count(value) => write!(f, "{}", value),
            Self::Days(value) => write!(f, "{:.2} days", value),
            Self::Gigabytes(value) => write!(f, "{:.2} GB", value),
            Self::Version(version) => write!(f, "{}", version),
            Self::Key(key) => write!(f, "key '{}'", key),
            Self::Status(status) => f.write_str(status),
            Self::Absent => f.write_str("absent"),
        }
    }
}

/// Classification of one inventory object for the active check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub object: ObjectRef,
    pub observed: Observed,
    pub severity: Severity,
    /// Human-readable reason for the severity
    pub reason: String,
}

impl EvaluationResult {
    pub fn new(
        object: ObjectRef,
        observed: Observed,
        severity: Severity,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            object,
            observed,
            severity,
            reason: reason.into(),
        }
    }

    pub fn ok(object: ObjectRef, observed: Observed, reason: impl Into<String>) -> Self {
        Self::new(object, observed, Severity::Ok, reason)
    }

    pub fn warning(object: ObjectRef, observed: Observed, reason: impl Into<String>) -> Self {
        Self::new(object, observed, Severity::Warning, reason)
    }

    pub fn critical(object: ObjectRef, observed: Observed, reason: impl Into<String>) -> Self {
        Self::new(object, observed, Severity::Critical, reason)
    }

    /// A finding is any result that is not OK
    pub fn is_finding(&self) -> bool {
        self.severity.is_problem()
    }
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} (observed: {})",
            self.severity, self.object, self.reason, self.observed
        )
    }
}

/// Final, aggregated outcome of one probe run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    /// Name of the check that produced the results
    pub check: String,

    /// Worst severity across all results
    pub overall: Severity,

    /// Every per-object result, in evaluation order
    pub results: Vec<EvaluationResult>,
}

impl ProbeOutcome {
    /// Results that need attention
    pub fn findings(&self) -> impl Iterator<Item = &EvaluationResult> {
        self.results.iter().filter(|r| r.is_finding())
    }

    /// Number of results at exactly `severity`
    pub fn count(&self, severity: Severity) -> usize {
        self.results
            .iter()
            .filter(|r| r.severity == severity)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::inventory::ObjectKind;

    fn host_ref() -> ObjectRef {
        ObjectRef::new(ObjectKind::Host, "host-1", "esx01")
    }

    #[test]
    fn test_observed_display() {
        assert_eq!(Observed::Percent(92.5).to_string(), "92.50%");
        assert_eq!(Observed::Count(3).to_string(), "3");
        assert_eq!(Observed::Gigabytes(1.5).to_string(), "1.50 GB");
        assert_eq!(
            Observed::Version(HardwareVersion::new(13)).to_string(),
            "vmx-13"
        );
        assert_eq!(Observed::Key("DC1".to_string()).to_string(), "key 'DC1'");
        assert_eq!(Observed::Absent.to_string(), "absent");
    }

    #[test]
    fn test_result_constructors() {
        let ok = EvaluationResult::ok(host_ref(), Observed::Count(0), "fine");
        let crit = EvaluationResult::critical(host_ref(), Observed::Absent, "missing");

        assert!(!ok.is_finding());
        assert!(crit.is_finding());
        assert_eq!(crit.severity, Severity::Critical);
        assert_eq!(
            crit.to_string(),
            "[CRITICAL] host 'esx01' (host-1): missing (observed: absent)"
        );
    }

    #[test]
    fn test_outcome_counts() {
        let outcome = ProbeOutcome {
            check: "test".to_string(),
            overall: Severity::Warning,
            results: vec![
                EvaluationResult::ok(host_ref(), Observed::Count(1), "ok"),
                EvaluationResult::warning(host_ref(), Observed::Count(5), "high"),
            ],
        };

        assert_eq!(outcome.count(Severity::Ok), 1);
        assert_eq!(outcome.count(Severity::Warning), 1);
        assert_eq!(outcome.findings().count(), 1);
    }

    #[test]
    fn test_observed_serialization() {
        let json = serde_json::to_string(&Observed::Percent(50.0)).unwrap();
        assert_eq!(json, r#"{"type":"percent","value":50.0}"#);
        let absent = serde_json::to_string(&Observed::Absent).unwrap();
        assert_eq!(absent, r#"{"type":"absent"}"#);
    }
}
