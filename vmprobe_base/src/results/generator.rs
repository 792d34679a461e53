//! # Report Generator
//!
//! Converts a probe outcome (or a fatal probe error) into the plugin report
//! handed to the monitoring supervisor: a state line, detail lines and a
//! serializable findings list.
use crate::results::{EvaluationResult, ProbeOutcome, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Supervisor-facing report for one probe run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginReport {
    pub check: String,
    pub state: Severity,
    pub summary: String,
    /// Snapshot collection time the report is based on
    pub collected_at: Option<DateTime<Utc>>,
    pub evaluated_objects: usize,
    pub findings: Vec<ReportedFinding>,
}

/// Individual non-OK result with a stable identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportedFinding {
    /// Identical across runs for the same check and object
    pub finding_id: String,
    #[serde(flatten)]
    pub result: EvaluationResult,
}

/// Report generator for converting outcomes into plugin output
pub struct ReportGenerator;

impl ReportGenerator {
    /// Build the report for a completed run
    pub fn from_outcome(outcome: &ProbeOutcome, collected_at: DateTime<Utc>) -> PluginReport {
        let mut findings: Vec<ReportedFinding> = outcome
            .findings()
            .map(|result| ReportedFinding {
                finding_id: Self::finding_id(&outcome.check, result),
                result: result.clone(),
            })
            .collect();

        // Worst first; ties keep evaluation order
        findings.sort_by(|a, b| b.result.severity.cmp(&a.result.severity));

        PluginReport {
            check: outcome.check.clone(),
            state: outcome.overall,
            summary: Self::summarize(outcome),
            collected_at: Some(collected_at),
            evaluated_objects: outcome.results.len(),
            findings,
        }
    }

    /// Build the report for a run that could not complete
    pub fn from_failure(check: &str, reason: &str) -> PluginReport {
        PluginReport {
            check: check.to_string(),
            state: Severity::Unknown,
            summary: format!("check '{}' could not run: {}", check, reason),
            collected_at: None,
            evaluated_objects: 0,
            findings: Vec::new(),
        }
    }

    /// Deterministic finding identifier (UUID v5 over check, kind and object id)
    pub fn finding_id(check: &str, result: &EvaluationResult) -> String {
        let name = format!("{}:{:?}:{}", check, result.object.kind, result.object.id);
        Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()).to_string()
    }

    fn summarize(outcome: &ProbeOutcome) -> String {
        let total = outcome.results.len();

        if !outcome.overall.is_problem() {
            return format!(
                "{} of {} objects evaluated by check '{}' are within thresholds",
                total, total, outcome.check
            );
        }

        let mut parts = Vec::new();
        for severity in [Severity::Unknown, Severity::Critical, Severity::Warning] {
            let count = outcome.count(severity);
            if count > 0 {
                parts.push(format!("{} {}", count, severity));
            }
        }

        format!(
            "{} of {} objects evaluated by check '{}'",
            parts.join(", "),
            total,
            outcome.check
        )
    }
}

impl PluginReport {
    /// Plugin protocol exit status
    pub fn exit_code(&self) -> i32 {
        self.state.exit_code()
    }

    /// Render the plugin text: state line first, one line per finding after
    pub fn render_text(&self) -> String {
        let mut lines = vec![format!("{}: {}", self.state, self.summary)];

        for finding in &self.findings {
            lines.push(format!("* {}", finding.result));
        }

        if !self.findings.is_empty() || self.evaluated_objects > 0 {
            let ok = self.evaluated_objects.saturating_sub(self.findings.len());
            lines.push(format!("{} object(s) OK", ok));
        }

        lines.join("\n")
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
