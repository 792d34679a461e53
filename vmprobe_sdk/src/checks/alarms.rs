//! Triggered alarm check

use crate::checks::BoxedCheck;
use vmprobe_base::api::ProbeConfig;
use vmprobe_base::evaluation::{scope_of, CheckEvaluation};
use vmprobe_base::filter::ScopedInventory;
use vmprobe_base::results::{EvaluationError, EvaluationResult, Observed, Severity};
use vmprobe_base::strategies::InventoryCheck;
use vmprobe_base::types::{AlarmStatus, AsInventoryObject, ObjectRef, TriggeredAlarm};

pub const NAME: &str = "alarms";

/// Maps each retained triggered alarm's status onto a severity
#[derive(Debug, Clone, Default)]
pub struct AlarmsCheck;

impl AlarmsCheck {
    pub const DESCRIPTION: &str = "Triggered alarms on inventory entities";

    pub fn from_config(_config: &ProbeConfig) -> BoxedCheck {
        Ok(Box::new(Self))
    }

    pub fn severity_of(status: AlarmStatus) -> Severity {
        match status {
            AlarmStatus::Red => Severity::Critical,
            AlarmStatus::Yellow => Severity::Warning,
            AlarmStatus::Green | AlarmStatus::Gray => Severity::Ok,
        }
    }

    fn evaluate_alarm(alarm: &TriggeredAlarm) -> EvaluationResult {
        let mut reason = format!(
            "{} on {} '{}'",
            alarm.name, alarm.entity.entity_type, alarm.entity.name
        );
        if alarm.acknowledged {
            reason.push_str(" (acknowledged)");
        }
        EvaluationResult::new(
            alarm.object_ref(),
            Observed::Status(alarm.status.to_string()),
            Self::severity_of(alarm.status),
            reason,
        )
    }
}

impl InventoryCheck for AlarmsCheck {
    fn check_name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    fn scope(&self, scoped: &ScopedInventory<'_>) -> Vec<ObjectRef> {
        scope_of(scoped.alarms.iter().copied())
    }

    fn evaluate(&self, scoped: &ScopedInventory<'_>) -> Result<CheckEvaluation, EvaluationError> {
        Ok(scoped
            .alarms
            .iter()
            .map(|alarm| Self::evaluate_alarm(alarm))
            .collect())
    }
}
