// results/error.rs

use crate::types::inventory::ObjectRef;

/// Structural evaluation failures; every variant aborts the run as UNKNOWN
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    /// An in-scope object produced no result
    #[error("check '{check}' produced no result for in-scope {object}")]
    EvaluationGap { check: String, object: ObjectRef },

    /// An in-scope object produced more than one result
    #[error("check '{check}' produced {count} results for {object}, expected exactly one")]
    DuplicateResult {
        check: String,
        object: ObjectRef,
        count: usize,
    },

    /// A result refers to an object the check never declared in scope
    #[error("check '{check}' produced a result for {object} outside its scope")]
    OutOfScopeResult { check: String, object: ObjectRef },

    /// Data the active evaluation mode depends on is missing from the snapshot
    #[error("required inventory data unavailable: {reason}")]
    UpstreamDataUnavailable { reason: String },
}

impl EvaluationError {
    pub fn evaluation_gap(check: &str, object: &ObjectRef) -> Self {
        Self::EvaluationGap {
            check: check.to_string(),
            object: object.clone(),
        }
    }

    pub fn duplicate_result(check: &str, object: &ObjectRef, count: usize) -> Self {
        Self::DuplicateResult {
            check: check.to_string(),
            object: object.clone(),
            count,
        }
    }

    pub fn out_of_scope_result(check: &str, object: &ObjectRef) -> Self {
        Self::OutOfScopeResult {
            check: check.to_string(),
            object: object.clone(),
        }
    }

    pub fn upstream_data_unavailable(reason: impl Into<String>) -> Self {
        Self::UpstreamDataUnavailable {
            reason: reason.into(),
        }
    }

    /// True for defects in an evaluator rather than in the inventory data
    pub fn is_evaluator_defect(&self) -> bool {
        !matches!(self, Self::UpstreamDataUnavailable { .. })
    }
}
