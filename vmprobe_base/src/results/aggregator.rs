//! # Result Aggregator
//!
//! Collects the per-object results of one check and reduces them to a single
//! overall severity. The outcome is only produced once every declared
//! in-scope object has exactly one result.

use crate::results::{EvaluationError, EvaluationResult, ProbeOutcome, Severity};
use crate::types::inventory::ObjectRef;
use std::collections::BTreeMap;

/// Single-writer collector for one check's results
#[derive(Debug)]
pub struct ResultAggregator {
    check: String,
    /// In-scope objects mapped to the number of results seen for each
    scope: BTreeMap<ObjectRef, usize>,
    results: Vec<EvaluationResult>,
    out_of_scope: Vec<ObjectRef>,
}

impl ResultAggregator {
    pub fn new(check: impl Into<String>) -> Self {
        Self {
            check: check.into(),
            scope: BTreeMap::new(),
            results: Vec::new(),
            out_of_scope: Vec::new(),
        }
    }

    /// Declare an object that must produce exactly one result
    pub fn expect(&mut self, object: ObjectRef) {
        self.scope.entry(object).or_insert(0);
    }

    pub fn expect_all<I: IntoIterator<Item = ObjectRef>>(&mut self, objects: I) {
        for object in objects {
            self.expect(object);
        }
    }

    /// Retain a result; validation is deferred to [`ResultAggregator::finalize`]
    pub fn record(&mut self, result: EvaluationResult) {
        match self.scope.get_mut(&result.object) {
            Some(count) => *count += 1,
            None => self.out_of_scope.push(result.object.clone()),
        }
        self.results.push(result);
    }

    pub fn record_all<I: IntoIterator<Item = EvaluationResult>>(&mut self, results: I) {
        for result in results {
            self.record(result);
        }
    }

    /// Validate completeness and produce the overall outcome
    pub fn finalize(self) -> Result<ProbeOutcome, EvaluationError> {
        if let Some(object) = self.out_of_scope.first() {
            return Err(EvaluationError::out_of_scope_result(&self.check, object));
        }

        for (object, count) in &self.scope {
            match *count {
                0 => return Err(EvaluationError::evaluation_gap(&self.check, object)),
                1 => {}
                n => return Err(EvaluationError::duplicate_result(&self.check, object, n)),
            }
        }

        let overall = Severity::worst_of(self.results.iter().map(|r| r.severity));

        Ok(ProbeOutcome {
            check: self.check,
            overall,
            results: self.results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::Observed;
    use crate::types::inventory::ObjectKind;
    use assert_matches::assert_matches;

    fn vm(id: &str) -> ObjectRef {
        ObjectRef::new(ObjectKind::VirtualMachine, id, format!("name-{}", id))
    }

    #[test]
    fn test_overall_is_worst_of_results() {
        let mut aggregator = ResultAggregator::new("test");
        aggregator.expect_all(vec![vm("vm-1"), vm("vm-2"), vm("vm-3")]);
        aggregator.record(EvaluationResult::ok(vm("vm-1"), Observed::Count(0), "ok"));
        aggregator.record(EvaluationResult::critical(vm("vm-2"), Observed::Count(9), "bad"));
        aggregator.record(EvaluationResult::warning(vm("vm-3"), Observed::Count(5), "meh"));

        let outcome = aggregator.finalize().unwrap();
        assert_eq!(outcome.overall, Severity::Critical);
        assert_eq!(outcome.results.len(), 3);
        assert_eq!(outcome.results[1].object.id, "vm-2");
    }

    #[test]
    fn test_empty_scope_is_ok() {
        let outcome = ResultAggregator::new("test").finalize().unwrap();
        assert_eq!(outcome.overall, Severity::Ok);
        assert!(outcome.results.is_empty());
    }

    #[test]
    fn test_missing_result_is_evaluation_gap() {
        let mut aggregator = ResultAggregator::new("test");
        aggregator.expect_all(vec![vm("vm-1"), vm("vm-2")]);
        aggregator.record(EvaluationResult::ok(vm("vm-1"), Observed::Count(0), "ok"));

        let err = aggregator.finalize().unwrap_err();
        assert_matches!(err, EvaluationError::EvaluationGap { ref object, .. } if object.id == "vm-2");
        assert!(err.is_evaluator_defect());
    }

    #[test]
    fn test_duplicate_result_is_rejected() {
        let mut aggregator = ResultAggregator::new("test");
        aggregator.expect(vm("vm-1"));
        aggregator.record(EvaluationResult::ok(vm("vm-1"), Observed::Count(0), "ok"));
        aggregator.record(EvaluationResult::ok(vm("vm-1"), Observed::Count(0), "again"));

        assert_matches!(
            aggregator.finalize(),
            Err(EvaluationError::DuplicateResult { count: 2, .. })
        );
    }

    #[test]
    fn test_out_of_scope_result_is_rejected() {
        let mut aggregator = ResultAggregator::new("test");
        aggregator.expect(vm("vm-1"));
        aggregator.record(EvaluationResult::ok(vm("vm-1"), Observed::Count(0), "ok"));
        aggregator.record(EvaluationResult::ok(vm("vm-9"), Observed::Count(0), "stray"));

        assert_matches!(
            aggregator.finalize(),
            Err(EvaluationError::OutOfScopeResult { .. })
        );
    }

    #[test]
    fn test_expecting_twice_does_not_double_count() {
        let mut aggregator = ResultAggregator::new("test");
        aggregator.expect(vm("vm-1"));
        aggregator.expect(vm("vm-1"));
        aggregator.record(EvaluationResult::ok(vm("vm-1"), Observed::Count(0), "ok"));

        let outcome = aggregator.finalize().unwrap();
        assert_eq!(outcome.results.len(), 1);
    }
}
