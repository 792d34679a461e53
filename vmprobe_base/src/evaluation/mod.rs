//! # Evaluation Core
//!
//! Evaluators shared by the probe catalogue: the threshold classifier, the
//! custom-attribute pairing resolver and the hardware-version evaluator.
//! Each evaluator computes its scope independently of its results and
//! produces exactly one [`EvaluationResult`] per in-scope object.

pub mod classifier;
pub mod hardware_version;
pub mod pairing;

pub use classifier::{classify, classify_count};
pub use hardware_version::{HardwareVersionEvaluator, HardwareVersionMode, HardwareVersionOptions};
pub use pairing::{AttributeKeySpec, ComparisonKey, PairingConfig, PairingOptions, PairingResolver};

use crate::results::EvaluationResult;
use crate::types::inventory::{AsInventoryObject, ObjectRef};

/// Per-object results of one evaluation pass
///
/// Results carry no scope of their own: the engine takes the expected
/// objects from [`crate::strategies::InventoryCheck::scope`] and checks the
/// results against it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckEvaluation {
    pub results: Vec<EvaluationResult>,
}

impl CheckEvaluation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: EvaluationResult) {
        self.results.push(result);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl FromIterator<EvaluationResult> for CheckEvaluation {
    fn from_iter<I: IntoIterator<Item = EvaluationResult>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}

/// References of every object in `objects`, in order
pub fn scope_of<'a, T, I>(objects: I) -> Vec<ObjectRef>
where
    T: AsInventoryObject + 'a,
    I: IntoIterator<Item = &'a T>,
{
    objects.into_iter().map(|object| object.object_ref()).collect()
}
