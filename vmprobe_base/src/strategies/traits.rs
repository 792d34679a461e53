// src/strategies/traits.rs
//! Check trait implemented by every probe in the catalogue

use crate::evaluation::CheckEvaluation;
use crate::filter::ScopedInventory;
use crate::results::EvaluationError;
use crate::types::inventory::ObjectRef;

/// One named inventory check
///
/// Implementations hold their resolved options (thresholds, pairing
/// configuration, hardware-version mode). The engine asks for the scope
/// first, then requires exactly one result from `evaluate` for every object
/// in it.
pub trait InventoryCheck: Send + Sync {
    /// Registry name, e.g. `datastore-usage`
    fn check_name(&self) -> &str;

    /// One-line description for `--list`
    fn description(&self) -> &str;

    /// Objects that must each receive exactly one result
    fn scope(&self, scoped: &ScopedInventory<'_>) -> Vec<ObjectRef>;

    /// Evaluate the filtered inventory
    fn evaluate(&self, scoped: &ScopedInventory<'_>) -> Result<CheckEvaluation, EvaluationError>;
}
