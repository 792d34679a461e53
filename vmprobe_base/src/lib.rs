//! # vmprobe base - vSphere inventory evaluation engine

pub mod api;
pub mod evaluation;
pub mod execution;
pub mod filter;
pub mod logging;
pub mod results;
pub mod strategies;
pub mod types;

// Convenience re-exports
pub use api::*;

pub mod prelude {
    pub use crate::api::{
        load_snapshot, ConfigurationError, Probe, ProbeConfig, ProbeError,
    };

    pub use crate::strategies::{CheckEvaluation, CheckRegistry, InventoryCheck};

    pub use crate::evaluation::{
        classify, classify_count, HardwareVersionEvaluator, HardwareVersionMode, PairingConfig,
        PairingResolver,
    };
    pub use crate::execution::ProbeEngine;
    pub use crate::filter::{InventoryFilter, ScopedInventory};
    pub use crate::results::{
        EvaluationError, EvaluationResult, Observed, PluginReport, ProbeOutcome, ReportGenerator,
        Severity,
    };

    pub use crate::types::{
        inventory::{AsInventoryObject, InventorySnapshot, ObjectKind, ObjectRef, BYTES_PER_GIB},
        Direction, FilterCriteria, HardwareVersion, ThresholdOptions, ThresholdPair,
    };
}
