//! # Probe Results Module
//!
//! Per-object evaluation results, the worst-of aggregation that turns them
//! into one overall state, and the report handed to the monitoring
//! supervisor.
//!
//! ## Core Types
//! - [`Severity`] - Totally ordered OK < WARNING < CRITICAL < UNKNOWN
//! - [`EvaluationResult`] - One object's classification and the fact behind it
//! - [`ResultAggregator`] - Completeness-checked reduction to a [`ProbeOutcome`]
//! - [`PluginReport`] - Text/JSON rendering of an outcome
//!
//! ## Usage
//! ```rust
//! use vmprobe_base::results::{EvaluationResult, Observed, ResultAggregator, Severity};
//! use vmprobe_base::types::inventory::{ObjectKind, ObjectRef};
//!
//! let ds = ObjectRef::new(ObjectKind::Datastore, "ds-1", "ds01");
//! let mut aggregator = ResultAggregator::new("datastore-usage");
//! aggregator.expect(ds.clone());
//! aggregator.record(EvaluationResult::warning(ds, Observed::Percent(91.0), "usage 91%"));
//!
//! let outcome = aggregator.finalize().unwrap();
//! assert_eq!(outcome.overall, Severity::Warning);
//! ```

pub mod aggregator;
pub mod error;
pub mod generator;
pub mod severity;
pub mod types;

// Re-export all public types for convenient access
pub use aggregator::ResultAggregator;
pub use error::*;
pub use generator::{PluginReport, ReportGenerator, ReportedFinding};
pub use severity::Severity;
pub use types::*;
