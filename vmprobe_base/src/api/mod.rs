//! # Public API for vmprobe
//!
//! High-level entry points: configuration, error types and the probe runner.
pub mod config;
pub mod errors;
pub mod probe;

pub use crate::execution::ProbeEngine;
pub use crate::results::{PluginReport, ProbeOutcome, ReportGenerator, Severity};
pub use crate::strategies::{CheckFactory, CheckRegistry, InventoryCheck, RegistryError};

pub use config::{ProbeConfig, DEFAULT_TIMEOUT_SECS};
pub use errors::{ConfigurationError, ProbeError};
pub use probe::{load_snapshot, Probe};
