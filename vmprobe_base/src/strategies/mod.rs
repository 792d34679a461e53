//! Check strategies: the trait every probe implements and the registry that
//! builds probes by name

pub mod registry;
pub mod traits;

pub use registry::{CheckFactory, CheckRegistry, RegistryError};
pub use traits::InventoryCheck;

pub use crate::evaluation::CheckEvaluation;
