pub mod criteria;
pub mod custom_attribute;
pub mod hardware_version;
pub mod inventory;
pub mod threshold;

pub use criteria::FilterCriteria;
pub use custom_attribute::{CustomAttributeEntry, CustomAttributeIndex};
pub use hardware_version::{HardwareVersion, HardwareVersionParseError};
pub use inventory::*;
pub use threshold::{Direction, ThresholdOptions, ThresholdPair};
