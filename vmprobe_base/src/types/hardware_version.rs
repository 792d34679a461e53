//! # Virtual Hardware Versions
//!
//! Parses and orders virtual machine hardware versions. The inventory reports
//! them as `vmx-NN`; operators usually type the bare number.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const VMX_PREFIX: &str = "vmx-";

/// Virtual hardware version (e.g. `vmx-19`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HardwareVersion(u32);

impl HardwareVersion {
    pub fn new(version: u32) -> Self {
        Self(version)
    }

    /// Numeric version without the `vmx-` prefix
    pub fn number(&self) -> u32 {
        self.0
    }

    /// How many versions this one trails `baseline` by (zero when not behind)
    pub fn behind(&self, baseline: HardwareVersion) -> u32 {
        baseline.0.saturating_sub(self.0)
    }
}

/// Error raised for unparseable hardware version strings
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid hardware version '{input}': expected 'vmx-NN' or 'NN'")]
pub struct HardwareVersionParseError {
    pub input: String,
}

impl FromStr for HardwareVersion {
    type Err = HardwareVersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = match trimmed.get(..VMX_PREFIX.len()) {
            Some(prefix) if prefix.eq_ignore_ascii_case(VMX_PREFIX) => &trimmed[VMX_PREFIX.len()..],
            _ => trimmed,
        };

        digits
            .parse::<u32>()
            .map(HardwareVersion)
            .map_err(|_| HardwareVersionParseError {
                input: s.to_string(),
            })
    }
}

impl TryFrom<String> for HardwareVersion {
    type Error = HardwareVersionParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HardwareVersion> for String {
    fn from(version: HardwareVersion) -> Self {
        version.to_string()
    }
}

impl fmt::Display for HardwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02}", VMX_PREFIX, self.0)
    }
}
