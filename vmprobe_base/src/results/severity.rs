//! # Severity Ordering
//!
//! Single totally ordered severity scale shared by every evaluator and by the
//! aggregator: `Ok < Warning < Critical < Unknown`. `Unknown` is reserved for
//! failures of the probe itself and outranks everything the monitored system
//! can report.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    #[default]
    Ok,
    Warning,
    Critical,
    /// The probe could not run (configuration, structural or upstream failure)
    Unknown,
}

impl Severity {
    /// The worse of two severities
    pub fn worst(self, other: Severity) -> Severity {
        self.max(other)
    }

    /// Reduce any number of severities; an empty input is `Ok`
    pub fn worst_of<I: IntoIterator<Item = Severity>>(severities: I) -> Severity {
        severities.into_iter().fold(Severity::Ok, Severity::worst)
    }

    /// Plugin protocol exit status
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::Warning => 1,
            Self::Critical => 2,
            Self::Unknown => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Anything that should draw an operator's attention
    pub fn is_problem(self) -> bool {
        self != Self::Ok
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_is_as_expected() {
        assert!(Severity::Ok < Severity::Warning);
        assert!(Severity::Warning < Severity::Critical);
        assert!(Severity::Critical < Severity::Unknown);
        assert_eq!(Severity::Warning.worst(Severity::Critical), Severity::Critical);
        assert_eq!(Severity::Unknown.worst(Severity::Critical), Severity::Unknown);
    }

    #[test]
    fn test_worst_of() {
        assert_eq!(Severity::worst_of(Vec::new()), Severity::Ok);
        assert_eq!(
            Severity::worst_of([Severity::Ok, Severity::Warning, Severity::Ok]),
            Severity::Warning
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Severity::Ok.exit_code(), 0);
        assert_eq!(Severity::Warning.exit_code(), 1);
        assert_eq!(Severity::Critical.exit_code(), 2);
        assert_eq!(Severity::Unknown.exit_code(), 3);
    }

    #[test]
    fn test_serialized_form() {
        assert_eq!(
            serde_json::to_string(&Severity::Critical).unwrap(),
            "\"CRITICAL\""
        );
    }
}
