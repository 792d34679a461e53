//! # Threshold Pairs
//!
//! Warning/critical boundaries for one metric. The pair performs no
//! reordering: a check may legitimately configure a critical boundary that is
//! lower than its warning boundary.

use crate::api::errors::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of a boundary is the unhealthy side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherIsWorse,
    LowerIsWorse,
}

/// Two boundaries of the same unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPair<T> {
    pub warning: T,
    pub critical: T,
}

impl<T: Copy + fmt::Display> ThresholdPair<T> {
    pub fn new(warning: T, critical: T) -> Self {
        Self { warning, critical }
    }

    /// Resolve an optional pair of configured boundaries
    ///
    /// Both unset yields `None`; only one set is a configuration error naming
    /// the missing partner.
    pub fn from_options(
        warning: Option<T>,
        critical: Option<T>,
        warning_option: &str,
        critical_option: &str,
    ) -> Result<Option<Self>, ConfigurationError> {
        match (warning, critical) {
            (Some(warning), Some(critical)) => Ok(Some(Self::new(warning, critical))),
            (None, None) => Ok(None),
            (Some(_), None) => Err(ConfigurationError::missing_partner(
                warning_option,
                critical_option,
            )),
            (None, Some(_)) => Err(ConfigurationError::missing_partner(
                critical_option,
                warning_option,
            )),
        }
    }
}

impl<T: fmt::Display> fmt::Display for ThresholdPair<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "warning {}, critical {}", self.warning, self.critical)
    }
}

/// Optional threshold overrides as read from configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdOptions {
    #[serde(default)]
    pub warning: Option<f64>,
    #[serde(default)]
    pub critical: Option<f64>,
}

impl ThresholdOptions {
    /// Fill unset fields from `fallback` (used to layer CLI over file)
    pub fn or(self, fallback: ThresholdOptions) -> ThresholdOptions {
        ThresholdOptions {
            warning: self.warning.or(fallback.warning),
            critical: self.critical.or(fallback.critical),
        }
    }

    /// Resolve into a pair, falling back to `defaults` when nothing is set
    pub fn resolve(
        &self,
        defaults: ThresholdPair<f64>,
    ) -> Result<ThresholdPair<f64>, ConfigurationError> {
        for (option, value) in [("warning", self.warning), ("critical", self.critical)] {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(ConfigurationError::invalid_value(
                        option,
                        &value.to_string(),
                        "threshold must be a finite, non-negative number",
                    ));
                }
            }
        }

        Ok(
            ThresholdPair::from_options(self.warning, self.critical, "warning", "critical")?
                .unwrap_or(defaults),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_from_options_requires_both_or_neither() {
        assert_eq!(
            ThresholdPair::from_options(Some(1u32), Some(5), "w", "c").unwrap(),
            Some(ThresholdPair::new(1, 5))
        );
        assert_eq!(
            ThresholdPair::<u32>::from_options(None, None, "w", "c").unwrap(),
            None
        );
        assert_matches!(
            ThresholdPair::from_options(Some(1u32), None, "w", "c"),
            Err(ConfigurationError::MissingPartner { ref option, ref partner })
                if option == "w" && partner == "c"
        );
    }

    #[test]
    fn test_no_implicit_reordering() {
        let pair = ThresholdPair::from_options(Some(25.0), Some(4.0), "w", "c")
            .unwrap()
            .unwrap();
        assert_eq!(pair.warning, 25.0);
        assert_eq!(pair.critical, 4.0);
    }

    #[test]
    fn test_resolve_uses_defaults() {
        let defaults = ThresholdPair::new(90.0, 95.0);
        assert_eq!(ThresholdOptions::default().resolve(defaults).unwrap(), defaults);

        let custom = ThresholdOptions {
            warning: Some(70.0),
            critical: Some(80.0),
        };
        assert_eq!(custom.resolve(defaults).unwrap(), ThresholdPair::new(70.0, 80.0));
    }

    #[test]
    fn test_resolve_rejects_half_pairs_and_bad_values() {
        let defaults = ThresholdPair::new(90.0, 95.0);
        let half = ThresholdOptions {
            warning: None,
            critical: Some(80.0),
        };
        assert_matches!(
            half.resolve(defaults),
            Err(ConfigurationError::MissingPartner { .. })
        );

        let negative = ThresholdOptions {
            warning: Some(-1.0),
            critical: Some(80.0),
        };
        assert_matches!(
            negative.resolve(defaults),
            Err(ConfigurationError::InvalidValue { .. })
        );
    }

    #[test]
    fn test_layering() {
        let cli = ThresholdOptions {
            warning: Some(1.0),
            critical: None,
        };
        let file = ThresholdOptions {
            warning: Some(2.0),
            critical: Some(3.0),
        };
        assert_eq!(
            cli.or(file),
            ThresholdOptions {
                warning: Some(1.0),
                critical: Some(3.0)
            }
        );
    }
}
