//! # Probe Errors

use crate::results::{EvaluationError, Severity};
use crate::strategies::RegistryError;

/// Configuration rejected before any inventory access
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// Two mutually exclusive options were both set
    #[error("conflicting options: '{first}' cannot be combined with '{second}'")]
    Conflict { first: String, second: String },

    /// An option was given without the option it must be paired with
    #[error("option '{option}' requires '{partner}' to be set as well")]
    MissingPartner { option: String, partner: String },

    /// A required option was not given at all
    #[error("missing required option: {option}")]
    MissingRequired { option: String },

    /// An option value failed validation
    #[error("invalid value '{value}' for option '{option}': {reason}")]
    InvalidValue {
        option: String,
        value: String,
        reason: String,
    },

    /// Configuration file could not be read or parsed
    #[error("failed to load configuration from '{path}': {reason}")]
    LoadFailed { path: String, reason: String },
}

impl ConfigurationError {
    pub fn conflict(first: &str, second: &str) -> Self {
        Self::Conflict {
            first: first.to_string(),
            second: second.to_string(),
        }
    }

    pub fn missing_partner(option: &str, partner: &str) -> Self {
        Self::MissingPartner {
            option: option.to_string(),
            partner: partner.to_string(),
        }
    }

    pub fn missing_required(option: &str) -> Self {
        Self::MissingRequired {
            option: option.to_string(),
        }
    }

    pub fn invalid_value(option: &str, value: &str, reason: &str) -> Self {
        Self::InvalidValue {
            option: option.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn load_failed(path: &str, reason: impl std::fmt::Display) -> Self {
        Self::LoadFailed {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Comprehensive error type for a probe run
///
/// Every variant means the probe itself could not run, which the supervisor
/// must be able to tell apart from an unhealthy monitored system.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),

    #[error("check registry error: {0}")]
    Registry(#[from] RegistryError),

    /// The inventory snapshot could not be obtained
    #[error("inventory data unavailable: {reason}")]
    UpstreamDataUnavailable { reason: String },

    /// The run exceeded the caller-supplied time budget
    #[error("probe timed out after {seconds}s")]
    Timeout { seconds: u64 },
}

impl ProbeError {
    pub fn upstream_data_unavailable(reason: impl Into<String>) -> Self {
        Self::UpstreamDataUnavailable {
            reason: reason.into(),
        }
    }

    /// Severity reported for this failure; always the internal-error level
    pub fn severity(&self) -> Severity {
        Severity::Unknown
    }

    /// Check if this error was caused by operator input
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            ProbeError::Configuration(_) | ProbeError::Registry(RegistryError::UnknownCheck { .. })
        )
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            ProbeError::Configuration(e) => format!("Invalid probe configuration: {}", e),
            ProbeError::Evaluation(e) if e.is_evaluator_defect() => {
                format!("Internal evaluation defect: {}", e)
            }
            ProbeError::Evaluation(e) => format!("Evaluation aborted: {}", e),
            ProbeError::Registry(e) => format!("Check lookup failed: {}", e),
            ProbeError::UpstreamDataUnavailable { reason } => {
                format!("Inventory snapshot unavailable: {}", reason)
            }
            ProbeError::Timeout { seconds } => {
                format!("Probe did not finish within {} seconds", seconds)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_message_names_both_options() {
        let err = ConfigurationError::conflict("include-rp", "exclude-rp");
        let message = err.to_string();
        assert!(message.contains("include-rp"));
        assert!(message.contains("exclude-rp"));
    }

    #[test]
    fn test_probe_errors_are_unknown_severity() {
        let errors = vec![
            ProbeError::from(ConfigurationError::missing_required("attribute")),
            ProbeError::from(EvaluationError::upstream_data_unavailable("no default")),
            ProbeError::upstream_data_unavailable("file missing"),
            ProbeError::Timeout { seconds: 10 },
        ];

        for err in errors {
            assert_eq!(err.severity(), Severity::Unknown);
        }
    }

    #[test]
    fn test_user_messages() {
        let err = ProbeError::from(ConfigurationError::conflict("a", "b"));
        assert!(err.is_user_correctable());
        assert!(err.user_message().starts_with("Invalid probe configuration"));

        let err = ProbeError::Timeout { seconds: 5 };
        assert!(!err.is_user_correctable());
        assert_eq!(err.user_message(), "Probe did not finish within 5 seconds");
    }
}
