// src/strategies/registry.rs
//! Check registry
//!
//! Maps check names to factories. A factory receives the merged
//! [`ProbeConfig`] and either builds a ready check or rejects the
//! configuration, which keeps option validation ahead of any inventory access.

use crate::api::config::ProbeConfig;
use crate::api::errors::{ConfigurationError, ProbeError};
use crate::strategies::traits::InventoryCheck;
use std::collections::BTreeMap;

/// Builds a check from configuration
pub type CheckFactory = fn(&ProbeConfig) -> Result<Box<dyn InventoryCheck>, ConfigurationError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("unknown check '{name}' (available: {})", .available.join(", "))]
    UnknownCheck {
        name: String,
        available: Vec<String>,
    },

    #[error("check '{name}' is already registered")]
    DuplicateCheck { name: String },
}

#[derive(Clone)]
struct RegisteredCheck {
    description: &'static str,
    factory: CheckFactory,
}

/// Name-keyed registry of check factories
#[derive(Clone, Default)]
pub struct CheckRegistry {
    checks: BTreeMap<String, RegisteredCheck>,
}

impl CheckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `name`
    pub fn register(
        &mut self,
        name: &str,
        description: &'static str,
        factory: CheckFactory,
    ) -> Result<(), RegistryError> {
        if self.checks.contains_key(name) {
            return Err(RegistryError::DuplicateCheck {
                name: name.to_string(),
            });
        }

        self.checks.insert(
            name.to_string(),
            RegisteredCheck {
                description,
                factory,
            },
        );
        Ok(())
    }

    /// Build the named check from `config`
    pub fn create(
        &self,
        name: &str,
        config: &ProbeConfig,
    ) -> Result<Box<dyn InventoryCheck>, ProbeError> {
        let registered = self
            .checks
            .get(name)
            .ok_or_else(|| RegistryError::UnknownCheck {
                name: name.to_string(),
                available: self.list_checks(),
            })?;

        Ok((registered.factory)(config)?)
    }

    /// Registered names in sorted order
    pub fn list_checks(&self) -> Vec<String> {
        self.checks.keys().cloned().collect()
    }

    /// (name, description) pairs in sorted order
    pub fn descriptions(&self) -> Vec<(&str, &'static str)> {
        self.checks
            .iter()
            .map(|(name, check)| (name.as_str(), check.description))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl std::fmt::Debug for CheckRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckRegistry")
            .field("checks", &self.list_checks())
            .finish()
    }
}
