//! Host/datastore custom-attribute pairing check

use crate::checks::BoxedCheck;
use vmprobe_base::api::ProbeConfig;
use vmprobe_base::evaluation::{CheckEvaluation, PairingConfig, PairingResolver};
use vmprobe_base::filter::ScopedInventory;
use vmprobe_base::results::EvaluationError;
use vmprobe_base::strategies::InventoryCheck;
use vmprobe_base::types::ObjectRef;

pub const NAME: &str = "host-datastore-pairings";

/// Flags VMs running on a host whose key differs from a backing datastore's
#[derive(Debug, Clone)]
pub struct HostDatastorePairingCheck {
    resolver: PairingResolver,
}

impl HostDatastorePairingCheck {
    pub const DESCRIPTION: &str = "Custom-attribute pairing between each VM's host and its datastores";

    pub fn new(config: PairingConfig) -> Self {
        Self {
            resolver: PairingResolver::new(config),
        }
    }

    /// Attribute options come from the `[pairing]` section
    pub fn from_config(config: &ProbeConfig) -> BoxedCheck {
        let pairing = PairingConfig::resolve(&config.pairing)?;
        Ok(Box::new(Self::new(pairing)))
    }
}

impl InventoryCheck for HostDatastorePairingCheck {
    fn check_name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    fn scope(&self, scoped: &ScopedInventory<'_>) -> Vec<ObjectRef> {
        self.resolver.scope(scoped)
    }

    fn evaluate(&self, scoped: &ScopedInventory<'_>) -> Result<CheckEvaluation, EvaluationError> {
        Ok(self.resolver.evaluate(scoped))
    }
}
