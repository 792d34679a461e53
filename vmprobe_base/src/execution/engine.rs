//! # Probe Engine
//!
//! Runs one check over one snapshot: filter, evaluate, aggregate.
use crate::api::config::ProbeConfig;
use crate::api::errors::ProbeError;
use crate::filter::InventoryFilter;
use crate::results::{ProbeOutcome, ResultAggregator};
use crate::strategies::{CheckRegistry, InventoryCheck};
use crate::types::inventory::InventorySnapshot;
use crate::{log_debug, log_info};
use std::time::Instant;

/// Prepared probe: a validated filter and a fully configured check
pub struct ProbeEngine {
    filter: InventoryFilter,
    check: Box<dyn InventoryCheck>,
}

impl ProbeEngine {
    pub fn new(filter: InventoryFilter, check: Box<dyn InventoryCheck>) -> Self {
        Self { filter, check }
    }

    /// Validate `config` and build the named check
    ///
    /// Every configuration error surfaces here, before a snapshot is read.
    pub fn from_config(
        registry: &CheckRegistry,
        check_name: &str,
        config: &ProbeConfig,
    ) -> Result<Self, ProbeError> {
        config.validate()?;
        let filter = InventoryFilter::new(config.filter.clone())?;
        let check = registry.create(check_name, config)?;

        log_debug!("Probe prepared",
            "check" => check.check_name(),
            "timeout_secs" => config.timeout_secs
        );

        Ok(Self::new(filter, check))
    }

    pub fn check_name(&self) -> &str {
        self.check.check_name()
    }

    /// Evaluate `snapshot` and aggregate the results
    pub fn execute(&self, snapshot: &InventorySnapshot) -> Result<ProbeOutcome, ProbeError> {
        let start = Instant::now();

        let scoped = self.filter.apply(snapshot);

        let mut aggregator = ResultAggregator::new(self.check.check_name());
        aggregator.expect_all(self.check.scope(&scoped));

        let evaluation = self.check.evaluate(&scoped)?;
        aggregator.record_all(evaluation.results);
        let outcome = aggregator.finalize()?;

        log_info!("Check evaluated",
            "check" => &outcome.check,
            "state" => outcome.overall,
            "objects" => outcome.results.len(),
            "findings" => outcome.findings().count(),
            "duration_ms" => start.elapsed().as_millis()
        );

        Ok(outcome)
    }
}

impl std::fmt::Debug for ProbeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeEngine")
            .field("filter", &self.filter)
            .field("check", &self.check.check_name())
            .finish()
    }
}
