//! Virtual hardware version compliance check

use crate::checks::BoxedCheck;
use vmprobe_base::api::ProbeConfig;
use vmprobe_base::evaluation::{CheckEvaluation, HardwareVersionEvaluator};
use vmprobe_base::filter::ScopedInventory;
use vmprobe_base::results::EvaluationError;
use vmprobe_base::strategies::InventoryCheck;
use vmprobe_base::types::ObjectRef;

pub const NAME: &str = "hardware-version";

#[derive(Debug, Clone)]
pub struct HardwareVersionCheck {
    evaluator: HardwareVersionEvaluator,
}

impl HardwareVersionCheck {
    pub const DESCRIPTION: &str = "Virtual hardware version of each VM against the configured baseline";

    pub fn new(evaluator: HardwareVersionEvaluator) -> Self {
        Self { evaluator }
    }

    /// Mode flags come from the `[hardware_version]` section
    pub fn from_config(config: &ProbeConfig) -> BoxedCheck {
        let evaluator = HardwareVersionEvaluator::from_options(&config.hardware_version)?;
        Ok(Box::new(Self::new(evaluator)))
    }
}

impl InventoryCheck for HardwareVersionCheck {
    fn check_name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    fn scope(&self, scoped: &ScopedInventory<'_>) -> Vec<ObjectRef> {
        self.evaluator.scope(scoped)
    }

    fn evaluate(&self, scoped: &ScopedInventory<'_>) -> Result<CheckEvaluation, EvaluationError> {
        self.evaluator.evaluate(scoped)
    }
}
