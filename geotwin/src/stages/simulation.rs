//! Simulation stage: foundation stress-strain response.

use super::{encode_output, Stage};
use crate::collaborators::simulation::{ParabolicStressModel, StressSimulator};
use crate::core::{StageDescriptor, StageResult};
use crate::state::{keys, SessionState};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Name of the simulation stage.
pub const STAGE_NAME: &str = "simulation";

/// Wraps a [`StressSimulator`] behind the uniform stage contract.
pub struct SimulationStage {
    descriptor: StageDescriptor,
    simulator: Arc<dyn StressSimulator>,
}

impl SimulationStage {
    /// Creates the stage around the given simulator.
    #[must_use]
    pub fn new(simulator: Arc<dyn StressSimulator>) -> Self {
        Self {
            descriptor: StageDescriptor::new(
                STAGE_NAME,
                &[keys::MATERIAL_INPUT],
                &[keys::SIMULATION_RESULT],
            ),
            simulator,
        }
    }

    /// Creates the stage with the built-in parabolic hardening model.
    #[must_use]
    pub fn with_default_model() -> Self {
        Self::new(Arc::new(ParabolicStressModel::new()))
    }
}

impl fmt::Debug for SimulationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationStage")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Stage for SimulationStage {
    fn descriptor(&self) -> &StageDescriptor {
        &self.descriptor
    }

    async fn run(&self, state: &SessionState) -> StageResult {
        let missing = self.descriptor.missing_inputs(state);
        if !missing.is_empty() {
            return StageResult::missing_inputs(&missing);
        }

        let Some(strength) = state.number(keys::MATERIAL_INPUT) else {
            return StageResult::failed(format!(
                "{STAGE_NAME}: '{}' must be numeric, got {:?}",
                keys::MATERIAL_INPUT,
                state.get(keys::MATERIAL_INPUT)
            ));
        };

        let curve = match self.simulator.simulate(strength) {
            Ok(curve) => curve,
            Err(err) => return StageResult::failed(format!("{STAGE_NAME}: {err}")),
        };

        match encode_output(STAGE_NAME, &curve) {
            Ok(value) => StageResult::success_value(keys::SIMULATION_RESULT, value),
            Err(failed) => failed,
        }
    }
}
