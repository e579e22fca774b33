//! Stage adapters wrapping the scientific collaborators.
//!
//! Every adapter presents the same contract: check the precondition keys
//! against the snapshot, extract only the relevant fields, invoke the
//! collaborator with plain values, and convert any collaborator error into a
//! `Failed` outcome at this boundary. Adapters never touch the store and
//! never merge partial output on failure.

mod geomodel;
mod modal;
mod simulation;
mod soil;

pub use geomodel::GeoModelStage;
pub use modal::ModalAnalysisStage;
pub use simulation::SimulationStage;
pub use soil::SoilProcessingStage;

use crate::core::{StageDescriptor, StageResult};
use crate::state::SessionState;
use async_trait::async_trait;
use std::fmt::Debug;

/// Trait for pipeline stages.
///
/// A stage reads a session snapshot and reports exactly one
/// [`StageResult`]; it never raises past this boundary.
#[async_trait]
pub trait Stage: Send + Sync + Debug {
    /// Returns the stage's static metadata.
    fn descriptor(&self) -> &StageDescriptor;

    /// Returns the stage name.
    fn name(&self) -> &str {
        self.descriptor().name()
    }

    /// Executes the stage against a snapshot.
    async fn run(&self, state: &SessionState) -> StageResult;
}

/// Serializes a collaborator result into a session-state value, converting
/// encoding failures into a `Failed` outcome.
pub(crate) fn encode_output<T: serde::Serialize>(
    stage: &str,
    value: &T,
) -> Result<serde_json::Value, StageResult> {
    serde_json::to_value(value)
        .map_err(|err| StageResult::failed(format!("{stage}: failed to encode output: {err}")))
}

/// Returns a table-valued entry's rows, or a `Failed` outcome when the key
/// holds something other than a list of records.
pub(crate) fn require_records<'a>(
    stage: &str,
    state: &'a SessionState,
    key: &str,
) -> Result<&'a Vec<serde_json::Value>, StageResult> {
    state.records(key).ok_or_else(|| {
        StageResult::failed(format!(
            "{stage}: '{key}' must be a list of records, got {}",
            value_kind(state.get(key))
        ))
    })
}

fn value_kind(value: Option<&serde_json::Value>) -> &'static str {
    match value {
        None => "nothing",
        Some(serde_json::Value::Null) => "null",
        Some(serde_json::Value::Bool(_)) => "a boolean",
        Some(serde_json::Value::Number(_)) => "a number",
        Some(serde_json::Value::String(_)) => "a string",
        Some(serde_json::Value::Array(_)) => "a list",
        Some(serde_json::Value::Object(_)) => "a mapping",
    }
}
