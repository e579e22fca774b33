//! Fixed-order pipeline execution over one session snapshot.

use crate::artifacts::ArtifactStore;
use crate::config::GeotwinConfig;
use crate::core::{PipelineReport, StageResult};
use crate::events::{EventSink, NoOpEventSink};
use crate::stages::{
    GeoModelStage, ModalAnalysisStage, SimulationStage, SoilProcessingStage, Stage,
};
use crate::state::SessionState;
use crate::utils::iso_timestamp;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Runs the stage sequence against one session snapshot.
///
/// The orchestrator never returns an error: every possible stage outcome is
/// captured in the report, and a failure in one stage never aborts the run.
/// State handling is copy-on-write - the input snapshot is read-only, all
/// merges land in a fresh clone, and the result differs from the input only
/// by keys the stages declare.
pub struct Orchestrator {
    stages: Vec<Arc<dyn Stage>>,
    events: Arc<dyn EventSink>,
}

impl Orchestrator {
    /// Creates an orchestrator over the given stages, in order.
    #[must_use]
    pub fn new(stages: Vec<Arc<dyn Stage>>) -> Self {
        Self {
            stages,
            events: Arc::new(NoOpEventSink),
        }
    }

    /// Creates the standard digital-twin pipeline:
    /// Simulation -> SoilProcessing -> GeoModel -> ModalAnalysis.
    ///
    /// GeoModel uses the built-in structural summarizer; ModalAnalysis runs
    /// on the documented spectral fallback until a full engine is wired in.
    #[must_use]
    pub fn standard(config: &GeotwinConfig) -> Self {
        let artifacts = ArtifactStore::new(config.artifact_dir.clone());
        Self::new(vec![
            Arc::new(SimulationStage::with_default_model()),
            Arc::new(SoilProcessingStage::new()),
            Arc::new(GeoModelStage::with_default_modeler(artifacts)),
            Arc::new(ModalAnalysisStage::with_fallback(config.sample_rate_hz)),
        ])
    }

    /// Attaches an event sink for run observability.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = sink;
        self
    }

    /// Returns the stage names in execution order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.descriptor().name()).collect()
    }

    /// Runs every stage in order against the snapshot.
    ///
    /// Stages read the original input snapshot, so precondition evaluation is
    /// order-independent; a stage that declared fresh-input keys reads the
    /// partially updated state instead. Successful outputs are validated
    /// against the stage's output-key contract and merged last-writer-wins;
    /// failures record the `error` key and the run continues.
    pub async fn run(&self, snapshot: &SessionState) -> (SessionState, PipelineReport) {
        self.events.try_emit(
            "pipeline.started",
            Some(json!({
                "stages": self.stage_names(),
                "at": iso_timestamp(),
            })),
        );

        let mut new_state = snapshot.clone();
        let mut report = PipelineReport::new();

        for stage in &self.stages {
            let descriptor = stage.descriptor();
            let view = if descriptor.reads_fresh_state() {
                &new_state
            } else {
                snapshot
            };
            let result = stage.run(view).await;

            let result = match result {
                StageResult::Success { output } => match descriptor.validate_output(&output) {
                    Ok(()) => StageResult::Success { output },
                    Err(violation) => StageResult::failed(violation.to_string()),
                },
                other => other,
            };

            let detail = match &result {
                StageResult::Success { .. } => None,
                StageResult::Skipped { reason } => {
                    debug!(stage = descriptor.name(), reason = %reason, "stage skipped");
                    Some(reason.clone())
                }
                StageResult::Failed { error } => Some(error.clone()),
            };
            self.events.try_emit(
                "stage.completed",
                Some(json!({
                    "stage": descriptor.name(),
                    "status": result.status_label(),
                    "detail": detail,
                })),
            );

            match result {
                StageResult::Success { output } => {
                    new_state.merge(&output);
                    report.push(descriptor.name(), StageResult::Success { output });
                }
                StageResult::Skipped { reason } => {
                    report.push(descriptor.name(), StageResult::Skipped { reason });
                }
                StageResult::Failed { error } => {
                    new_state.set_error(error.clone());
                    report.push(descriptor.name(), StageResult::Failed { error });
                }
            }
        }

        self.events.try_emit(
            "pipeline.completed",
            Some(json!({
                "succeeded": report.succeeded(),
                "skipped": report.skipped(),
                "failed": report.failed(),
                "at": iso_timestamp(),
            })),
        );

        (new_state, report)
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("stages", &self.stage_names())
            .finish_non_exhaustive()
    }
}
