//! Modal-analysis stage: vibration spectrum of the tower sensors.

use super::{encode_output, require_records, Stage};
use crate::collaborators::modal::{ModalEstimator, SpectralEstimator, TimeSample};
use crate::collaborators::parse_records;
use crate::core::{StageDescriptor, StageResult};
use crate::state::{keys, SessionState};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Name of the modal-analysis stage.
pub const STAGE_NAME: &str = "modal_analysis";

/// Wraps a [`ModalEstimator`] behind the uniform stage contract.
///
/// When no operational-modal-analysis engine is present the stage does not
/// skip: it falls back to the deterministic [`SpectralEstimator`] substitute
/// and logs the substitution.
pub struct ModalAnalysisStage {
    descriptor: StageDescriptor,
    engine: Option<Arc<dyn ModalEstimator>>,
    fallback: SpectralEstimator,
    sample_rate_hz: f64,
}

impl ModalAnalysisStage {
    /// Creates the stage around a full operational-modal-analysis engine.
    #[must_use]
    pub fn new(engine: Arc<dyn ModalEstimator>, sample_rate_hz: f64) -> Self {
        Self {
            descriptor: Self::base_descriptor(),
            engine: Some(engine),
            fallback: SpectralEstimator::new(),
            sample_rate_hz,
        }
    }

    /// Creates the stage with no engine; every run uses the documented
    /// spectral fallback.
    #[must_use]
    pub fn with_fallback(sample_rate_hz: f64) -> Self {
        Self {
            descriptor: Self::base_descriptor().unavailable(),
            engine: None,
            fallback: SpectralEstimator::new(),
            sample_rate_hz,
        }
    }

    fn base_descriptor() -> StageDescriptor {
        StageDescriptor::new(STAGE_NAME, &[keys::TIME_SERIES_RECORDS], &[keys::MODAL_RESULT])
    }
}

impl fmt::Debug for ModalAnalysisStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalAnalysisStage")
            .field("descriptor", &self.descriptor)
            .field("sample_rate_hz", &self.sample_rate_hz)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Stage for ModalAnalysisStage {
    fn descriptor(&self) -> &StageDescriptor {
        &self.descriptor
    }

    async fn run(&self, state: &SessionState) -> StageResult {
        let missing = self.descriptor.missing_inputs(state);
        if !missing.is_empty() {
            return StageResult::missing_inputs(&missing);
        }

        let rows = match require_records(STAGE_NAME, state, keys::TIME_SERIES_RECORDS) {
            Ok(rows) => rows,
            Err(failed) => return failed,
        };
        let samples: Vec<TimeSample> = match parse_records(rows) {
            Ok(records) => records,
            Err(err) => {
                return StageResult::failed(format!(
                    "{STAGE_NAME}: '{}': {err}",
                    keys::TIME_SERIES_RECORDS
                ))
            }
        };
        let values: Vec<f64> = samples.iter().map(|s| s.value).collect();

        let spectrum = if let Some(engine) = &self.engine {
            engine.estimate(&values, self.sample_rate_hz)
        } else {
            warn!(
                stage = STAGE_NAME,
                "modal-analysis engine not present, using deterministic spectral fallback"
            );
            self.fallback.estimate(&values, self.sample_rate_hz)
        };

        let spectrum = match spectrum {
            Ok(spectrum) => spectrum,
            Err(err) => return StageResult::failed(format!("{STAGE_NAME}: {err}")),
        };

        match encode_output(STAGE_NAME, &spectrum) {
            Ok(value) => StageResult::success_value(keys::MODAL_RESULT, value),
            Err(failed) => failed,
        }
    }
}
