//! Soil-processing stage: CPT normalization and profile layering.

use super::{encode_output, require_records, Stage};
use crate::collaborators::cpt::{CptProcessor, CptRecord, SoilLayer};
use crate::collaborators::parse_records;
use crate::core::{StageDescriptor, StageResult};
use crate::state::{keys, SessionState};
use async_trait::async_trait;
use std::collections::HashMap;

/// Name of the soil-processing stage.
pub const STAGE_NAME: &str = "soil_processing";

/// Wraps the [`CptProcessor`] behind the uniform stage contract.
#[derive(Debug)]
pub struct SoilProcessingStage {
    descriptor: StageDescriptor,
    processor: CptProcessor,
}

impl Default for SoilProcessingStage {
    fn default() -> Self {
        Self::new()
    }
}

impl SoilProcessingStage {
    /// Creates the stage with the built-in processor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: StageDescriptor::new(
                STAGE_NAME,
                &[keys::RAW_CPT_RECORDS, keys::RAW_LAYERING_RECORDS],
                &[keys::PROCESSED_CPT_RECORDS, keys::SOIL_PROFILE_RECORDS],
            ),
            processor: CptProcessor::new(),
        }
    }
}

#[async_trait]
impl Stage for SoilProcessingStage {
    fn descriptor(&self) -> &StageDescriptor {
        &self.descriptor
    }

    async fn run(&self, state: &SessionState) -> StageResult {
        let missing = self.descriptor.missing_inputs(state);
        if !missing.is_empty() {
            return StageResult::missing_inputs(&missing);
        }

        let cpt_rows = match require_records(STAGE_NAME, state, keys::RAW_CPT_RECORDS) {
            Ok(rows) => rows,
            Err(failed) => return failed,
        };
        let layer_rows = match require_records(STAGE_NAME, state, keys::RAW_LAYERING_RECORDS) {
            Ok(rows) => rows,
            Err(failed) => return failed,
        };

        let cpt: Vec<CptRecord> = match parse_records(cpt_rows) {
            Ok(records) => records,
            Err(err) => {
                return StageResult::failed(format!(
                    "{STAGE_NAME}: '{}': {err}",
                    keys::RAW_CPT_RECORDS
                ))
            }
        };
        let layers: Vec<SoilLayer> = match parse_records(layer_rows) {
            Ok(records) => records,
            Err(err) => {
                return StageResult::failed(format!(
                    "{STAGE_NAME}: '{}': {err}",
                    keys::RAW_LAYERING_RECORDS
                ))
            }
        };

        let analysis = match self.processor.process(&cpt, &layers) {
            Ok(analysis) => analysis,
            Err(err) => return StageResult::failed(format!("{STAGE_NAME}: {err}")),
        };

        let processed = match encode_output(STAGE_NAME, &analysis.processed) {
            Ok(value) => value,
            Err(failed) => return failed,
        };
        let profile = match encode_output(STAGE_NAME, &analysis.profile) {
            Ok(value) => value,
            Err(failed) => return failed,
        };

        let mut output = HashMap::new();
        output.insert(keys::PROCESSED_CPT_RECORDS.to_string(), processed);
        output.insert(keys::SOIL_PROFILE_RECORDS.to_string(), profile);
        StageResult::success(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use serde_json::json;

    #[tokio::test]
    async fn test_skips_and_names_the_missing_key() {
        let stage = SoilProcessingStage::new();
        let mut state = SessionState::new();
        state.insert(keys::RAW_CPT_RECORDS, fixtures::sample_cpt_records());

        let result = stage.run(&state).await;
        let reason = result.skip_reason().unwrap();
        assert!(reason.contains(keys::RAW_LAYERING_RECORDS));
        assert!(!reason.contains(keys::RAW_CPT_RECORDS));
    }

    #[tokio::test]
    async fn test_produces_both_output_tables() {
        let stage = SoilProcessingStage::new();
        let mut state = SessionState::new();
        state.insert(keys::RAW_CPT_RECORDS, fixtures::sample_cpt_records());
        state.insert(keys::RAW_LAYERING_RECORDS, fixtures::sample_layering_records());

        let result = stage.run(&state).await;
        let output = result.output().unwrap();
        assert_eq!(output.len(), 2);

        let processed = output[keys::PROCESSED_CPT_RECORDS].as_array().unwrap();
        assert!(!processed.is_empty());
        assert!(processed[0]["friction_ratio_pct"].is_number());

        let profile = output[keys::SOIL_PROFILE_RECORDS].as_array().unwrap();
        assert!(profile[0]["thickness_m"].is_number());
    }

    #[tokio::test]
    async fn test_undecodable_row_fails_with_key_and_index() {
        let stage = SoilProcessingStage::new();
        let mut state = SessionState::new();
        state.insert(keys::RAW_CPT_RECORDS, json!([{"depth_m": "shallow"}]));
        state.insert(keys::RAW_LAYERING_RECORDS, fixtures::sample_layering_records());

        let result = stage.run(&state).await;
        let error = result.error().unwrap();
        assert!(error.contains(keys::RAW_CPT_RECORDS));
        assert!(error.contains("record 0"));
    }

    #[tokio::test]
    async fn test_inconsistent_layering_fails() {
        let stage = SoilProcessingStage::new();
        let mut state = SessionState::new();
        state.insert(keys::RAW_CPT_RECORDS, fixtures::sample_cpt_records());
        state.insert(
            keys::RAW_LAYERING_RECORDS,
            json!([
                {"depth_from_m": 0.0, "depth_to_m": 5.0, "soil_type": "Sand"},
                {"depth_from_m": 7.0, "depth_to_m": 12.0, "soil_type": "Clay"}
            ]),
        );

        let result = stage.run(&state).await;
        assert!(result.error().unwrap().contains("soil profile"));
    }
}
