//! Geological-model stage: structural summary plus persisted artifact.

use super::{encode_output, require_records, Stage};
use crate::artifacts::ArtifactStore;
use crate::collaborators::geomodel::{GeoModeler, OrientationRecord, StructuralSummarizer, SurfacePoint};
use crate::collaborators::parse_records;
use crate::core::{StageDescriptor, StageResult};
use crate::state::{keys, SessionState};
use async_trait::async_trait;
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Name of the geological-model stage.
pub const STAGE_NAME: &str = "geo_model";

/// Wraps a [`GeoModeler`] behind the uniform stage contract.
///
/// The modeler is optional: when absent the stage reports
/// `Skipped("dependency unavailable")` and does not substitute a
/// computation. Only a serializable summary and the artifact reference ever
/// enter the session state; the native model object stays inside the
/// collaborator.
pub struct GeoModelStage {
    descriptor: StageDescriptor,
    modeler: Option<Arc<dyn GeoModeler>>,
    artifacts: ArtifactStore,
}

impl GeoModelStage {
    /// Creates the stage around the given modeler.
    #[must_use]
    pub fn new(modeler: Arc<dyn GeoModeler>, artifacts: ArtifactStore) -> Self {
        Self {
            descriptor: Self::base_descriptor(),
            modeler: Some(modeler),
            artifacts,
        }
    }

    /// Creates the stage with the built-in structural summarizer.
    #[must_use]
    pub fn with_default_modeler(artifacts: ArtifactStore) -> Self {
        Self::new(Arc::new(StructuralSummarizer::new()), artifacts)
    }

    /// Creates the stage with no modeler present.
    #[must_use]
    pub fn unavailable(artifacts: ArtifactStore) -> Self {
        Self {
            descriptor: Self::base_descriptor().unavailable(),
            modeler: None,
            artifacts,
        }
    }

    fn base_descriptor() -> StageDescriptor {
        StageDescriptor::new(
            STAGE_NAME,
            &[keys::SURFACE_POINT_RECORDS, keys::ORIENTATION_RECORDS],
            &[keys::GEO_MODEL_SUMMARY],
        )
    }
}

impl fmt::Debug for GeoModelStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeoModelStage")
            .field("descriptor", &self.descriptor)
            .field("artifacts", &self.artifacts)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Stage for GeoModelStage {
    fn descriptor(&self) -> &StageDescriptor {
        &self.descriptor
    }

    async fn run(&self, state: &SessionState) -> StageResult {
        let missing = self.descriptor.missing_inputs(state);
        if !missing.is_empty() {
            return StageResult::missing_inputs(&missing);
        }

        let Some(modeler) = &self.modeler else {
            info!(stage = STAGE_NAME, "geological modeler not present, skipping stage");
            return StageResult::skipped("dependency unavailable");
        };

        let surface_rows = match require_records(STAGE_NAME, state, keys::SURFACE_POINT_RECORDS) {
            Ok(rows) => rows,
            Err(failed) => return failed,
        };
        let orientation_rows = match require_records(STAGE_NAME, state, keys::ORIENTATION_RECORDS) {
            Ok(rows) => rows,
            Err(failed) => return failed,
        };

        let surfaces: Vec<SurfacePoint> = match parse_records(surface_rows) {
            Ok(records) => records,
            Err(err) => {
                return StageResult::failed(format!(
                    "{STAGE_NAME}: '{}': {err}",
                    keys::SURFACE_POINT_RECORDS
                ))
            }
        };
        let orientations: Vec<OrientationRecord> = match parse_records(orientation_rows) {
            Ok(records) => records,
            Err(err) => {
                return StageResult::failed(format!(
                    "{STAGE_NAME}: '{}': {err}",
                    keys::ORIENTATION_RECORDS
                ))
            }
        };

        let summary = match modeler.summarize(&surfaces, &orientations) {
            Ok(summary) => summary,
            Err(err) => return StageResult::failed(format!("{STAGE_NAME}: {err}")),
        };

        // Persist the full summary; the session state only carries metadata
        // plus the reference.
        let summary_value = match encode_output(STAGE_NAME, &summary) {
            Ok(value) => value,
            Err(failed) => return failed,
        };
        let artifact = match self.artifacts.write_json("geo-model", &summary_value) {
            Ok(artifact) => artifact,
            Err(err) => return StageResult::failed(format!("{STAGE_NAME}: {err}")),
        };

        let formations: Vec<&str> = summary
            .formations
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        StageResult::success_value(
            keys::GEO_MODEL_SUMMARY,
            json!({
                "formations": formations,
                "extent": summary.extent,
                "surface_point_count": summary.surface_point_count,
                "orientation_count": summary.orientation_count,
                "artifact_path": artifact.path,
                "artifact_digest": artifact.digest,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use std::path::Path;
    use tempfile::TempDir;

    fn state_with_inputs() -> SessionState {
        let mut state = SessionState::new();
        state.insert(keys::SURFACE_POINT_RECORDS, fixtures::surface_point_records());
        state.insert(keys::ORIENTATION_RECORDS, fixtures::orientation_records());
        state
    }

    #[tokio::test]
    async fn test_skips_without_inputs() {
        let dir = TempDir::new().unwrap();
        let stage = GeoModelStage::with_default_modeler(ArtifactStore::new(dir.path()));
        let result = stage.run(&SessionState::new()).await;
        let reason = result.skip_reason().unwrap();
        assert!(reason.contains(keys::SURFACE_POINT_RECORDS));
        assert!(reason.contains(keys::ORIENTATION_RECORDS));
    }

    #[tokio::test]
    async fn test_unavailable_modeler_skips_explicitly() {
        let dir = TempDir::new().unwrap();
        let stage = GeoModelStage::unavailable(ArtifactStore::new(dir.path()));
        assert!(!stage.descriptor().is_available());

        let result = stage.run(&state_with_inputs()).await;
        assert_eq!(result.skip_reason(), Some("dependency unavailable"));
    }

    #[tokio::test]
    async fn test_summary_holds_metadata_and_artifact_reference() {
        let dir = TempDir::new().unwrap();
        let stage = GeoModelStage::with_default_modeler(ArtifactStore::new(dir.path()));

        let result = stage.run(&state_with_inputs()).await;
        let output = result.output().unwrap();
        let summary = &output[keys::GEO_MODEL_SUMMARY];

        assert!(summary["formations"].is_array());
        assert!(summary["extent"]["x_min"].is_number());
        let artifact_path = summary["artifact_path"].as_str().unwrap();
        assert!(Path::new(artifact_path).exists());

        // The artifact carries the full summary, including per-formation stats.
        let body = std::fs::read_to_string(artifact_path).unwrap();
        let full: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(full["formations"][0]["surface_point_count"].is_number());
    }

    #[tokio::test]
    async fn test_modeler_failure_is_converted_at_the_boundary() {
        let dir = TempDir::new().unwrap();
        let stage = GeoModelStage::with_default_modeler(ArtifactStore::new(dir.path()));

        let mut state = state_with_inputs();
        state.insert(keys::SURFACE_POINT_RECORDS, serde_json::json!([]));

        let result = stage.run(&state).await;
        let error = result.error().unwrap();
        assert!(error.starts_with(STAGE_NAME));
        assert!(error.contains("no rows"));
    }
}
