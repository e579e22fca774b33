//! Structural summary of geological model inputs.

use crate::errors::CollaboratorError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One geological surface point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfacePoint {
    /// Easting, m.
    pub x: f64,
    /// Northing, m.
    pub y: f64,
    /// Elevation, m (negative below datum).
    pub z: f64,
    /// Formation the point belongs to.
    pub formation: String,
}

/// One structural orientation measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrientationRecord {
    /// Easting, m.
    pub x: f64,
    /// Northing, m.
    pub y: f64,
    /// Elevation, m.
    pub z: f64,
    /// Dip azimuth, degrees clockwise from north in `[0, 360)`.
    pub azimuth_deg: f64,
    /// Dip angle, degrees in `[0, 90]`.
    pub dip_deg: f64,
    /// Formation the measurement belongs to.
    pub formation: String,
}

/// Axis-aligned bounding box of the model inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelExtent {
    /// Minimum easting, m.
    pub x_min: f64,
    /// Maximum easting, m.
    pub x_max: f64,
    /// Minimum northing, m.
    pub y_min: f64,
    /// Maximum northing, m.
    pub y_max: f64,
    /// Minimum elevation, m.
    pub z_min: f64,
    /// Maximum elevation, m.
    pub z_max: f64,
}

/// Per-formation statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormationSummary {
    /// Formation name.
    pub name: String,
    /// Number of surface points in the formation.
    pub surface_point_count: usize,
    /// Number of orientation measurements in the formation.
    pub orientation_count: usize,
    /// Mean elevation of the formation's surface points, m.
    pub mean_z_m: f64,
    /// Mean dip of the formation's orientations, degrees; absent when the
    /// formation has no orientation measurements.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_dip_deg: Option<f64>,
}

/// Serializable summary of a structural model build.
///
/// This is everything the session state is allowed to learn about the model;
/// the native model object itself never leaves the collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralSummary {
    /// Bounding box of all surface points.
    pub extent: ModelExtent,
    /// Per-formation statistics, sorted by formation name.
    pub formations: Vec<FormationSummary>,
    /// Total surface point count.
    pub surface_point_count: usize,
    /// Total orientation count.
    pub orientation_count: usize,
}

/// Builds structural summaries from surface points and orientations.
pub trait GeoModeler: Send + Sync {
    /// Summarizes the model the given inputs would produce.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError`] for empty or out-of-range inputs.
    fn summarize(
        &self,
        surfaces: &[SurfacePoint],
        orientations: &[OrientationRecord],
    ) -> Result<StructuralSummary, CollaboratorError>;
}

/// Deterministic summarizer: groups inputs per formation and derives the
/// extent and orientation statistics without building a volumetric model.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralSummarizer;

impl StructuralSummarizer {
    /// Creates a summarizer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl GeoModeler for StructuralSummarizer {
    fn summarize(
        &self,
        surfaces: &[SurfacePoint],
        orientations: &[OrientationRecord],
    ) -> Result<StructuralSummary, CollaboratorError> {
        if surfaces.is_empty() {
            return Err(CollaboratorError::invalid_input(
                "surface point table holds no rows",
            ));
        }

        for (index, point) in surfaces.iter().enumerate() {
            if ![point.x, point.y, point.z].iter().all(|v| v.is_finite()) {
                return Err(CollaboratorError::invalid_record(
                    index,
                    "surface point has non-finite coordinates",
                ));
            }
            if point.formation.trim().is_empty() {
                return Err(CollaboratorError::invalid_record(
                    index,
                    "surface point has an empty formation name",
                ));
            }
        }
        for (index, orientation) in orientations.iter().enumerate() {
            if !(0.0..=90.0).contains(&orientation.dip_deg) {
                return Err(CollaboratorError::invalid_record(
                    index,
                    format!("dip must lie in [0, 90] degrees, got {}", orientation.dip_deg),
                ));
            }
            if !(0.0..360.0).contains(&orientation.azimuth_deg) {
                return Err(CollaboratorError::invalid_record(
                    index,
                    format!(
                        "azimuth must lie in [0, 360) degrees, got {}",
                        orientation.azimuth_deg
                    ),
                ));
            }
        }

        let extent = ModelExtent {
            x_min: fold_min(surfaces.iter().map(|p| p.x)),
            x_max: fold_max(surfaces.iter().map(|p| p.x)),
            y_min: fold_min(surfaces.iter().map(|p| p.y)),
            y_max: fold_max(surfaces.iter().map(|p| p.y)),
            z_min: fold_min(surfaces.iter().map(|p| p.z)),
            z_max: fold_max(surfaces.iter().map(|p| p.z)),
        };

        // BTreeMap keeps formation order deterministic across runs.
        let mut groups: BTreeMap<&str, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
        for point in surfaces {
            groups.entry(&point.formation).or_default().0.push(point.z);
        }
        for orientation in orientations {
            groups
                .entry(&orientation.formation)
                .or_default()
                .1
                .push(orientation.dip_deg);
        }

        let formations = groups
            .into_iter()
            .map(|(name, (elevations, dips))| FormationSummary {
                name: name.to_string(),
                surface_point_count: elevations.len(),
                orientation_count: dips.len(),
                mean_z_m: mean(&elevations),
                mean_dip_deg: if dips.is_empty() { None } else { Some(mean(&dips)) },
            })
            .collect();

        Ok(StructuralSummary {
            extent,
            formations,
            surface_point_count: surfaces.len(),
            orientation_count: orientations.len(),
        })
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn fold_min(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(f64::INFINITY, f64::min)
}

fn fold_max(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(f64::NEG_INFINITY, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surfaces() -> Vec<SurfacePoint> {
        vec![
            SurfacePoint {
                x: 0.0,
                y: 0.0,
                z: -12.0,
                formation: "Sand".to_string(),
            },
            SurfacePoint {
                x: 100.0,
                y: 50.0,
                z: -8.0,
                formation: "Sand".to_string(),
            },
            SurfacePoint {
                x: 40.0,
                y: 80.0,
                z: -30.0,
                formation: "Clay".to_string(),
            },
        ]
    }

    fn orientations() -> Vec<OrientationRecord> {
        vec![OrientationRecord {
            x: 50.0,
            y: 25.0,
            z: -10.0,
            azimuth_deg: 135.0,
            dip_deg: 12.0,
            formation: "Sand".to_string(),
        }]
    }

    #[test]
    fn test_summary_extent_and_counts() {
        let summary = StructuralSummarizer::new()
            .summarize(&surfaces(), &orientations())
            .unwrap();

        assert_eq!(summary.surface_point_count, 3);
        assert_eq!(summary.orientation_count, 1);
        assert!((summary.extent.x_min - 0.0).abs() < 1e-9);
        assert!((summary.extent.x_max - 100.0).abs() < 1e-9);
        assert!((summary.extent.z_min - -30.0).abs() < 1e-9);
        assert!((summary.extent.z_max - -8.0).abs() < 1e-9);
    }

    #[test]
    fn test_formations_are_sorted_and_summarized() {
        let summary = StructuralSummarizer::new()
            .summarize(&surfaces(), &orientations())
            .unwrap();

        let names: Vec<_> = summary.formations.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Clay", "Sand"]);

        let sand = &summary.formations[1];
        assert_eq!(sand.surface_point_count, 2);
        assert_eq!(sand.orientation_count, 1);
        assert!((sand.mean_z_m - -10.0).abs() < 1e-9);
        assert_eq!(sand.mean_dip_deg, Some(12.0));

        let clay = &summary.formations[0];
        assert_eq!(clay.orientation_count, 0);
        assert!(clay.mean_dip_deg.is_none());
    }

    #[test]
    fn test_empty_surfaces_are_rejected() {
        let err = StructuralSummarizer::new()
            .summarize(&[], &orientations())
            .unwrap_err();
        assert!(err.to_string().contains("no rows"));
    }

    #[test]
    fn test_out_of_range_orientation_is_rejected() {
        let mut bad = orientations();
        bad[0].dip_deg = 95.0;
        assert!(StructuralSummarizer::new()
            .summarize(&surfaces(), &bad)
            .is_err());

        let mut bad = orientations();
        bad[0].azimuth_deg = 360.0;
        assert!(StructuralSummarizer::new()
            .summarize(&surfaces(), &bad)
            .is_err());
    }

    #[test]
    fn test_non_finite_surface_point_is_rejected() {
        let mut bad = surfaces();
        bad[1].z = f64::NAN;
        let err = StructuralSummarizer::new()
            .summarize(&bad, &[])
            .unwrap_err();
        assert!(err.to_string().starts_with("record 1:"));
    }

    #[test]
    fn test_summary_is_deterministic() {
        let first = StructuralSummarizer::new()
            .summarize(&surfaces(), &orientations())
            .unwrap();
        let second = StructuralSummarizer::new()
            .summarize(&surfaces(), &orientations())
            .unwrap();
        assert_eq!(first, second);
    }
}
