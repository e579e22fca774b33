//! Cone-penetration-test processing and soil profile layering.

use crate::errors::CollaboratorError;
use serde::{Deserialize, Serialize};

/// Unit weight of seawater, kN/m3. The foundation sits offshore, so the
/// water table is at the mudline and every layer is submerged.
pub const WATER_UNIT_WEIGHT_KN_M3: f64 = 10.0;

/// Floor applied to the effective stress during normalization so the
/// mudline sample stays finite.
pub const MIN_EFFECTIVE_STRESS_KPA: f64 = 1.0;

/// Baldi relative-density correlation constant C0.
const BALDI_C0: f64 = 15.7;

/// Baldi relative-density correlation constant C2.
const BALDI_C2: f64 = 2.41;

fn default_unit_weight() -> f64 {
    19.0
}

/// One raw CPT reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CptRecord {
    /// Depth below mudline, m.
    pub depth_m: f64,
    /// Cone resistance, MPa.
    pub qc_mpa: f64,
    /// Sleeve friction, MPa.
    pub fs_mpa: f64,
}

/// One layer of the uploaded soil layering table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilLayer {
    /// Top of the layer, m below mudline.
    pub depth_from_m: f64,
    /// Bottom of the layer, m below mudline.
    pub depth_to_m: f64,
    /// Soil type label; the Baldi correlation applies to `Sand` only.
    pub soil_type: String,
    /// Bulk unit weight, kN/m3.
    #[serde(default = "default_unit_weight")]
    pub unit_weight_kn_m3: f64,
}

/// One row of the validated soil profile output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilProfileRow {
    /// Top of the layer, m below mudline.
    pub depth_from_m: f64,
    /// Bottom of the layer, m below mudline.
    pub depth_to_m: f64,
    /// Layer thickness, m.
    pub thickness_m: f64,
    /// Soil type label.
    pub soil_type: String,
    /// Bulk unit weight, kN/m3.
    pub unit_weight_kn_m3: f64,
}

/// One normalized CPT reading with derived quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedCptRecord {
    /// Depth below mudline, m.
    pub depth_m: f64,
    /// Cone resistance, MPa.
    pub qc_mpa: f64,
    /// Sleeve friction, MPa.
    pub fs_mpa: f64,
    /// Friction ratio, percent.
    pub friction_ratio_pct: f64,
    /// Total vertical stress at the reading depth, kPa.
    pub sigma_v0_kpa: f64,
    /// Effective vertical stress at the reading depth, kPa.
    pub sigma_v0_eff_kpa: f64,
    /// Normalized cone resistance, dimensionless.
    pub qc_normalized: f64,
    /// Baldi relative density, percent; only derived in sand layers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_density_pct: Option<f64>,
    /// Soil type of the layer containing the reading.
    pub soil_type: String,
}

/// Output of one soil-processing pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SoilAnalysis {
    /// Normalized CPT rows.
    pub processed: Vec<ProcessedCptRecord>,
    /// Validated soil profile rows.
    pub profile: Vec<SoilProfileRow>,
}

/// Normalizes CPT traces against a layered soil profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct CptProcessor;

impl CptProcessor {
    /// Creates a processor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Validates the layering, normalizes every CPT reading, and applies the
    /// Baldi relative-density correlation inside sand layers.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError`] when the layering is inconsistent or a
    /// reading is invalid or falls outside the profile.
    pub fn process(
        &self,
        cpt: &[CptRecord],
        layers: &[SoilLayer],
    ) -> Result<SoilAnalysis, CollaboratorError> {
        validate_layering(layers)?;
        if cpt.is_empty() {
            return Err(CollaboratorError::invalid_input(
                "CPT trace holds no readings",
            ));
        }

        let processed = cpt
            .iter()
            .enumerate()
            .map(|(index, record)| self.normalize(index, record, layers))
            .collect::<Result<Vec<_>, _>>()?;

        let profile = layers
            .iter()
            .map(|layer| SoilProfileRow {
                depth_from_m: layer.depth_from_m,
                depth_to_m: layer.depth_to_m,
                thickness_m: layer.depth_to_m - layer.depth_from_m,
                soil_type: layer.soil_type.clone(),
                unit_weight_kn_m3: layer.unit_weight_kn_m3,
            })
            .collect();

        Ok(SoilAnalysis { processed, profile })
    }

    fn normalize(
        &self,
        index: usize,
        record: &CptRecord,
        layers: &[SoilLayer],
    ) -> Result<ProcessedCptRecord, CollaboratorError> {
        if !record.depth_m.is_finite() || record.depth_m < 0.0 {
            return Err(CollaboratorError::invalid_record(
                index,
                format!("depth must be non-negative, got {}", record.depth_m),
            ));
        }
        if !record.qc_mpa.is_finite() || record.qc_mpa <= 0.0 {
            return Err(CollaboratorError::invalid_record(
                index,
                format!("cone resistance must be positive, got {}", record.qc_mpa),
            ));
        }
        if !record.fs_mpa.is_finite() || record.fs_mpa < 0.0 {
            return Err(CollaboratorError::invalid_record(
                index,
                format!("sleeve friction must be non-negative, got {}", record.fs_mpa),
            ));
        }

        let layer = layer_at(layers, record.depth_m).ok_or_else(|| {
            CollaboratorError::invalid_record(
                index,
                format!(
                    "depth {} m falls outside the soil profile (0 to {} m)",
                    record.depth_m,
                    layers.last().map_or(0.0, |l| l.depth_to_m)
                ),
            )
        })?;

        let sigma_v0_kpa = total_stress_at(layers, record.depth_m);
        let sigma_v0_eff_kpa = sigma_v0_kpa - WATER_UNIT_WEIGHT_KN_M3 * record.depth_m;
        let qc_normalized = (record.qc_mpa * 1000.0 - sigma_v0_kpa)
            / sigma_v0_eff_kpa.max(MIN_EFFECTIVE_STRESS_KPA);

        let relative_density_pct = if layer.soil_type.eq_ignore_ascii_case("sand")
            && qc_normalized > 0.0
        {
            let dr = 100.0 * (qc_normalized / BALDI_C0).ln() / BALDI_C2;
            Some(dr.clamp(0.0, 100.0))
        } else {
            None
        };

        Ok(ProcessedCptRecord {
            depth_m: record.depth_m,
            qc_mpa: record.qc_mpa,
            fs_mpa: record.fs_mpa,
            friction_ratio_pct: 100.0 * record.fs_mpa / record.qc_mpa,
            sigma_v0_kpa,
            sigma_v0_eff_kpa,
            qc_normalized,
            relative_density_pct,
            soil_type: layer.soil_type.clone(),
        })
    }
}

/// Validates an uploaded layering table.
///
/// The profile must start at the mudline and consist of contiguous,
/// positive-thickness, submerged layers.
///
/// # Errors
///
/// Returns [`CollaboratorError::InvalidProfile`] describing the first
/// inconsistency found.
pub fn validate_layering(layers: &[SoilLayer]) -> Result<(), CollaboratorError> {
    if layers.is_empty() {
        return Err(CollaboratorError::invalid_profile("layering table is empty"));
    }
    if layers[0].depth_from_m.abs() > 1e-6 {
        return Err(CollaboratorError::invalid_profile(format!(
            "first layer must start at the mudline, starts at {} m",
            layers[0].depth_from_m
        )));
    }

    for (i, layer) in layers.iter().enumerate() {
        if layer.soil_type.trim().is_empty() {
            return Err(CollaboratorError::invalid_profile(format!(
                "layer {i} has an empty soil type"
            )));
        }
        if !(layer.depth_from_m.is_finite() && layer.depth_to_m.is_finite()) {
            return Err(CollaboratorError::invalid_profile(format!(
                "layer {i} has non-finite boundaries"
            )));
        }
        if layer.depth_to_m - layer.depth_from_m <= 0.0 {
            return Err(CollaboratorError::invalid_profile(format!(
                "layer {i} has non-positive thickness ({} to {} m)",
                layer.depth_from_m, layer.depth_to_m
            )));
        }
        if !layer.unit_weight_kn_m3.is_finite()
            || layer.unit_weight_kn_m3 <= WATER_UNIT_WEIGHT_KN_M3
        {
            return Err(CollaboratorError::invalid_profile(format!(
                "layer {i} unit weight must exceed the water unit weight, got {}",
                layer.unit_weight_kn_m3
            )));
        }
        if i > 0 && (layer.depth_from_m - layers[i - 1].depth_to_m).abs() > 1e-6 {
            return Err(CollaboratorError::invalid_profile(format!(
                "layer {i} starts at {} m but the previous layer ends at {} m",
                layer.depth_from_m,
                layers[i - 1].depth_to_m
            )));
        }
    }
    Ok(())
}

/// Returns the layer containing the given depth.
///
/// Boundaries belong to the deeper layer, except the final layer's bottom
/// which is inclusive.
fn layer_at(layers: &[SoilLayer], depth_m: f64) -> Option<&SoilLayer> {
    layers.iter().enumerate().find_map(|(i, layer)| {
        let is_last = i == layers.len() - 1;
        let below_top = depth_m >= layer.depth_from_m;
        let above_bottom = if is_last {
            depth_m <= layer.depth_to_m
        } else {
            depth_m < layer.depth_to_m
        };
        (below_top && above_bottom).then_some(layer)
    })
}

/// Total vertical stress at a depth, integrating layer unit weights.
fn total_stress_at(layers: &[SoilLayer], depth_m: f64) -> f64 {
    layers
        .iter()
        .map(|layer| {
            let covered = depth_m.clamp(layer.depth_from_m, layer.depth_to_m) - layer.depth_from_m;
            layer.unit_weight_kn_m3 * covered.max(0.0)
        })
        .sum()
}
