//! Foundation stress-strain simulation.

use crate::errors::CollaboratorError;
use serde::{Deserialize, Serialize};

/// Strain at which the parabolic hardening curve peaks out and unloads.
pub const DEFAULT_FAILURE_STRAIN: f64 = 0.05;

/// Upper end of the sampled strain range.
pub const DEFAULT_MAX_STRAIN: f64 = 0.1;

/// Number of strain samples per curve.
pub const DEFAULT_SAMPLES: usize = 100;

/// One point on a stress-strain curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StressStrainPoint {
    /// Axial strain, dimensionless.
    pub strain: f64,
    /// Axial stress, in the units of the material strength input.
    pub stress: f64,
}

/// Computes a stress-strain response for a given material strength.
pub trait StressSimulator: Send + Sync {
    /// Simulates the curve for a foundation material of the given strength.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError::InvalidInput`] for a non-finite or
    /// non-positive strength.
    fn simulate(&self, material_strength: f64) -> Result<Vec<StressStrainPoint>, CollaboratorError>;
}

/// Parabolic hardening model: stress rises to a peak at half the failure
/// strain and unloads to zero past it.
///
/// `stress = strength * strain * (1 - strain / failure_strain)`, clamped at
/// zero so the post-failure branch never reports tension.
#[derive(Debug, Clone)]
pub struct ParabolicStressModel {
    failure_strain: f64,
    max_strain: f64,
    samples: usize,
}

impl Default for ParabolicStressModel {
    fn default() -> Self {
        Self {
            failure_strain: DEFAULT_FAILURE_STRAIN,
            max_strain: DEFAULT_MAX_STRAIN,
            samples: DEFAULT_SAMPLES,
        }
    }
}

impl ParabolicStressModel {
    /// Creates a model with the default constants.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the number of strain samples.
    #[must_use]
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }
}

impl StressSimulator for ParabolicStressModel {
    fn simulate(&self, material_strength: f64) -> Result<Vec<StressStrainPoint>, CollaboratorError> {
        if !material_strength.is_finite() || material_strength <= 0.0 {
            return Err(CollaboratorError::invalid_input(format!(
                "material strength must be a finite positive number, got {material_strength}"
            )));
        }
        if self.samples < 2 {
            return Err(CollaboratorError::invalid_input(format!(
                "curve needs at least two samples, got {}",
                self.samples
            )));
        }

        let step = self.max_strain / (self.samples - 1) as f64;
        let curve = (0..self.samples)
            .map(|i| {
                let strain = step * i as f64;
                let stress =
                    (material_strength * strain * (1.0 - strain / self.failure_strain)).max(0.0);
                StressStrainPoint { strain, stress }
            })
            .collect();
        Ok(curve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_has_expected_shape() {
        let curve = ParabolicStressModel::new().simulate(150.0).unwrap();
        assert_eq!(curve.len(), DEFAULT_SAMPLES);
        assert!((curve[0].strain).abs() < 1e-12);
        assert!((curve[99].strain - DEFAULT_MAX_STRAIN).abs() < 1e-12);
        assert!(curve.iter().all(|p| p.stress >= 0.0));
    }

    #[test]
    fn test_peak_sits_at_half_failure_strain() {
        let curve = ParabolicStressModel::new().simulate(150.0).unwrap();
        let peak = curve
            .iter()
            .cloned()
            .fold(curve[0], |best, p| if p.stress > best.stress { p } else { best });
        // Vertex of the parabola: failure_strain / 2, peak = strength * eps_f / 4.
        assert!((peak.strain - DEFAULT_FAILURE_STRAIN / 2.0).abs() < 2e-3);
        assert!((peak.stress - 150.0 * DEFAULT_FAILURE_STRAIN / 4.0).abs() < 1e-2);
    }

    #[test]
    fn test_post_failure_branch_is_clamped_to_zero() {
        let curve = ParabolicStressModel::new().simulate(150.0).unwrap();
        let tail: Vec<_> = curve
            .iter()
            .filter(|p| p.strain > DEFAULT_FAILURE_STRAIN + 1e-9)
            .collect();
        assert!(!tail.is_empty());
        assert!(tail.iter().all(|p| p.stress == 0.0));
    }

    #[test]
    fn test_rejects_invalid_strength() {
        let model = ParabolicStressModel::new();
        assert!(model.simulate(0.0).is_err());
        assert!(model.simulate(-5.0).is_err());
        assert!(model.simulate(f64::NAN).is_err());
        assert!(model.simulate(f64::INFINITY).is_err());
    }

    #[test]
    fn test_rejects_degenerate_sample_count() {
        let model = ParabolicStressModel::new().with_samples(1);
        assert!(model.simulate(150.0).is_err());
    }
}
