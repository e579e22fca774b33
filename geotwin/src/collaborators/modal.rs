//! Vibration spectrum estimation for operational modal analysis.

use crate::errors::CollaboratorError;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// One sensor sample of the uploaded tower time series.
///
/// Rows may carry extra channels; only `value` (the first acceleration
/// channel) feeds the substitute estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSample {
    /// Sample time, s. Informational; the sample rate is configured.
    #[serde(default)]
    pub time_s: Option<f64>,
    /// Sensor reading.
    pub value: f64,
}

/// One line of an estimated spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectralLine {
    /// Frequency, Hz.
    pub frequency_hz: f64,
    /// Spectral magnitude, sensor units.
    pub amplitude: f64,
}

/// Estimates a frequency/amplitude spectrum from sensor samples.
pub trait ModalEstimator: Send + Sync {
    /// Estimates the one-sided spectrum of the given samples.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError`] for degenerate inputs.
    fn estimate(
        &self,
        samples: &[f64],
        sample_rate_hz: f64,
    ) -> Result<Vec<SpectralLine>, CollaboratorError>;
}

/// Deterministic substitute for the operational-modal-analysis engine.
///
/// Computes a mean-detrended one-sided discrete Fourier magnitude spectrum
/// with bins up to the Nyquist frequency. The direct transform is quadratic
/// in the sample count, which is acceptable for the dashboard's short sensor
/// windows.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpectralEstimator;

impl SpectralEstimator {
    /// Creates an estimator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ModalEstimator for SpectralEstimator {
    fn estimate(
        &self,
        samples: &[f64],
        sample_rate_hz: f64,
    ) -> Result<Vec<SpectralLine>, CollaboratorError> {
        if !sample_rate_hz.is_finite() || sample_rate_hz <= 0.0 {
            return Err(CollaboratorError::invalid_input(format!(
                "sample rate must be a finite positive number, got {sample_rate_hz}"
            )));
        }
        if samples.len() < 2 {
            return Err(CollaboratorError::invalid_input(format!(
                "spectrum needs at least two samples, got {}",
                samples.len()
            )));
        }
        if let Some(index) = samples.iter().position(|v| !v.is_finite()) {
            return Err(CollaboratorError::invalid_record(
                index,
                "sample is not a finite number",
            ));
        }

        let n = samples.len();
        let mean = samples.iter().sum::<f64>() / n as f64;

        let spectrum = (0..n / 2)
            .map(|k| {
                let mut re = 0.0;
                let mut im = 0.0;
                for (j, sample) in samples.iter().enumerate() {
                    let angle = TAU * k as f64 * j as f64 / n as f64;
                    let centered = sample - mean;
                    re += centered * angle.cos();
                    im -= centered * angle.sin();
                }
                SpectralLine {
                    frequency_hz: k as f64 * sample_rate_hz / n as f64,
                    amplitude: re.hypot(im),
                }
            })
            .collect();

        Ok(spectrum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq_hz: f64, sample_rate_hz: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| (TAU * freq_hz * i as f64 / sample_rate_hz).sin())
            .collect()
    }

    #[test]
    fn test_spectrum_peaks_at_driving_frequency() {
        let samples = sine(10.0, 100.0, 200);
        let spectrum = SpectralEstimator::new().estimate(&samples, 100.0).unwrap();

        assert_eq!(spectrum.len(), 100);
        let peak = spectrum
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.amplitude.total_cmp(&b.1.amplitude))
            .map(|(i, _)| i)
            .unwrap();
        assert!((spectrum[peak].frequency_hz - 10.0).abs() < 1e-9);
        // Full-period sine of unit amplitude: |X_k| = n / 2 at the peak bin.
        assert!((spectrum[peak].amplitude - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_bins_cover_up_to_nyquist() {
        let spectrum = SpectralEstimator::new()
            .estimate(&sine(5.0, 50.0, 100), 50.0)
            .unwrap();
        assert!((spectrum[0].frequency_hz).abs() < 1e-12);
        let last = spectrum.last().unwrap();
        assert!(last.frequency_hz < 25.0);
    }

    #[test]
    fn test_constant_signal_has_flat_spectrum() {
        // Detrending removes the offset entirely.
        let spectrum = SpectralEstimator::new()
            .estimate(&vec![3.5; 64], 100.0)
            .unwrap();
        assert!(spectrum.iter().all(|line| line.amplitude < 1e-9));
    }

    #[test]
    fn test_rejects_degenerate_inputs() {
        let estimator = SpectralEstimator::new();
        assert!(estimator.estimate(&[1.0], 100.0).is_err());
        assert!(estimator.estimate(&[1.0, 2.0], 0.0).is_err());
        assert!(estimator.estimate(&[1.0, f64::NAN], 100.0).is_err());
    }

    #[test]
    fn test_estimate_is_deterministic() {
        let samples = sine(7.5, 100.0, 128);
        let estimator = SpectralEstimator::new();
        assert_eq!(
            estimator.estimate(&samples, 100.0).unwrap(),
            estimator.estimate(&samples, 100.0).unwrap()
        );
    }
}
