//! Canned session inputs for tests.

use crate::state::{keys, SessionState};
use serde_json::{json, Value};
use std::f64::consts::TAU;

/// A short CPT trace inside the sample layering.
#[must_use]
pub fn sample_cpt_records() -> Value {
    json!([
        {"depth_m": 0.5, "qc_mpa": 2.1, "fs_mpa": 0.02},
        {"depth_m": 2.0, "qc_mpa": 4.8, "fs_mpa": 0.05},
        {"depth_m": 5.0, "qc_mpa": 9.5, "fs_mpa": 0.08},
        {"depth_m": 12.0, "qc_mpa": 1.4, "fs_mpa": 0.06}
    ])
}

/// Sand over clay, starting at the mudline.
#[must_use]
pub fn sample_layering_records() -> Value {
    json!([
        {"depth_from_m": 0.0, "depth_to_m": 10.0, "soil_type": "Sand", "unit_weight_kn_m3": 19.0},
        {"depth_from_m": 10.0, "depth_to_m": 25.0, "soil_type": "Clay", "unit_weight_kn_m3": 17.0}
    ])
}

/// Surface points over two formations.
#[must_use]
pub fn surface_point_records() -> Value {
    json!([
        {"x": 0.0, "y": 0.0, "z": -12.0, "formation": "Sand"},
        {"x": 100.0, "y": 50.0, "z": -8.0, "formation": "Sand"},
        {"x": 40.0, "y": 80.0, "z": -30.0, "formation": "Clay"},
        {"x": 90.0, "y": 10.0, "z": -28.0, "formation": "Clay"}
    ])
}

/// A single orientation measurement in the sand.
#[must_use]
pub fn orientation_records() -> Value {
    json!([
        {"x": 50.0, "y": 25.0, "z": -10.0, "azimuth_deg": 135.0, "dip_deg": 12.0, "formation": "Sand"}
    ])
}

/// A pure sine acceleration trace.
#[must_use]
pub fn sine_wave_records(freq_hz: f64, sample_rate_hz: f64, n: usize) -> Value {
    let rows: Vec<Value> = (0..n)
        .map(|i| {
            let t = i as f64 / sample_rate_hz;
            json!({"time_s": t, "value": (TAU * freq_hz * t).sin()})
        })
        .collect();
    Value::Array(rows)
}

/// A snapshot with the given entries.
#[must_use]
pub fn state_with(entries: &[(&str, Value)]) -> SessionState {
    let mut state = SessionState::new();
    for (key, value) in entries {
        state.insert(*key, value.clone());
    }
    state
}

/// A snapshot carrying valid inputs for all four stages.
#[must_use]
pub fn ready_state() -> SessionState {
    state_with(&[
        (keys::MATERIAL_INPUT, json!(150.0)),
        (keys::RAW_CPT_RECORDS, sample_cpt_records()),
        (keys::RAW_LAYERING_RECORDS, sample_layering_records()),
        (keys::SURFACE_POINT_RECORDS, surface_point_records()),
        (keys::ORIENTATION_RECORDS, orientation_records()),
        (keys::TIME_SERIES_RECORDS, sine_wave_records(10.0, 100.0, 128)),
    ])
}
