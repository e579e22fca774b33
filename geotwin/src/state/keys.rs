//! Namespaced session-state keys.
//!
//! Every stage owns the keys it produces; triggers own the raw upload keys.
//! The reserved [`ERROR`] key holds only the most recent failure message and
//! may never appear in a stage's declared outputs.

/// Foundation material strength driving the simulation, in MPa.
pub const MATERIAL_INPUT: &str = "material_input";

/// Simulation output: rows of strain/stress pairs.
pub const SIMULATION_RESULT: &str = "simulation_result";

/// Uploaded cone-penetration-test trace, rows of depth/qc/fs readings.
pub const RAW_CPT_RECORDS: &str = "raw_cpt_records";

/// Uploaded soil layering table, rows of layer boundaries and soil types.
pub const RAW_LAYERING_RECORDS: &str = "raw_layering_records";

/// Soil-processing output: normalized CPT rows with derived quantities.
pub const PROCESSED_CPT_RECORDS: &str = "processed_cpt_records";

/// Soil-processing output: the validated soil profile table.
pub const SOIL_PROFILE_RECORDS: &str = "soil_profile_records";

/// Uploaded geological surface points, rows of x/y/z/formation.
pub const SURFACE_POINT_RECORDS: &str = "surface_point_records";

/// Uploaded structural orientations, rows of x/y/z/azimuth/dip/formation.
pub const ORIENTATION_RECORDS: &str = "orientation_records";

/// Geological-model output: metadata plus an artifact reference, never a
/// native model object.
pub const GEO_MODEL_SUMMARY: &str = "geo_model_summary";

/// Uploaded tower sensor time series, rows with a `value` sample per step.
pub const TIME_SERIES_RECORDS: &str = "time_series_records";

/// Modal-analysis output: rows of frequency/amplitude pairs.
pub const MODAL_RESULT: &str = "modal_result";

/// Reserved key holding the most recent stage failure message.
pub const ERROR: &str = "error";
