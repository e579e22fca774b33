//! # Geotwin
//!
//! The pipeline-orchestration core of an offshore wind-turbine geotechnical
//! digital twin.
//!
//! A monitoring session accumulates results in a shared key-value blob (the
//! [`state::SessionState`]). User actions trigger the
//! [`pipeline::Orchestrator`], which threads a snapshot of that blob through a
//! fixed sequence of independent processing stages:
//!
//! 1. **Simulation** - stress-strain response of the foundation material
//! 2. **SoilProcessing** - CPT trace normalization and soil profile layering
//! 3. **GeoModel** - structural summary of the geological model inputs
//! 4. **ModalAnalysis** - vibration spectrum of the tower sensor data
//!
//! Each stage checks its input keys against the snapshot, skips when inputs
//! are missing, and converts collaborator errors into per-stage failures that
//! never abort the run. The orchestrator merges successful outputs into a new
//! snapshot and returns it with a [`core::PipelineReport`] describing every
//! stage's outcome.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use geotwin::prelude::*;
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let config = GeotwinConfig::default();
//! let orchestrator = Orchestrator::standard(&config);
//!
//! let store = SessionStore::new();
//! let mut state = store.snapshot();
//! state.insert(keys::MATERIAL_INPUT, json!(150.0));
//! store.apply(state);
//!
//! let report = run_and_apply(&orchestrator, &store).await;
//! for line in report.summary_lines() {
//!     println!("{line}");
//! }
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod artifacts;
pub mod collaborators;
pub mod config;
pub mod core;
pub mod errors;
pub mod events;
pub mod observability;
pub mod pipeline;
pub mod stages;
pub mod state;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::artifacts::{ArtifactRef, ArtifactStore};
    pub use crate::config::GeotwinConfig;
    pub use crate::core::{
        OutputContractViolation, PipelineReport, StageDescriptor, StageOutcome, StageResult,
    };
    pub use crate::errors::{CollaboratorError, ConfigError};
    pub use crate::events::{EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::pipeline::{
        run_and_apply, run_and_apply_with_timeout, spawn_run_and_apply, Orchestrator, RunTimedOut,
    };
    pub use crate::stages::{
        GeoModelStage, ModalAnalysisStage, SimulationStage, SoilProcessingStage, Stage,
    };
    pub use crate::state::{keys, SessionId, SessionRegistry, SessionState, SessionStore};
}
