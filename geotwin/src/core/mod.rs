//! Core domain model types for geotwin.
//!
//! This module contains the fundamental types shared by stages and the
//! orchestrator:
//! - Stage result tagged variant with factory methods
//! - Static stage descriptors with the output-key contract
//! - The pipeline report consumed by the presenter

mod descriptor;
mod report;
mod result;

pub use descriptor::{OutputContractViolation, StageDescriptor};
pub use report::{PipelineReport, StageOutcome};
pub use result::StageResult;
