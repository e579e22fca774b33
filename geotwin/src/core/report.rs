//! The per-run pipeline report consumed by the presenter.

use super::StageResult;
use serde::{Deserialize, Serialize};

/// One stage's outcome, paired with the stage name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageOutcome {
    /// The stage name.
    pub stage: String,
    /// What happened when the stage was invoked.
    pub result: StageResult,
}

/// Ordered record of every stage outcome in one orchestrator run.
///
/// The report is a pure value: it carries no run ids, durations, or
/// timestamps, so two runs over the same input compare equal. Run metadata
/// travels on the event sink instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    outcomes: Vec<StageOutcome>,
}

impl PipelineReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stage outcome.
    pub fn push(&mut self, stage: impl Into<String>, result: StageResult) {
        self.outcomes.push(StageOutcome {
            stage: stage.into(),
            result,
        });
    }

    /// Returns the outcomes in execution order.
    #[must_use]
    pub fn outcomes(&self) -> &[StageOutcome] {
        &self.outcomes
    }

    /// Returns the outcome for a named stage, if present.
    #[must_use]
    pub fn outcome_for(&self, stage: &str) -> Option<&StageOutcome> {
        self.outcomes.iter().find(|o| o.stage == stage)
    }

    /// Returns the number of recorded outcomes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns true if no outcomes were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Returns the number of successful stages.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_success()).count()
    }

    /// Returns the number of skipped stages.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_skipped()).count()
    }

    /// Returns the number of failed stages.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_failed()).count()
    }

    /// Returns true if any stage failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|o| o.result.is_failed())
    }

    /// Returns true if every recorded stage was skipped.
    #[must_use]
    pub fn all_skipped(&self) -> bool {
        !self.outcomes.is_empty() && self.outcomes.iter().all(|o| o.result.is_skipped())
    }

    /// Renders one human-readable line per stage, in execution order.
    #[must_use]
    pub fn summary_lines(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .map(|o| format!("{}: {}", o.stage, o.result))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sample_report() -> PipelineReport {
        let mut report = PipelineReport::new();
        report.push("simulation", StageResult::success(HashMap::new()));
        report.push("soil_processing", StageResult::skipped("missing inputs: raw_cpt_records"));
        report.push("geo_model", StageResult::failed("geo_model: empty surface table"));
        report
    }

    #[test]
    fn test_counts() {
        let report = sample_report();
        assert_eq!(report.len(), 3);
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.failed(), 1);
        assert!(report.has_failures());
        assert!(!report.all_skipped());
    }

    #[test]
    fn test_outcome_for_finds_by_stage_name() {
        let report = sample_report();
        let outcome = report.outcome_for("soil_processing").unwrap();
        assert!(outcome.result.is_skipped());
        assert!(report.outcome_for("modal_analysis").is_none());
    }

    #[test]
    fn test_summary_lines_keep_execution_order() {
        let lines = sample_report().summary_lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "simulation: completed");
        assert!(lines[1].starts_with("soil_processing: skipped"));
        assert!(lines[2].starts_with("geo_model: failed"));
    }

    #[test]
    fn test_all_skipped_requires_outcomes() {
        assert!(!PipelineReport::new().all_skipped());

        let mut report = PipelineReport::new();
        report.push("simulation", StageResult::skipped("missing inputs: material_input"));
        assert!(report.all_skipped());
    }

    #[test]
    fn test_reports_compare_by_value() {
        assert_eq!(sample_report(), sample_report());
    }
}
