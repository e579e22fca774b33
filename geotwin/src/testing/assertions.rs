//! Assertions over stage results and pipeline reports.

use crate::core::{PipelineReport, StageResult};
use std::collections::HashMap;

/// Asserts the result succeeded and returns its output entries.
pub fn assert_success(result: &StageResult) -> &HashMap<String, serde_json::Value> {
    result
        .output()
        .unwrap_or_else(|| panic!("expected success, got: {result}"))
}

/// Asserts the result was skipped for a reason containing `fragment`.
pub fn assert_skipped_containing(result: &StageResult, fragment: &str) {
    let reason = result
        .skip_reason()
        .unwrap_or_else(|| panic!("expected skipped, got: {result}"));
    assert!(
        reason.contains(fragment),
        "skip reason '{reason}' does not mention '{fragment}'"
    );
}

/// Asserts the result failed with a message containing `fragment`.
pub fn assert_failed_containing(result: &StageResult, fragment: &str) {
    let error = result
        .error()
        .unwrap_or_else(|| panic!("expected failure, got: {result}"));
    assert!(
        error.contains(fragment),
        "error '{error}' does not mention '{fragment}'"
    );
}

/// Asserts the report's status labels match, in execution order.
pub fn assert_report_statuses(report: &PipelineReport, expected: &[&str]) {
    let actual: Vec<&str> = report
        .outcomes()
        .iter()
        .map(|o| o.result.status_label())
        .collect();
    assert_eq!(actual, expected, "report statuses differ: {report:?}");
}
