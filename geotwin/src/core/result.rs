//! Stage result type with factory methods.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The outcome of one stage invocation.
///
/// Every adapter returns exactly one of these; the orchestrator aggregates
/// them uniformly. `StageResult` is immutable once created and provides
/// factory methods for each variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageResult {
    /// The stage ran and produced exactly the keys to merge into the session
    /// state. Never carries unrelated state.
    Success {
        /// New or updated session-state entries, keyed by output key.
        #[serde(default)]
        output: HashMap<String, serde_json::Value>,
    },
    /// The stage did not run; no side effects, state unchanged.
    Skipped {
        /// Why the stage was skipped.
        reason: String,
    },
    /// The wrapped computation failed; no partial output is merged.
    Failed {
        /// Actionable failure description, prefixed with the stage name.
        error: String,
    },
}

impl StageResult {
    /// Creates a successful result carrying the given output entries.
    #[must_use]
    pub fn success(output: HashMap<String, serde_json::Value>) -> Self {
        Self::Success { output }
    }

    /// Creates a successful result with a single output entry.
    #[must_use]
    pub fn success_value(key: impl Into<String>, value: serde_json::Value) -> Self {
        let mut output = HashMap::new();
        output.insert(key.into(), value);
        Self::Success { output }
    }

    /// Creates a skipped result with a reason.
    #[must_use]
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    /// Creates a skipped result naming the absent precondition keys.
    #[must_use]
    pub fn missing_inputs(keys: &[&str]) -> Self {
        Self::Skipped {
            reason: format!("missing inputs: {}", keys.join(", ")),
        }
    }

    /// Creates a failed result with an error message.
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }

    /// Returns true if the stage succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns true if the stage was skipped.
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    /// Returns true if the stage failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Returns the output entries for a successful result.
    #[must_use]
    pub fn output(&self) -> Option<&HashMap<String, serde_json::Value>> {
        match self {
            Self::Success { output } => Some(output),
            _ => None,
        }
    }

    /// Returns the skip reason, if skipped.
    #[must_use]
    pub fn skip_reason(&self) -> Option<&str> {
        match self {
            Self::Skipped { reason } => Some(reason),
            _ => None,
        }
    }

    /// Returns the error message, if failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { error } => Some(error),
            _ => None,
        }
    }

    /// Returns the short status label used in events and summaries.
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::Skipped { .. } => "skipped",
            Self::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for StageResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { .. } => write!(f, "completed"),
            Self::Skipped { reason } => write!(f, "skipped ({reason})"),
            Self::Failed { error } => write!(f, "failed ({error})"),
        }
    }
}
