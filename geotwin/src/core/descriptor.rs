//! Static stage metadata and the output-key contract.

use crate::state::{keys, SessionState};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

/// Error raised when a stage's `Success` output violates its declared
/// output-key contract.
#[derive(Debug, Clone, Error)]
#[error("stage '{stage}' returned undeclared output key '{key}'; declared keys: {declared:?}")]
pub struct OutputContractViolation {
    /// The offending stage.
    pub stage: String,
    /// The undeclared key it tried to merge.
    pub key: String,
    /// The keys the stage is allowed to produce.
    pub declared: Vec<String>,
}

/// Static metadata describing one stage.
///
/// Descriptors are created once when a stage is constructed and never
/// mutated. Presence of `required_input_keys` in the session snapshot is the
/// sole precondition for the stage being eligible to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageDescriptor {
    name: String,
    required_input_keys: Vec<String>,
    output_keys: Vec<String>,
    fresh_input_keys: Vec<String>,
    available: bool,
}

impl StageDescriptor {
    /// Creates a descriptor for an available stage.
    #[must_use]
    pub fn new(name: impl Into<String>, required: &[&str], outputs: &[&str]) -> Self {
        Self {
            name: name.into(),
            required_input_keys: required.iter().map(ToString::to_string).collect(),
            output_keys: outputs.iter().map(ToString::to_string).collect(),
            fresh_input_keys: Vec::new(),
            available: true,
        }
    }

    /// Declares keys this stage reads from the *current run's* partially
    /// updated state instead of the original input snapshot.
    ///
    /// By default stages read the input snapshot, which keeps precondition
    /// evaluation order-independent; opting in creates an explicit
    /// within-run dependency on an earlier stage's output.
    #[must_use]
    pub fn with_fresh_inputs(mut self, fresh: &[&str]) -> Self {
        self.fresh_input_keys = fresh.iter().map(ToString::to_string).collect();
        self
    }

    /// Marks the stage's external collaborator as absent.
    #[must_use]
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Sets the availability flag.
    #[must_use]
    pub fn with_availability(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    /// Returns the stage name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the keys that must be present for the stage to run.
    #[must_use]
    pub fn required_input_keys(&self) -> &[String] {
        &self.required_input_keys
    }

    /// Returns the keys the stage may produce.
    #[must_use]
    pub fn output_keys(&self) -> &[String] {
        &self.output_keys
    }

    /// Returns the keys the stage reads fresh from the current run.
    #[must_use]
    pub fn fresh_input_keys(&self) -> &[String] {
        &self.fresh_input_keys
    }

    /// Returns true if the stage's external collaborator is present.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Returns true if the stage opted in to reading the current run's
    /// partially updated state.
    #[must_use]
    pub fn reads_fresh_state(&self) -> bool {
        !self.fresh_input_keys.is_empty()
    }

    /// Returns the required keys absent from the given snapshot.
    #[must_use]
    pub fn missing_inputs<'a>(&'a self, state: &SessionState) -> Vec<&'a str> {
        self.required_input_keys
            .iter()
            .filter(|key| !state.contains_key(key))
            .map(String::as_str)
            .collect()
    }

    /// Validates a `Success` output against the declared output keys.
    ///
    /// The reserved `error` key is never a legal output; everything else must
    /// appear in `output_keys`.
    ///
    /// # Errors
    ///
    /// Returns [`OutputContractViolation`] naming the first undeclared key.
    pub fn validate_output(
        &self,
        output: &HashMap<String, serde_json::Value>,
    ) -> Result<(), OutputContractViolation> {
        for key in output.keys() {
            let declared = key != keys::ERROR && self.output_keys.iter().any(|k| k == key);
            if !declared {
                return Err(OutputContractViolation {
                    stage: self.name.clone(),
                    key: key.clone(),
                    declared: self.output_keys.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor() -> StageDescriptor {
        StageDescriptor::new("soil_processing", &["raw_cpt_records"], &["processed_cpt_records"])
    }

    #[test]
    fn test_missing_inputs_lists_absent_keys() {
        let state = SessionState::new();
        assert_eq!(descriptor().missing_inputs(&state), vec!["raw_cpt_records"]);

        let mut state = SessionState::new();
        state.insert("raw_cpt_records", json!([]));
        assert!(descriptor().missing_inputs(&state).is_empty());
    }

    #[test]
    fn test_validate_output_accepts_declared_keys() {
        let mut output = HashMap::new();
        output.insert("processed_cpt_records".to_string(), json!([]));
        assert!(descriptor().validate_output(&output).is_ok());
    }

    #[test]
    fn test_validate_output_rejects_undeclared_key() {
        let mut output = HashMap::new();
        output.insert("surprise".to_string(), json!(1));
        let err = descriptor().validate_output(&output).unwrap_err();
        assert_eq!(err.key, "surprise");
        assert!(err.to_string().contains("soil_processing"));
    }

    #[test]
    fn test_validate_output_rejects_reserved_error_key() {
        let mut output = HashMap::new();
        output.insert(keys::ERROR.to_string(), json!("smuggled"));
        assert!(descriptor().validate_output(&output).is_err());
    }

    #[test]
    fn test_fresh_inputs_flag() {
        let descriptor = descriptor().with_fresh_inputs(&["simulation_result"]);
        assert!(descriptor.reads_fresh_state());
        assert_eq!(descriptor.fresh_input_keys(), ["simulation_result"]);
        assert!(!StageDescriptor::new("x", &[], &[]).reads_fresh_state());
    }

    #[test]
    fn test_availability_flag() {
        assert!(descriptor().is_available());
        assert!(!descriptor().unavailable().is_available());
    }
}
