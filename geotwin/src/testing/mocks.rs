//! Mock stages, collaborators, and sinks for testing.

use crate::collaborators::simulation::{StressSimulator, StressStrainPoint};
use crate::core::{StageDescriptor, StageResult};
use crate::errors::CollaboratorError;
use crate::events::EventSink;
use crate::stages::Stage;
use crate::state::SessionState;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::fmt;

/// A stage driven by a closure, recording every snapshot it observes.
pub struct ScriptedStage {
    descriptor: StageDescriptor,
    script: Box<dyn Fn(&SessionState) -> StageResult + Send + Sync>,
    seen: Mutex<Vec<SessionState>>,
}

impl ScriptedStage {
    /// Creates a scripted stage.
    #[must_use]
    pub fn new(
        descriptor: StageDescriptor,
        script: impl Fn(&SessionState) -> StageResult + Send + Sync + 'static,
    ) -> Self {
        Self {
            descriptor,
            script: Box::new(script),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Creates a scripted stage that always returns a fixed result.
    #[must_use]
    pub fn fixed(descriptor: StageDescriptor, result: StageResult) -> Self {
        Self::new(descriptor, move |_| result.clone())
    }

    /// Returns the number of times the stage ran.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.seen.lock().len()
    }

    /// Returns the snapshots the stage observed, in call order.
    #[must_use]
    pub fn seen_states(&self) -> Vec<SessionState> {
        self.seen.lock().clone()
    }
}

impl fmt::Debug for ScriptedStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedStage")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Stage for ScriptedStage {
    fn descriptor(&self) -> &StageDescriptor {
        &self.descriptor
    }

    async fn run(&self, state: &SessionState) -> StageResult {
        self.seen.lock().push(state.clone());
        (self.script)(state)
    }
}

/// A stress simulator that always fails.
#[derive(Debug, Clone, Default)]
pub struct FailingSimulator {
    message: String,
}

impl FailingSimulator {
    /// Creates a failing simulator with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl StressSimulator for FailingSimulator {
    fn simulate(
        &self,
        _material_strength: f64,
    ) -> Result<Vec<StressStrainPoint>, CollaboratorError> {
        Err(CollaboratorError::invalid_input(self.message.clone()))
    }
}

/// An event sink that records every emitted event.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: Mutex<Vec<(String, Option<serde_json::Value>)>>,
}

impl CollectingEventSink {
    /// Creates an empty collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded `(event_type, data)` pairs, in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<(String, Option<serde_json::Value>)> {
        self.events.lock().clone()
    }

    /// Returns the recorded event types, in emission order.
    #[must_use]
    pub fn event_types(&self) -> Vec<String> {
        self.events.lock().iter().map(|(t, _)| t.clone()).collect()
    }
}

#[async_trait]
impl EventSink for CollectingEventSink {
    async fn emit(&self, event_type: &str, data: Option<serde_json::Value>) {
        self.events.lock().push((event_type.to_string(), data));
    }

    fn try_emit(&self, event_type: &str, data: Option<serde_json::Value>) {
        self.events.lock().push((event_type.to_string(), data));
    }
}
