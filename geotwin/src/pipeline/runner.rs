//! Trigger-side helpers around one orchestrator run.
//!
//! A trigger (button press, upload handler, refresh timer) snapshots the
//! session, runs the orchestrator, and applies the returned state. These
//! helpers implement that loop; the store's `apply` is the only critical
//! section and nothing holds it across stage execution.

use super::Orchestrator;
use crate::core::PipelineReport;
use crate::state::SessionStore;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Error returned when a bounded run exceeded its deadline.
///
/// A timed-out run never calls `apply`, so the session keeps its prior
/// snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("pipeline run timed out after {timeout:?}; session state left unchanged")]
pub struct RunTimedOut {
    /// The deadline that was exceeded.
    pub timeout: Duration,
}

/// Snapshots the session, runs the pipeline, and applies the result.
pub async fn run_and_apply(orchestrator: &Orchestrator, store: &SessionStore) -> PipelineReport {
    let snapshot = store.snapshot();
    let (new_state, report) = orchestrator.run(&snapshot).await;
    store.apply(new_state);
    report
}

/// Like [`run_and_apply`], but bounded by a caller-imposed deadline.
///
/// # Errors
///
/// Returns [`RunTimedOut`] when the run exceeds the deadline; the store is
/// left at its prior snapshot.
pub async fn run_and_apply_with_timeout(
    orchestrator: &Orchestrator,
    store: &SessionStore,
    timeout: Duration,
) -> Result<PipelineReport, RunTimedOut> {
    let snapshot = store.snapshot();
    match tokio::time::timeout(timeout, orchestrator.run(&snapshot)).await {
        Ok((new_state, report)) => {
            store.apply(new_state);
            Ok(report)
        }
        Err(_) => Err(RunTimedOut { timeout }),
    }
}

/// Runs the pipeline on a worker task so the triggering path stays
/// responsive.
#[must_use]
pub fn spawn_run_and_apply(
    orchestrator: Arc<Orchestrator>,
    store: Arc<SessionStore>,
) -> tokio::task::JoinHandle<PipelineReport> {
    tokio::spawn(async move { run_and_apply(&orchestrator, &store).await })
}
