//! Event emission for pipeline observability.
//!
//! The orchestrator narrates each run (`pipeline.started`, `stage.completed`,
//! `pipeline.completed`) through an [`EventSink`]. Sinks are fire-and-forget:
//! emission never influences stage outcomes or the report.

mod sink;

pub use sink::{EventSink, LoggingEventSink, NoOpEventSink};
