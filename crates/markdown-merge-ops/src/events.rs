//! Progress notifications emitted while a run is in flight.

use crate::summary::{SourceIssue, TargetReport};

/// Event stream observed in table order.
#[derive(Clone, Copy, Debug)]
pub enum MergeEvent<'a> {
    TargetStarted { target: &'a str, sources: usize },
    SourceSkipped(&'a SourceIssue),
    TargetFinished(&'a TargetReport),
}

/// Receives [`MergeEvent`]s as the driver produces them, so reporters can
/// stream warnings and confirmations instead of waiting for the summary.
pub trait MergeObserver {
    fn on_event(&mut self, event: MergeEvent<'_>);
}

/// Observer that discards every event.
pub struct NoopObserver;

impl MergeObserver for NoopObserver {
    fn on_event(&mut self, _event: MergeEvent<'_>) {}
}

/// Observer that keeps owned copies of skip and finish events, mostly for tests.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub started: Vec<String>,
    pub skipped: Vec<SourceIssue>,
    pub finished: Vec<TargetReport>,
}

impl MergeObserver for RecordingObserver {
    fn on_event(&mut self, event: MergeEvent<'_>) {
        match event {
            MergeEvent::TargetStarted { target, .. } => self.started.push(target.to_owned()),
            MergeEvent::SourceSkipped(issue) => self.skipped.push(issue.clone()),
            MergeEvent::TargetFinished(report) => self.finished.push(report.clone()),
        }
    }
}
