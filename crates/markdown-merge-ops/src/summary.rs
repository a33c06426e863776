//! Per-target results and aggregate run statistics.

use serde::Serialize;

/// Why a listed source was left out of its target.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceIssueKind {
    Missing,
    Unreadable,
}

/// A source that was attempted but not merged.
#[derive(Clone, Debug, Serialize)]
pub struct SourceIssue {
    pub target: String,
    pub path: String,
    pub kind: SourceIssueKind,
    /// Underlying I/O or decode error for unreadable sources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Outcome of merging one group. Fixed once the group's merge completes.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct MergeResult {
    pub target: String,
    /// Sources listed for the target, whether or not they could be read.
    pub attempted: usize,
    /// Sources read and appended to the body.
    pub merged: usize,
    /// Characters of normalised source content in the body.
    pub chars: usize,
}

/// Terminal state of one target.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum TargetStatus {
    Written,
    SkippedEmpty,
    WriteFailed { reason: String },
    /// Check modes: the file on disk already matches.
    Current,
    /// Check modes: writing would change the file on disk.
    Stale,
}

impl TargetStatus {
    /// Whether the target has (or, in check modes, would have) an output document.
    pub fn is_produced(&self) -> bool {
        matches!(
            self,
            TargetStatus::Written | TargetStatus::Current | TargetStatus::Stale
        )
    }
}

/// Everything the driver learned about one target.
#[derive(Clone, Debug, Serialize)]
pub struct TargetReport {
    #[serde(flatten)]
    pub result: MergeResult,
    #[serde(flatten)]
    pub status: TargetStatus,
    pub issues: Vec<SourceIssue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

/// Aggregate over every processed target. Built incrementally via [`RunSummary::record`].
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct RunSummary {
    pub targets: usize,
    pub targets_produced: usize,
    pub targets_skipped: usize,
    pub targets_failed: usize,
    pub targets_stale: usize,
    pub sources_total: usize,
    pub sources_merged: usize,
    pub chars_written: usize,
}

impl RunSummary {
    pub fn record(&mut self, report: &TargetReport) {
        self.targets += 1;
        self.sources_total += report.result.attempted;
        self.sources_merged += report.result.merged;

        match &report.status {
            TargetStatus::SkippedEmpty => self.targets_skipped += 1,
            TargetStatus::WriteFailed { .. } => self.targets_failed += 1,
            TargetStatus::Stale => self.targets_stale += 1,
            TargetStatus::Written | TargetStatus::Current => {}
        }

        if report.status.is_produced() {
            self.targets_produced += 1;
            self.chars_written += report.result.chars;
        }
    }

    /// Merged sources per target, or `None` for an empty run.
    pub fn average_sources_per_target(&self) -> Option<f64> {
        (self.targets > 0).then(|| self.sources_merged as f64 / self.targets as f64)
    }

    /// Characters per merged source, or `None` when nothing merged.
    pub fn average_chars_per_source(&self) -> Option<f64> {
        (self.sources_merged > 0).then(|| self.chars_written as f64 / self.sources_merged as f64)
    }
}
