//! The consolidation driver: one pass over the grouping table.

use std::fmt;
use std::path::{Path, PathBuf};

use markdown_merge_config::MergeGroup;
use markdown_merge_utils::{atomic_write, read_existing};
use serde::Serialize;

use crate::diff::stale_target_diff;
use crate::events::{MergeEvent, MergeObserver};
use crate::group::{merge_group, GroupMerge, GroupMergeInput};
use crate::links::LinkNormalizer;
use crate::paths::DocumentLayout;
use crate::summary::{RunSummary, TargetReport, TargetStatus};

/// What the driver does with each assembled document.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeMode {
    /// Write every non-empty target, replacing existing files.
    #[default]
    Write,
    /// Compare with the files on disk without writing anything.
    Check,
    /// As `Check`, plus a unified diff for every stale target.
    Diff,
}

impl MergeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            MergeMode::Write => "write",
            MergeMode::Check => "check",
            MergeMode::Diff => "diff",
        }
    }
}

impl fmt::Display for MergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a full pass, ready for rendering.
#[derive(Clone, Debug, Serialize)]
pub struct ConsolidateOutcome {
    pub mode: MergeMode,
    pub source_root: PathBuf,
    pub target_root: PathBuf,
    pub targets: Vec<TargetReport>,
    pub summary: RunSummary,
    pub exit_code: i32,
}

/// Input bundle for one driver pass.
pub(crate) struct ConsolidateRunInput<'a> {
    pub groups: Vec<&'a MergeGroup>,
    pub source_root: &'a Path,
    pub target_root: &'a Path,
    pub mode: MergeMode,
    pub normalizer: &'a LinkNormalizer,
    pub layout: &'a DocumentLayout,
}

/// Process every group in order. Per-source and per-target failures are
/// folded into the reports; nothing here returns early.
pub(crate) fn run(
    input: ConsolidateRunInput<'_>,
    observer: &mut dyn MergeObserver,
) -> ConsolidateOutcome {
    let merge_input = GroupMergeInput {
        source_root: input.source_root,
        normalizer: input.normalizer,
        layout: input.layout,
    };

    let mut summary = RunSummary::default();
    let mut targets = Vec::with_capacity(input.groups.len());

    for group in &input.groups {
        observer.on_event(MergeEvent::TargetStarted {
            target: &group.target,
            sources: group.sources.len(),
        });

        let merged = merge_group(group, &merge_input, observer);
        let report = finish_target(merged, &input);

        summary.record(&report);
        observer.on_event(MergeEvent::TargetFinished(&report));
        targets.push(report);
    }

    let exit_code = match input.mode {
        MergeMode::Write => 0,
        MergeMode::Check | MergeMode::Diff if summary.targets_stale > 0 => 1,
        MergeMode::Check | MergeMode::Diff => 0,
    };

    ConsolidateOutcome {
        mode: input.mode,
        source_root: input.source_root.to_path_buf(),
        target_root: input.target_root.to_path_buf(),
        targets,
        summary,
        exit_code,
    }
}

fn finish_target(merged: GroupMerge, input: &ConsolidateRunInput<'_>) -> TargetReport {
    let skip = merged.is_empty();
    let GroupMerge {
        body,
        result,
        issues,
    } = merged;

    if skip {
        return TargetReport {
            result,
            status: TargetStatus::SkippedEmpty,
            issues,
            diff: None,
        };
    }

    let document = input.layout.assemble(&result.target, &body);
    let destination = input.target_root.join(&result.target);

    let (status, diff) = match input.mode {
        MergeMode::Write => match atomic_write(&destination, &document) {
            Ok(()) => (TargetStatus::Written, None),
            Err(err) => (
                TargetStatus::WriteFailed {
                    reason: err.to_string(),
                },
                None,
            ),
        },
        MergeMode::Check | MergeMode::Diff => {
            // An unreadable previous output would be replaced, so it is stale.
            let existing = read_existing(&destination).ok().flatten();
            match existing {
                Some(existing) if existing == document => (TargetStatus::Current, None),
                existing => {
                    let diff = (input.mode == MergeMode::Diff)
                        .then(|| {
                            stale_target_diff(existing.as_deref(), &document, &result.target)
                        })
                        .flatten();
                    (TargetStatus::Stale, diff)
                }
            }
        }
    };

    TargetReport {
        result,
        status,
        issues,
        diff,
    }
}
