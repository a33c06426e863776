use std::io::{self, Write};
use std::path::Path;

use markdown_merge_ops::{
    ConsolidateOutcome, MergeEvent, MergeMode, MergeObserver, SourceIssue, SourceIssueKind,
    TargetReport, TargetStatus,
};

use crate::thousands;

const RULE: &str = "============================================================";

/// Streams one line per event to `out` while the driver runs.
///
/// With `quiet` set only warnings, errors and stale targets are printed.
/// The first write error stops further output and is returned by
/// [`PlainReporter::finish`].
pub struct PlainReporter<W: Write> {
    out: W,
    quiet: bool,
    error: Option<io::Error>,
}

impl<W: Write> PlainReporter<W> {
    pub fn new(out: W, quiet: bool) -> Self {
        Self {
            out,
            quiet,
            error: None,
        }
    }

    pub fn finish(self) -> io::Result<W> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.out),
        }
    }

    fn line(&mut self, text: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = writeln!(self.out, "{text}") {
            self.error = Some(err);
        }
    }

    fn progress(&mut self, text: &str) {
        if !self.quiet {
            self.line(text);
        }
    }

    fn skipped(&mut self, issue: &SourceIssue) {
        let text = match issue.kind {
            SourceIssueKind::Missing => format!("  [WARNING] missing source: {}", issue.path),
            SourceIssueKind::Unreadable => format!(
                "  [ERROR] failed to read {}: {}",
                issue.path,
                issue.reason.as_deref().unwrap_or("unknown error")
            ),
        };
        self.line(&text);
    }

    fn finished(&mut self, report: &TargetReport) {
        let target = &report.result.target;
        match &report.status {
            TargetStatus::Written => self.progress(&format!(
                "  [OK] merged {} sources ({} chars) -> {}",
                report.result.merged, report.result.chars, target
            )),
            TargetStatus::SkippedEmpty => self.progress(&format!(
                "  [SKIP] {target}: no readable sources, nothing written"
            )),
            TargetStatus::WriteFailed { reason } => {
                self.line(&format!("  [ERROR] failed to write {target}: {reason}"))
            }
            TargetStatus::Current => self.progress(&format!("  [CURRENT] {target}")),
            TargetStatus::Stale => {
                self.line(&format!("  [STALE] {target}"));
                if let Some(diff) = &report.diff {
                    self.line(diff.trim_end_matches('\n'));
                }
            }
        }
    }
}

impl<W: Write> MergeObserver for PlainReporter<W> {
    fn on_event(&mut self, event: MergeEvent<'_>) {
        match event {
            MergeEvent::TargetStarted { target, sources } => {
                self.progress(&format!("[MERGE] {target} ({sources} sources)"))
            }
            MergeEvent::SourceSkipped(issue) => self.skipped(issue),
            MergeEvent::TargetFinished(report) => self.finished(report),
        }
    }
}

/// Banner printed before the first target.
pub fn render_header(source_root: &Path, target_root: &Path, mode: MergeMode) -> String {
    let mut out = String::new();
    out.push_str(RULE);
    out.push_str("\nmarkdown-merge\n");
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!("Source root: {}\n", source_root.display()));
    out.push_str(&format!("Target root: {}\n", target_root.display()));
    if mode != MergeMode::Write {
        out.push_str(&format!("Mode: {mode}\n"));
    }
    out
}

/// Closing summary block for a finished run.
pub fn render_summary(outcome: &ConsolidateOutcome) -> String {
    let summary = &outcome.summary;
    let mut out = String::new();

    out.push('\n');
    out.push_str(RULE);
    out.push('\n');
    out.push_str(match outcome.mode {
        MergeMode::Write => "Merge complete\n",
        MergeMode::Check | MergeMode::Diff => "Check complete\n",
    });
    out.push_str(RULE);
    out.push('\n');

    out.push_str(&format!("Targets: {}\n", summary.targets));
    out.push_str(&format!(
        "Sources merged: {}/{}\n",
        summary.sources_merged, summary.sources_total
    ));
    out.push_str(&format!(
        "Total characters: {}\n",
        thousands(summary.chars_written)
    ));

    match outcome.mode {
        MergeMode::Write => {
            out.push_str(&format!("Targets written: {}\n", summary.targets_produced));
        }
        MergeMode::Check | MergeMode::Diff => {
            out.push_str(&format!(
                "Targets current: {}\n",
                summary.targets_produced - summary.targets_stale
            ));
            out.push_str(&format!("Targets stale: {}\n", summary.targets_stale));
        }
    }
    if summary.targets_skipped > 0 {
        out.push_str(&format!("Targets skipped: {}\n", summary.targets_skipped));
    }
    if summary.targets_failed > 0 {
        out.push_str(&format!("Targets failed: {}\n", summary.targets_failed));
    }

    if summary.sources_merged > 0 {
        if let Some(avg) = summary.average_sources_per_target() {
            out.push_str(&format!("Average sources per target: {avg:.2}\n"));
        }
        if let Some(avg) = summary.average_chars_per_source() {
            out.push_str(&format!(
                "Average characters per source: {}\n",
                thousands(avg.round() as usize)
            ));
        }
    }

    out.push('\n');
    out.push_str(&format!(
        "Output directory: {}\n",
        outcome.target_root.display()
    ));
    out
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use markdown_merge_ops::{MergeResult, RunSummary};
    use pretty_assertions::assert_eq;

    use super::*;

    fn report(target: &str, merged: usize, chars: usize, status: TargetStatus) -> TargetReport {
        TargetReport {
            result: MergeResult {
                target: target.into(),
                attempted: merged + 1,
                merged,
                chars,
            },
            status,
            issues: Vec::new(),
            diff: None,
        }
    }

    fn stream(quiet: bool, events: &[MergeEvent<'_>]) -> String {
        let mut reporter = PlainReporter::new(Vec::new(), quiet);
        for event in events {
            reporter.on_event(*event);
        }
        String::from_utf8(reporter.finish().expect("in-memory writer")).expect("utf8")
    }

    #[test]
    fn streams_progress_warnings_and_errors() {
        let missing = SourceIssue {
            target: "Core/Overview.md".into(),
            path: "Core/Gone.md".into(),
            kind: SourceIssueKind::Missing,
            reason: None,
        };
        let unreadable = SourceIssue {
            target: "Core/Overview.md".into(),
            path: "Core/Binary.md".into(),
            kind: SourceIssueKind::Unreadable,
            reason: Some("stream did not contain valid UTF-8".into()),
        };
        let written = report("Core/Overview.md", 2, 1500, TargetStatus::Written);
        let skipped = report("Empty.md", 0, 0, TargetStatus::SkippedEmpty);
        let failed = report(
            "Blocked/Doc.md",
            1,
            10,
            TargetStatus::WriteFailed {
                reason: "Not a directory (os error 20)".into(),
            },
        );

        let text = stream(
            false,
            &[
                MergeEvent::TargetStarted {
                    target: "Core/Overview.md",
                    sources: 4,
                },
                MergeEvent::SourceSkipped(&missing),
                MergeEvent::SourceSkipped(&unreadable),
                MergeEvent::TargetFinished(&written),
                MergeEvent::TargetFinished(&skipped),
                MergeEvent::TargetFinished(&failed),
            ],
        );

        assert_eq!(
            text,
            "[MERGE] Core/Overview.md (4 sources)\n\
             \x20 [WARNING] missing source: Core/Gone.md\n\
             \x20 [ERROR] failed to read Core/Binary.md: stream did not contain valid UTF-8\n\
             \x20 [OK] merged 2 sources (1500 chars) -> Core/Overview.md\n\
             \x20 [SKIP] Empty.md: no readable sources, nothing written\n\
             \x20 [ERROR] failed to write Blocked/Doc.md: Not a directory (os error 20)\n"
        );
    }

    #[test]
    fn quiet_keeps_problems_and_stale_targets() {
        let missing = SourceIssue {
            target: "a.md".into(),
            path: "gone.md".into(),
            kind: SourceIssueKind::Missing,
            reason: None,
        };
        let current = report("a.md", 1, 5, TargetStatus::Current);
        let mut stale = report("b.md", 1, 5, TargetStatus::Stale);
        stale.diff = Some("--- a/b.md\n+++ b/b.md\n".into());

        let text = stream(
            true,
            &[
                MergeEvent::TargetStarted {
                    target: "a.md",
                    sources: 2,
                },
                MergeEvent::SourceSkipped(&missing),
                MergeEvent::TargetFinished(&current),
                MergeEvent::TargetFinished(&stale),
            ],
        );

        assert_eq!(
            text,
            "  [WARNING] missing source: gone.md\n  [STALE] b.md\n--- a/b.md\n+++ b/b.md\n"
        );
    }

    #[test]
    fn summary_reports_totals_and_averages() {
        let outcome = ConsolidateOutcome {
            mode: MergeMode::Write,
            source_root: PathBuf::from("/docs"),
            target_root: PathBuf::from("/docs/merged"),
            targets: Vec::new(),
            summary: RunSummary {
                targets: 3,
                targets_produced: 2,
                targets_skipped: 1,
                targets_failed: 0,
                targets_stale: 0,
                sources_total: 9,
                sources_merged: 7,
                chars_written: 12345,
            },
            exit_code: 0,
        };

        assert_eq!(
            render_summary(&outcome),
            format!(
                "\n{RULE}\nMerge complete\n{RULE}\n\
                 Targets: 3\n\
                 Sources merged: 7/9\n\
                 Total characters: 12,345\n\
                 Targets written: 2\n\
                 Targets skipped: 1\n\
                 Average sources per target: 2.33\n\
                 Average characters per source: 1,764\n\
                 \n\
                 Output directory: /docs/merged\n"
            )
        );
    }

    #[test]
    fn summary_omits_averages_when_nothing_merged() {
        let outcome = ConsolidateOutcome {
            mode: MergeMode::Check,
            source_root: PathBuf::from("/docs"),
            target_root: PathBuf::from("/docs/merged"),
            targets: Vec::new(),
            summary: RunSummary {
                targets: 1,
                targets_skipped: 1,
                sources_total: 2,
                ..RunSummary::default()
            },
            exit_code: 0,
        };

        let text = render_summary(&outcome);
        assert!(text.contains("Check complete"));
        assert!(text.contains("Targets stale: 0"));
        assert!(!text.contains("Average"));
    }

    #[test]
    fn header_names_non_default_modes() {
        let header = render_header(Path::new("/src"), Path::new("/out"), MergeMode::Diff);
        assert!(header.contains("Source root: /src\n"));
        assert!(header.contains("Target root: /out\n"));
        assert!(header.ends_with("Mode: diff\n"));
        assert!(!render_header(Path::new("/src"), Path::new("/out"), MergeMode::Write)
            .contains("Mode:"));
    }
}
