//! Assembling the body of one target document.

use std::path::Path;

use markdown_merge_config::MergeGroup;

use crate::events::{MergeEvent, MergeObserver};
use crate::links::LinkNormalizer;
use crate::paths::DocumentLayout;
use crate::source::read_source;
use crate::summary::{MergeResult, SourceIssue};

/// Body text and bookkeeping for one group. `body` is empty exactly when
/// `result.merged == 0`.
#[derive(Clone, Debug)]
pub struct GroupMerge {
    pub body: String,
    pub result: MergeResult,
    pub issues: Vec<SourceIssue>,
}

impl GroupMerge {
    pub fn is_empty(&self) -> bool {
        self.result.merged == 0
    }
}

/// Input bundle shared by every group in a run.
pub struct GroupMergeInput<'a> {
    pub source_root: &'a Path,
    pub normalizer: &'a LinkNormalizer,
    pub layout: &'a DocumentLayout,
}

/// Merge `group`'s sources in listed order. Missing or unreadable sources are
/// reported to `observer`, recorded as issues, and skipped; they never abort
/// the group.
pub fn merge_group(
    group: &MergeGroup,
    input: &GroupMergeInput<'_>,
    observer: &mut dyn MergeObserver,
) -> GroupMerge {
    let mut body = String::new();
    let mut result = MergeResult {
        target: group.target.clone(),
        ..MergeResult::default()
    };
    let mut issues = Vec::new();

    for path in &group.sources {
        result.attempted += 1;

        let document = match read_source(input.source_root, path) {
            Ok(document) => document,
            Err(err) => {
                let issue = SourceIssue {
                    target: group.target.clone(),
                    path: err.path().to_owned(),
                    kind: err.kind(),
                    reason: err.reason(),
                };
                observer.on_event(MergeEvent::SourceSkipped(&issue));
                issues.push(issue);
                continue;
            }
        };

        let content = input.normalizer.normalize(&document.content);
        input.layout.push_provenance(&mut body, &document.path);
        body.push_str(&content);

        result.merged += 1;
        result.chars += content.chars().count();
    }

    GroupMerge {
        body,
        result,
        issues,
    }
}
