//! Merge engine shared by markdown-merge commands.
//!
//! [`Operations`] owns the resolved configuration and runs the consolidation
//! driver: every group in the grouping table is merged in order, links are
//! normalised, provenance separators are inserted, and one document per
//! non-empty group is written below the target root.

use std::collections::HashSet;

use markdown_merge_config::{Config, MergeGroup};

pub mod consolidate;
pub mod diff;
pub mod events;
pub mod group;
pub mod links;
pub mod paths;
pub mod source;
pub mod summary;

pub use consolidate::{ConsolidateOutcome, MergeMode};
pub use events::{MergeEvent, MergeObserver, NoopObserver, RecordingObserver};
pub use group::{merge_group, GroupMerge, GroupMergeInput};
pub use links::LinkNormalizer;
pub use paths::DocumentLayout;
pub use source::{read_source, SourceDocument, SourceError};
pub use summary::{
    MergeResult, RunSummary, SourceIssue, SourceIssueKind, TargetReport, TargetStatus,
};

/// Errors that stop a run before any target is processed.
#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error("target '{target}' is not declared in the grouping table")]
    UnknownTarget { target: String },
}

/// Options for a consolidation pass.
#[derive(Clone, Debug, Default)]
pub struct ConsolidateOptions {
    pub mode: MergeMode,
    /// Restrict the pass to these targets; empty means every group.
    pub only: Vec<String>,
}

/// Operation bundle the CLI and other front ends hook into.
pub struct Operations {
    config: Config,
    normalizer: LinkNormalizer,
    layout: DocumentLayout,
}

impl Operations {
    /// Assemble the operation layer from config, compiling the link pattern once.
    pub fn new(config: Config) -> Self {
        let normalizer = LinkNormalizer::new(config.links.keep);
        let layout = DocumentLayout::from_settings(&config.output);
        Self {
            config,
            normalizer,
            layout,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the driver without observing progress.
    pub fn consolidate(
        &self,
        options: ConsolidateOptions,
    ) -> Result<ConsolidateOutcome, OperationError> {
        self.consolidate_with(options, &mut NoopObserver)
    }

    /// Run the driver, streaming progress to `observer`.
    ///
    /// Returns `Err` only for configuration-level problems detected before the
    /// first target; per-source and per-target failures are reported in the
    /// outcome.
    pub fn consolidate_with(
        &self,
        options: ConsolidateOptions,
        observer: &mut dyn MergeObserver,
    ) -> Result<ConsolidateOutcome, OperationError> {
        self.check_roots()?;
        let groups = self.select_groups(&options.only)?;

        Ok(consolidate::run(
            consolidate::ConsolidateRunInput {
                groups,
                source_root: &self.config.paths.source_root,
                target_root: &self.config.paths.target_root,
                mode: options.mode,
                normalizer: &self.normalizer,
                layout: &self.layout,
            },
            observer,
        ))
    }

    fn check_roots(&self) -> Result<(), OperationError> {
        let source_root = &self.config.paths.source_root;
        if !source_root.is_dir() {
            return Err(OperationError::Configuration(format!(
                "source root {} is not a directory",
                source_root.display()
            )));
        }

        let target_root = &self.config.paths.target_root;
        if target_root.exists() && !target_root.is_dir() {
            return Err(OperationError::Configuration(format!(
                "target root {} exists and is not a directory",
                target_root.display()
            )));
        }
        Ok(())
    }

    fn select_groups(&self, only: &[String]) -> Result<Vec<&MergeGroup>, OperationError> {
        if only.is_empty() {
            return Ok(self.config.groups.iter().collect());
        }

        let mut wanted = HashSet::new();
        for target in only {
            let group = self
                .config
                .groups
                .get(target)
                .ok_or_else(|| OperationError::UnknownTarget {
                    target: target.clone(),
                })?;
            wanted.insert(group.target.as_str());
        }

        let selected = self
            .config
            .groups
            .iter()
            .filter(|group| wanted.contains(group.target.as_str()))
            .collect();
        Ok(selected)
    }
}
