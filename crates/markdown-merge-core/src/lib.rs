//! Core orchestration layer for markdown-merge.

use markdown_merge_config::Config;
use markdown_merge_ops::{
    ConsolidateOptions, ConsolidateOutcome, MergeObserver, OperationError, Operations,
};

/// Entry point for higher-level consumers (the CLI, the bench tool).
pub struct MarkdownMerge {
    ops: Operations,
}

impl MarkdownMerge {
    /// Bootstrap the merge engine from resolved configuration.
    pub fn bootstrap(config: Config) -> Self {
        Self {
            ops: Operations::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        self.ops.config()
    }

    /// Access the operation bundle.
    pub fn operations(&self) -> &Operations {
        &self.ops
    }

    /// Run one consolidation pass, streaming progress to `observer`.
    pub fn run(
        &self,
        options: ConsolidateOptions,
        observer: &mut dyn MergeObserver,
    ) -> Result<ConsolidateOutcome, OperationError> {
        self.ops.consolidate_with(options, observer)
    }
}

#[cfg(test)]
mod tests {
    use markdown_merge_ops::{MergeMode, RecordingObserver};
    use markdown_merge_test_support::{test_config, Fixture};

    use super::*;

    #[test]
    fn bootstrapped_engine_runs_the_table() {
        let fixture = Fixture::new();
        fixture.write("src/a.md", "alpha");
        let engine = MarkdownMerge::bootstrap(test_config(
            &fixture.path("src"),
            &fixture.path("out"),
            &[("merged.md", &["a.md"])],
        ));

        let mut observer = RecordingObserver::default();
        let outcome = engine
            .run(ConsolidateOptions::default(), &mut observer)
            .expect("run");

        assert_eq!(outcome.mode, MergeMode::Write);
        assert_eq!(observer.started, vec!["merged.md"]);
        assert_eq!(engine.config().groups.len(), 1);
        assert!(fixture.read("out/merged.md").ends_with("alpha"));
    }
}
