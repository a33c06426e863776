//! Shared test harness utilities for markdown-merge crates.

use std::fs;
use std::path::{Path, PathBuf};

use markdown_merge_config::{
    Config, ConfigSource, ConfigSourceKind, ConfigSources, GroupingTable, LinkSettings,
    LoadOptions, OutputSettings, PathSettings,
};
use tempfile::TempDir;

/// Temporary project directory with helpers for laying out source trees.
pub struct Fixture {
    _dir: TempDir,
    root: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = fs::canonicalize(dir.path()).expect("canonicalize tempdir");
        Fixture { _dir: dir, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Write `contents` at `relative`, creating parent directories.
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent directory");
        }
        fs::write(&path, contents).expect("write file");
        path
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).expect("read file")
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.path(relative).exists()
    }

    /// Write `.markdown-merge.toml` at the fixture root.
    pub fn write_config(&self, contents: &str) -> PathBuf {
        self.write(".markdown-merge.toml", contents)
    }

    /// Load configuration with the fixture root as working directory.
    pub fn load_config(&self) -> Config {
        Config::load(LoadOptions::default().with_working_dir(&self.root)).expect("load config")
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Fixture::new()
    }
}

/// Build a configuration directly from roots and `(target, sources)` pairs,
/// bypassing the file loader.
pub fn test_config(source_root: &Path, target_root: &Path, groups: &[(&str, &[&str])]) -> Config {
    let table = GroupingTable::from_pairs(
        groups
            .iter()
            .map(|(target, sources)| (*target, sources.to_vec())),
    )
    .expect("valid grouping table");

    Config {
        paths: PathSettings {
            source_root: source_root.to_path_buf(),
            target_root: target_root.to_path_buf(),
        },
        links: LinkSettings {
            keep: Default::default(),
        },
        output: OutputSettings::default(),
        groups: table,
        sources: ConfigSources {
            working_directory: source_root.to_path_buf(),
            layers: vec![ConfigSource {
                kind: ConfigSourceKind::Default,
                path: None,
                base_dir: source_root.to_path_buf(),
            }],
        },
    }
}
