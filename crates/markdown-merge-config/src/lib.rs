//! Configuration primitives and loader for the markdown-merge toolkit.
//!
//! The loader resolves configuration using a fixed precedence stack:
//! built-in defaults → git root → working directory → override flag →
//! command-line root overrides. Parsed settings are normalised into typed
//! structures, and the grouping table is validated before any merge work
//! starts, so downstream crates never see duplicate or escaping targets.

use std::collections::HashSet;
use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

const CONFIG_FILE_NAME: &str = ".markdown-merge.toml";
const DEFAULT_MERGED_DIR: &str = "merged";
const DEFAULT_SOURCE_LABEL: &str = "Source";
const DEFAULT_HIERARCHY_SEPARATOR: &str = " > ";

/// Complete configuration resolved from defaults and on-disk overrides.
#[derive(Clone, Debug)]
pub struct Config {
    pub paths: PathSettings,
    pub links: LinkSettings,
    pub output: OutputSettings,
    pub groups: GroupingTable,
    pub sources: ConfigSources,
}

/// Absolute roots the merge engine reads from and writes to.
#[derive(Clone, Debug)]
pub struct PathSettings {
    pub source_root: PathBuf,
    pub target_root: PathBuf,
}

/// Settings for cross-reference normalisation.
#[derive(Clone, Debug)]
pub struct LinkSettings {
    pub keep: LinkStyle,
}

/// Which half of a `[[REF|LABEL]]` reference survives normalisation.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum LinkStyle {
    /// Keep `REF`, drop the label.
    #[default]
    Target,
    /// Keep `LABEL` when present, otherwise `REF`.
    Label,
}

impl LinkStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            LinkStyle::Target => "target",
            LinkStyle::Label => "label",
        }
    }
}

impl fmt::Display for LinkStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LinkStyle {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "target" => Ok(LinkStyle::Target),
            "label" => Ok(LinkStyle::Label),
            _ => Err(()),
        }
    }
}

/// Wording used when assembling merged documents.
#[derive(Clone, Debug)]
pub struct OutputSettings {
    pub source_label: String,
    pub hierarchy_separator: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings {
            source_label: DEFAULT_SOURCE_LABEL.to_owned(),
            hierarchy_separator: DEFAULT_HIERARCHY_SEPARATOR.to_owned(),
        }
    }
}

/// One target document and the ordered sources merged into it.
#[derive(Clone, Debug)]
pub struct MergeGroup {
    pub target: String,
    pub sources: Vec<String>,
    pub source: ConfigSource,
}

/// Ordered mapping from target path to its source list.
///
/// Target keys are unique once constructed; the same source may appear in
/// several groups.
#[derive(Clone, Debug, Default)]
pub struct GroupingTable {
    groups: Vec<MergeGroup>,
}

impl GroupingTable {
    /// Validate and normalise `groups`, preserving their order.
    pub fn new(groups: Vec<MergeGroup>) -> Result<Self, ConfigValidationErrors> {
        let mut errors = Vec::new();
        let table = build_table(groups, &mut errors);
        if errors.is_empty() {
            Ok(table)
        } else {
            Err(ConfigValidationErrors(errors))
        }
    }

    /// Convenience constructor for programmatic tables (tests, embedding).
    pub fn from_pairs<T, S>(
        pairs: impl IntoIterator<Item = (T, Vec<S>)>,
    ) -> Result<Self, ConfigValidationErrors>
    where
        T: Into<String>,
        S: Into<String>,
    {
        let source = ConfigSource::default(PathBuf::from("."));
        let groups = pairs
            .into_iter()
            .map(|(target, sources)| MergeGroup {
                target: target.into(),
                sources: sources.into_iter().map(Into::into).collect(),
                source: source.clone(),
            })
            .collect();
        GroupingTable::new(groups)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MergeGroup> {
        self.groups.iter()
    }

    pub fn get(&self, target: &str) -> Option<&MergeGroup> {
        let key = normalize_relative(target).ok()?;
        self.groups.iter().find(|group| group.target == key)
    }

    /// Number of source entries across every group, duplicates included.
    pub fn total_sources(&self) -> usize {
        self.groups.iter().map(|group| group.sources.len()).sum()
    }
}

/// Provenance information for resolved configuration.
#[derive(Clone, Debug)]
pub struct ConfigSources {
    pub working_directory: PathBuf,
    pub layers: Vec<ConfigSource>,
}

/// Specific layer of configuration (default/git/local/override/command line).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigSource {
    pub kind: ConfigSourceKind,
    pub path: Option<PathBuf>,
    pub base_dir: PathBuf,
}

impl ConfigSource {
    fn default(base_dir: PathBuf) -> Self {
        ConfigSource {
            kind: ConfigSourceKind::Default,
            path: None,
            base_dir,
        }
    }

    fn command_line(base_dir: PathBuf) -> Self {
        ConfigSource {
            kind: ConfigSourceKind::CommandLine,
            path: None,
            base_dir,
        }
    }

    fn for_file(kind: ConfigSourceKind, path: PathBuf) -> Self {
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        ConfigSource {
            kind,
            path: Some(path),
            base_dir,
        }
    }

    fn describe(&self) -> String {
        match (&self.kind, &self.path) {
            (ConfigSourceKind::Default, _) => "built-in defaults".to_owned(),
            (kind, Some(path)) => format!("{} at {}", kind, path.display()),
            (kind, None) => kind.to_string(),
        }
    }
}

/// Kinds of configuration sources, ordered from lowest to highest precedence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigSourceKind {
    Default,
    GitRoot,
    Local,
    Override,
    CommandLine,
}

impl fmt::Display for ConfigSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigSourceKind::Default => "defaults",
            ConfigSourceKind::GitRoot => "git-root config",
            ConfigSourceKind::Local => "local config",
            ConfigSourceKind::Override => "override config",
            ConfigSourceKind::CommandLine => "command line",
        };
        f.write_str(label)
    }
}

/// Loader options, typically supplied by the CLI layer.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub override_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
    pub source_root: Option<PathBuf>,
    pub target_root: Option<PathBuf>,
}

impl LoadOptions {
    pub fn with_override_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn with_working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }

    pub fn with_source_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_root = Some(path.into());
        self
    }

    pub fn with_target_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.target_root = Some(path.into());
        self
    }
}

/// Errors surfaced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to resolve working directory {attempted}: {source}")]
    WorkingDirectory {
        attempted: PathBuf,
        source: io::Error,
    },
    #[error("override config {path} not found")]
    OverrideNotFound { path: PathBuf },
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("configuration validation failed:\n{0}")]
    Validation(ConfigValidationErrors),
}

impl Config {
    /// Loads configuration using the precedence rules and returns typed settings.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let working_dir = resolve_working_dir(options.working_dir)?;
        let override_path = options
            .override_path
            .map(|path| make_absolute(&path, &working_dir));

        if let Some(path) = &override_path {
            if !path.exists() {
                return Err(ConfigError::OverrideNotFound { path: path.clone() });
            }
        }

        let default_source = ConfigSource::default(working_dir.clone());
        let mut merged = PartialConfig::empty();
        merged.merge(defaults_layer(default_source.clone()));

        let mut source_layers = vec![default_source];

        let git_root = find_git_root(&working_dir);
        let git_config_path = git_root.as_ref().map(|root| root.join(CONFIG_FILE_NAME));
        let local_config_path = working_dir.join(CONFIG_FILE_NAME);

        if let Some(path) = git_config_path.as_ref() {
            if path.exists() && Some(path) != override_path.as_ref() && path != &local_config_path {
                let source = ConfigSource::for_file(ConfigSourceKind::GitRoot, path.clone());
                merged.merge(load_layer(path, source.clone())?);
                source_layers.push(source);
            }
        }

        if local_config_path.exists() && Some(&local_config_path) != override_path.as_ref() {
            let source = ConfigSource::for_file(ConfigSourceKind::Local, local_config_path.clone());
            merged.merge(load_layer(&local_config_path, source.clone())?);
            source_layers.push(source);
        }

        if let Some(path) = override_path {
            let source = ConfigSource::for_file(ConfigSourceKind::Override, path.clone());
            merged.merge(load_layer(&path, source.clone())?);
            source_layers.push(source);
        }

        if options.source_root.is_some() || options.target_root.is_some() {
            let source = ConfigSource::command_line(working_dir.clone());
            merged.merge(PartialConfig {
                paths: Some(PathsPartial {
                    source: options
                        .source_root
                        .map(|path| Located::new(path, source.clone())),
                    target: options
                        .target_root
                        .map(|path| Located::new(path, source.clone())),
                }),
                ..PartialConfig::empty()
            });
            source_layers.push(source);
        }

        let config = merged.finalize().map_err(ConfigError::Validation)?;
        Ok(Config {
            paths: config.paths,
            links: config.links,
            output: config.output,
            groups: config.groups,
            sources: ConfigSources {
                working_directory: working_dir,
                layers: source_layers,
            },
        })
    }
}

fn resolve_working_dir(override_dir: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match override_dir {
        Some(path) => fs::canonicalize(&path).map_err(|source| ConfigError::WorkingDirectory {
            attempted: path,
            source,
        }),
        None => env::current_dir().map_err(|source| ConfigError::WorkingDirectory {
            attempted: PathBuf::from("."),
            source,
        }),
    }
}

fn make_absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn load_layer(path: &Path, source: ConfigSource) -> Result<PartialConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.into(),
        source,
    })?;
    parse_layer(&contents, source).map_err(|err| match err {
        LayerParseError::Parse { source } => ConfigError::Parse {
            path: path.into(),
            source,
        },
    })
}

fn parse_layer(contents: &str, source: ConfigSource) -> Result<PartialConfig, LayerParseError> {
    let raw: RawConfig =
        toml::from_str(contents).map_err(|source| LayerParseError::Parse { source })?;
    Ok(raw.into_partial(source))
}

fn defaults_layer(source: ConfigSource) -> PartialConfig {
    PartialConfig {
        paths: Some(PathsPartial {
            source: Some(Located::new(PathBuf::from("."), source.clone())),
            target: None,
        }),
        links: Some(LinksPartial {
            keep: Some(Located::new(
                LinkStyle::Target.as_str().to_owned(),
                source.clone(),
            )),
        }),
        output: Some(OutputPartial {
            source_label: Some(Located::new(DEFAULT_SOURCE_LABEL.into(), source.clone())),
            hierarchy_separator: Some(Located::new(DEFAULT_HIERARCHY_SEPARATOR.into(), source)),
        }),
        groups: None,
    }
}

fn find_git_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(".git").exists() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}

/// Normalise a table path: drop `.` segments and redundant separators, and
/// reject empty, absolute, or parent-relative entries.
pub fn normalize_relative(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        return Err("path cannot be empty".into());
    }

    let path = Path::new(value);
    let mut segments = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(segment) => segments.push(segment.to_string_lossy().into_owned()),
            Component::CurDir => {}
            Component::ParentDir => {
                return Err(format!("'{value}' must not contain '..' segments"));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(format!("'{value}' must be a relative path"));
            }
        }
    }

    if segments.is_empty() {
        return Err(format!("'{value}' does not name a file"));
    }
    Ok(segments.join("/"))
}

fn build_table(groups: Vec<MergeGroup>, errors: &mut Vec<ConfigValidationError>) -> GroupingTable {
    let mut seen = HashSet::new();
    let mut normalized = Vec::with_capacity(groups.len());

    for (idx, group) in groups.into_iter().enumerate() {
        let context = format!("groups[{idx}]");
        let target = match normalize_relative(&group.target) {
            Ok(target) => target,
            Err(message) => {
                errors.push(
                    ConfigValidationError::new(Some(group.source.clone()), format!("target {message}"))
                        .with_context(context),
                );
                continue;
            }
        };

        if !seen.insert(target.clone()) {
            errors.push(
                ConfigValidationError::new(
                    Some(group.source.clone()),
                    format!("duplicate target '{target}'"),
                )
                .with_context(context),
            );
            continue;
        }

        let mut sources = Vec::with_capacity(group.sources.len());
        for (source_idx, entry) in group.sources.iter().enumerate() {
            match normalize_relative(entry) {
                Ok(path) => sources.push(path),
                Err(message) => errors.push(
                    ConfigValidationError::new(Some(group.source.clone()), format!("source {message}"))
                        .with_context(format!("{context}.sources[{source_idx}]")),
                ),
            }
        }

        normalized.push(MergeGroup {
            target,
            sources,
            source: group.source,
        });
    }

    GroupingTable { groups: normalized }
}

#[derive(Debug)]
enum LayerParseError {
    Parse { source: toml::de::Error },
}

#[derive(Clone, Debug, Default)]
struct PartialConfig {
    paths: Option<PathsPartial>,
    links: Option<LinksPartial>,
    output: Option<OutputPartial>,
    groups: Option<Located<Vec<GroupPartial>>>,
}

impl PartialConfig {
    fn empty() -> Self {
        PartialConfig {
            paths: None,
            links: None,
            output: None,
            groups: None,
        }
    }

    fn merge(&mut self, mut other: PartialConfig) {
        if let Some(other_paths) = other.paths.take() {
            match &mut self.paths {
                Some(paths) => paths.merge(other_paths),
                None => self.paths = Some(other_paths),
            }
        }

        if let Some(other_links) = other.links.take() {
            match &mut self.links {
                Some(links) => links.merge(other_links),
                None => self.links = Some(other_links),
            }
        }

        if let Some(other_output) = other.output.take() {
            match &mut self.output {
                Some(output) => output.merge(other_output),
                None => self.output = Some(other_output),
            }
        }

        // The table is replaced as a whole; groups never interleave across layers.
        if other.groups.is_some() {
            self.groups = other.groups;
        }
    }

    fn finalize(self) -> Result<ResolvedConfig, ConfigValidationErrors> {
        let mut errors = Vec::new();

        let paths_partial = self.paths.unwrap_or_default();
        let source_loc = paths_partial.source.unwrap_or_else(|| {
            Located::new(PathBuf::from("."), ConfigSource::default(PathBuf::from(".")))
        });
        let source_root = resolve_path(&source_loc);
        let target_root = paths_partial
            .target
            .map(|located| resolve_path(&located))
            .unwrap_or_else(|| source_root.join(DEFAULT_MERGED_DIR));

        let links_partial = self.links.unwrap_or_default();
        let keep = match links_partial.keep {
            Some(located) => match located.value.parse::<LinkStyle>() {
                Ok(style) => style,
                Err(()) => {
                    errors.push(
                        ConfigValidationError::new(
                            Some(located.source.clone()),
                            format!(
                                "unknown link style '{}' (expected 'target' or 'label')",
                                located.value
                            ),
                        )
                        .with_context("links.keep"),
                    );
                    LinkStyle::default()
                }
            },
            None => LinkStyle::default(),
        };

        let output_partial = self.output.unwrap_or_default();
        let source_label = output_partial
            .source_label
            .map(|located| {
                if located.value.trim().is_empty() {
                    errors.push(
                        ConfigValidationError::new(
                            Some(located.source.clone()),
                            "cannot be empty".into(),
                        )
                        .with_context("output.source_label"),
                    );
                }
                located.value
            })
            .unwrap_or_else(|| DEFAULT_SOURCE_LABEL.to_owned());
        let hierarchy_separator = output_partial
            .hierarchy_separator
            .map(|located| located.value)
            .unwrap_or_else(|| DEFAULT_HIERARCHY_SEPARATOR.to_owned());

        let groups = match self.groups {
            Some(located) if !located.value.is_empty() => {
                let entries = located
                    .value
                    .into_iter()
                    .map(|group| MergeGroup {
                        target: group.target,
                        sources: group.sources,
                        source: located.source.clone(),
                    })
                    .collect();
                build_table(entries, &mut errors)
            }
            Some(located) => {
                errors.push(
                    ConfigValidationError::new(
                        Some(located.source),
                        "at least one merge group is required".into(),
                    )
                    .with_context("groups"),
                );
                GroupingTable::default()
            }
            None => {
                errors.push(
                    ConfigValidationError::new(
                        None,
                        format!("no merge groups configured; declare [[groups]] in {CONFIG_FILE_NAME}"),
                    )
                    .with_context("groups"),
                );
                GroupingTable::default()
            }
        };

        if !errors.is_empty() {
            return Err(ConfigValidationErrors(errors));
        }

        Ok(ResolvedConfig {
            paths: PathSettings {
                source_root,
                target_root,
            },
            links: LinkSettings { keep },
            output: OutputSettings {
                source_label,
                hierarchy_separator,
            },
            groups,
        })
    }
}

#[derive(Clone, Debug, Default)]
struct PathsPartial {
    source: Option<Located<PathBuf>>,
    target: Option<Located<PathBuf>>,
}

impl PathsPartial {
    fn merge(&mut self, other: PathsPartial) {
        if other.source.is_some() {
            self.source = other.source;
        }
        if other.target.is_some() {
            self.target = other.target;
        }
    }
}

#[derive(Clone, Debug, Default)]
struct LinksPartial {
    keep: Option<Located<String>>,
}

impl LinksPartial {
    fn merge(&mut self, other: LinksPartial) {
        if other.keep.is_some() {
            self.keep = other.keep;
        }
    }
}

#[derive(Clone, Debug, Default)]
struct OutputPartial {
    source_label: Option<Located<String>>,
    hierarchy_separator: Option<Located<String>>,
}

impl OutputPartial {
    fn merge(&mut self, other: OutputPartial) {
        if other.source_label.is_some() {
            self.source_label = other.source_label;
        }
        if other.hierarchy_separator.is_some() {
            self.hierarchy_separator = other.hierarchy_separator;
        }
    }
}

#[derive(Clone, Debug)]
struct GroupPartial {
    target: String,
    sources: Vec<String>,
}

#[derive(Clone, Debug)]
struct Located<T> {
    value: T,
    source: ConfigSource,
}

impl<T> Located<T> {
    fn new(value: T, source: ConfigSource) -> Self {
        Located { value, source }
    }
}

fn resolve_path(located: &Located<PathBuf>) -> PathBuf {
    let path = &located.value;
    if path.is_absolute() {
        path.clone()
    } else {
        normalize_lexically(located.source.base_dir.join(path))
    }
}

fn normalize_lexically(path: PathBuf) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                normalized.pop();
            }
            Component::CurDir => {}
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[derive(Clone, Debug)]
struct ResolvedConfig {
    paths: PathSettings,
    links: LinkSettings,
    output: OutputSettings,
    groups: GroupingTable,
}

/// Container for validation failures, formatted as a bullet list.
#[derive(Debug)]
pub struct ConfigValidationErrors(pub Vec<ConfigValidationError>);

impl fmt::Display for ConfigValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "- {err}")?;
        }
        Ok(())
    }
}

impl ConfigValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ConfigValidationError> {
        self.0.iter()
    }
}

/// Validation failure with optional provenance.
#[derive(Clone, Debug)]
pub struct ConfigValidationError {
    pub source: Option<ConfigSource>,
    pub message: String,
    pub context: Option<String>,
}

impl ConfigValidationError {
    fn new(source: Option<ConfigSource>, message: String) -> Self {
        ConfigValidationError {
            source,
            message,
            context: None,
        }
    }

    fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "{}: {}", context, self.message)?;
        } else {
            write!(f, "{}", self.message)?;
        }
        if let Some(source) = &self.source {
            write!(f, " ({})", source.describe())?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    paths: Option<RawPaths>,
    #[serde(default)]
    links: Option<RawLinks>,
    #[serde(default)]
    output: Option<RawOutput>,
    #[serde(default)]
    groups: Option<Vec<RawGroup>>,
}

impl RawConfig {
    fn into_partial(self, source: ConfigSource) -> PartialConfig {
        PartialConfig {
            paths: self.paths.map(|paths| paths.into_partial(source.clone())),
            links: self.links.map(|links| links.into_partial(source.clone())),
            output: self.output.map(|output| output.into_partial(source.clone())),
            groups: self.groups.map(|groups| {
                Located::new(
                    groups
                        .into_iter()
                        .map(|group| GroupPartial {
                            target: group.target,
                            sources: group.sources,
                        })
                        .collect(),
                    source,
                )
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPaths {
    #[serde(default)]
    source: Option<PathBuf>,
    #[serde(default)]
    target: Option<PathBuf>,
}

impl RawPaths {
    fn into_partial(self, source: ConfigSource) -> PathsPartial {
        PathsPartial {
            source: self.source.map(|value| Located::new(value, source.clone())),
            target: self.target.map(|value| Located::new(value, source)),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLinks {
    #[serde(default)]
    keep: Option<String>,
}

impl RawLinks {
    fn into_partial(self, source: ConfigSource) -> LinksPartial {
        LinksPartial {
            keep: self.keep.map(|value| Located::new(value, source)),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOutput {
    #[serde(default)]
    source_label: Option<String>,
    #[serde(default)]
    hierarchy_separator: Option<String>,
}

impl RawOutput {
    fn into_partial(self, source: ConfigSource) -> OutputPartial {
        OutputPartial {
            source_label: self
                .source_label
                .map(|value| Located::new(value, source.clone())),
            hierarchy_separator: self
                .hierarchy_separator
                .map(|value| Located::new(value, source)),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawGroup {
    target: String,
    #[serde(default)]
    sources: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_relative_collapses_current_dir_segments() {
        assert_eq!(
            normalize_relative("./Core//API/./Device.md").unwrap(),
            "Core/API/Device.md"
        );
    }

    #[test]
    fn normalize_relative_rejects_escaping_paths() {
        assert!(normalize_relative("../outside.md").is_err());
        assert!(normalize_relative("Core/../../outside.md").is_err());
        assert!(normalize_relative("/abs/path.md").is_err());
        assert!(normalize_relative("   ").is_err());
        assert!(normalize_relative("./").is_err());
    }

    #[test]
    fn table_rejects_duplicate_targets_after_normalisation() {
        let err = GroupingTable::from_pairs(vec![
            ("Core/A.md", vec!["a.md"]),
            ("./Core/A.md", vec!["b.md"]),
        ])
        .unwrap_err();
        assert_eq!(err.0.len(), 1);
        assert!(err.to_string().contains("duplicate target 'Core/A.md'"));
    }

    #[test]
    fn table_allows_sources_shared_between_groups() {
        let table = GroupingTable::from_pairs(vec![
            ("one.md", vec!["shared.md", "a.md"]),
            ("two.md", vec!["shared.md"]),
        ])
        .expect("shared sources are legitimate");
        assert_eq!(table.len(), 2);
        assert_eq!(table.total_sources(), 3);
        assert_eq!(table.get("./two.md").unwrap().sources, vec!["shared.md"]);
    }

    #[test]
    fn parse_layer_preserves_group_order() {
        let source = ConfigSource::default(PathBuf::from("/work"));
        let partial = parse_layer(
            r#"
            [[groups]]
            target = "z.md"
            sources = ["1.md"]

            [[groups]]
            target = "a.md"
            sources = ["2.md", "3.md"]
            "#,
            source,
        )
        .expect("parse");
        let groups = partial.groups.expect("groups").value;
        let targets: Vec<_> = groups.iter().map(|g| g.target.as_str()).collect();
        assert_eq!(targets, vec!["z.md", "a.md"]);
    }
}
