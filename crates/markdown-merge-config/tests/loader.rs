use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use markdown_merge_config::{Config, ConfigError, ConfigSourceKind, LinkStyle, LoadOptions};
use tempfile::TempDir;

fn write_file(path: impl AsRef<Path>, contents: &str) {
    let mut file = fs::File::create(path).expect("create config");
    file.write_all(contents.as_bytes()).expect("write config");
}

fn canonical(path: impl AsRef<Path>) -> PathBuf {
    fs::canonicalize(path).expect("canonicalize path")
}

fn targets(config: &Config) -> Vec<String> {
    config.groups.iter().map(|g| g.target.clone()).collect()
}

const MINIMAL: &str = r#"
[[groups]]
target = "Core/Core-Overview.md"
sources = ["Core/Core.md"]
"#;

#[test]
fn loads_defaults_around_a_local_table() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());
    write_file(working_dir.join(".markdown-merge.toml"), MINIMAL);

    let config = Config::load(LoadOptions::default().with_working_dir(working_dir.clone()))
        .expect("load defaults");

    assert_eq!(config.paths.source_root, working_dir);
    assert_eq!(config.paths.target_root, working_dir.join("merged"));
    assert_eq!(config.links.keep, LinkStyle::Target);
    assert_eq!(config.output.source_label, "Source");
    assert_eq!(config.output.hierarchy_separator, " > ");
    assert_eq!(targets(&config), vec!["Core/Core-Overview.md".to_string()]);

    let kinds: Vec<_> = config.sources.layers.iter().map(|l| l.kind).collect();
    assert_eq!(kinds, vec![ConfigSourceKind::Default, ConfigSourceKind::Local]);
}

#[test]
fn missing_table_is_a_configuration_failure() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());

    let err = Config::load(LoadOptions::default().with_working_dir(working_dir))
        .expect_err("no groups configured");
    match err {
        ConfigError::Validation(errors) => {
            assert!(errors.to_string().contains("no merge groups configured"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_table_reports_parse_error() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());
    write_file(
        working_dir.join(".markdown-merge.toml"),
        "[[groups]]\nsources = [\"a.md\"]\n",
    );

    let err = Config::load(LoadOptions::default().with_working_dir(working_dir))
        .expect_err("group without target");
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn collects_every_validation_failure() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());
    write_file(
        working_dir.join(".markdown-merge.toml"),
        r#"
        [links]
        keep = "alias"

        [output]
        source_label = " "

        [[groups]]
        target = "out.md"
        sources = ["../escape.md"]

        [[groups]]
        target = "./out.md"
        sources = ["fine.md"]
        "#,
    );

    let err = Config::load(LoadOptions::default().with_working_dir(working_dir))
        .expect_err("invalid config");
    let ConfigError::Validation(errors) = err else {
        panic!("expected validation errors");
    };
    let rendered = errors.to_string();
    assert_eq!(errors.iter().count(), 4, "{rendered}");
    assert!(rendered.contains("links.keep: unknown link style 'alias'"));
    assert!(rendered.contains("output.source_label: cannot be empty"));
    assert!(rendered.contains("groups[0].sources[0]"));
    assert!(rendered.contains("groups[1]: duplicate target 'out.md'"));
    assert!(rendered.contains("local config at"));
}

#[test]
fn applies_precedence_and_replaces_tables_wholesale() {
    let temp = TempDir::new().expect("tempdir");
    let git_root = canonical(temp.path());
    fs::create_dir(git_root.join(".git")).expect("create .git");

    write_file(
        git_root.join(".markdown-merge.toml"),
        r#"
        [paths]
        source = "vault/Falcor"

        [output]
        source_label = "Origin"
        hierarchy_separator = " / "

        [[groups]]
        target = "root.md"
        sources = ["a.md"]
        "#,
    );

    let workspace = git_root.join("workspace");
    fs::create_dir(&workspace).expect("create workspace");

    write_file(
        workspace.join(".markdown-merge.toml"),
        r#"
        [links]
        keep = "label"

        [output]
        hierarchy_separator = " :: "
        "#,
    );

    let config = Config::load(LoadOptions::default().with_working_dir(workspace.clone()))
        .expect("layered load");

    assert_eq!(config.paths.source_root, git_root.join("vault/Falcor"));
    assert_eq!(
        config.paths.target_root,
        git_root.join("vault/Falcor").join("merged")
    );
    assert_eq!(config.links.keep, LinkStyle::Label);
    assert_eq!(config.output.source_label, "Origin");
    assert_eq!(config.output.hierarchy_separator, " :: ");
    assert_eq!(targets(&config), vec!["root.md".to_string()]);

    let override_path = workspace.join("override.toml");
    write_file(
        &override_path,
        r#"
        [paths]
        target = "out"

        [[groups]]
        target = "b.md"
        sources = ["b1.md"]

        [[groups]]
        target = "a.md"
        sources = ["a1.md", "a2.md"]
        "#,
    );

    let config = Config::load(
        LoadOptions::default()
            .with_working_dir(workspace.clone())
            .with_override_path(&override_path),
    )
    .expect("override load");

    assert_eq!(config.paths.target_root, workspace.join("out"));
    assert_eq!(
        targets(&config),
        vec!["b.md".to_string(), "a.md".to_string()]
    );
    assert_eq!(config.groups.total_sources(), 3);
    let kinds: Vec<_> = config.sources.layers.iter().map(|l| l.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ConfigSourceKind::Default,
            ConfigSourceKind::GitRoot,
            ConfigSourceKind::Local,
            ConfigSourceKind::Override,
        ]
    );
}

#[test]
fn command_line_roots_resolve_against_working_dir() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());
    write_file(
        working_dir.join(".markdown-merge.toml"),
        &format!("[paths]\nsource = \"docs\"\ntarget = \"configured\"\n{MINIMAL}"),
    );

    let config = Config::load(
        LoadOptions::default()
            .with_working_dir(working_dir.clone())
            .with_source_root("other"),
    )
    .expect("source override");
    assert_eq!(config.paths.source_root, working_dir.join("other"));
    assert_eq!(config.paths.target_root, working_dir.join("configured"));

    let config = Config::load(
        LoadOptions::default()
            .with_working_dir(working_dir.clone())
            .with_target_root("/tmp/markdown-merge-out"),
    )
    .expect("target override");
    assert_eq!(config.paths.source_root, working_dir.join("docs"));
    assert_eq!(
        config.paths.target_root,
        PathBuf::from("/tmp/markdown-merge-out")
    );
    assert_eq!(
        config.sources.layers.last().map(|l| l.kind),
        Some(ConfigSourceKind::CommandLine)
    );
}

#[test]
fn missing_override_is_reported() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());

    let err = Config::load(
        LoadOptions::default()
            .with_working_dir(working_dir)
            .with_override_path("absent.toml"),
    )
    .expect_err("override missing");
    assert!(matches!(err, ConfigError::OverrideNotFound { .. }));
}

#[test]
fn misspelled_keys_inside_tables_are_rejected() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());
    let config_path = working_dir.join(".markdown-merge.toml");

    write_file(
        &config_path,
        "[[groups]]\ntarget = \"Core/Out.md\"\nsource = [\"Core/A.md\", \"Core/B.md\"]\n",
    );
    let err = Config::load(LoadOptions::default().with_working_dir(working_dir.clone()))
        .expect_err("`source` is not a group key");
    match err {
        ConfigError::Parse { source, .. } => {
            assert!(source.to_string().contains("unknown field `source`"), "{source}");
        }
        other => panic!("unexpected error: {other}"),
    }

    write_file(
        &config_path,
        &format!("[output]\nsource_lable = \"Origin\"\n{MINIMAL}"),
    );
    let err = Config::load(LoadOptions::default().with_working_dir(working_dir))
        .expect_err("misspelled output key");
    assert!(matches!(err, ConfigError::Parse { .. }));
}
