use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};
use markdown_merge_config::{Config, LoadOptions};
use markdown_merge_core::MarkdownMerge;
use markdown_merge_format::{render_header, render_json, render_summary, PlainReporter, ReportFormat};
use markdown_merge_ops::{ConsolidateOptions, MergeMode, NoopObserver};

/// Exit code for problems detected before any target is processed.
const EXIT_CONFIGURATION: i32 = 2;

/// Entry point for CLI execution. Returns the desired exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();

    let mut load = LoadOptions::default();
    if let Some(path) = cli.config {
        load = load.with_override_path(path);
    }
    if let Some(path) = cli.source {
        load = load.with_source_root(path);
    }
    if let Some(path) = cli.target {
        load = load.with_target_root(path);
    }

    let config = match Config::load(load) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("markdown-merge: {err}");
            return Ok(EXIT_CONFIGURATION);
        }
    };
    let engine = MarkdownMerge::bootstrap(config);

    let mode = if cli.diff {
        MergeMode::Diff
    } else if cli.check {
        MergeMode::Check
    } else {
        MergeMode::Write
    };
    let options = ConsolidateOptions {
        mode,
        only: cli.only,
    };

    let format = match cli.format.unwrap_or(FormatValue::Plain) {
        FormatValue::Plain => ReportFormat::Plain,
        FormatValue::Json => ReportFormat::Json,
    };

    match format {
        ReportFormat::Plain => run_plain(&engine, options, cli.quiet),
        ReportFormat::Json => run_json(&engine, options),
    }
}

fn run_plain(engine: &MarkdownMerge, options: ConsolidateOptions, quiet: bool) -> Result<i32> {
    let paths = &engine.config().paths;
    if !quiet {
        emit(&render_header(
            &paths.source_root,
            &paths.target_root,
            options.mode,
        ))?;
        println!();
    }

    let stdout = io::stdout();
    let mut reporter = PlainReporter::new(stdout.lock(), quiet);
    let result = engine.run(options, &mut reporter);
    reporter.finish()?.flush()?;

    match result {
        Ok(outcome) => {
            emit(&render_summary(&outcome))?;
            Ok(outcome.exit_code)
        }
        Err(err) => {
            eprintln!("markdown-merge: {err}");
            Ok(EXIT_CONFIGURATION)
        }
    }
}

fn run_json(engine: &MarkdownMerge, options: ConsolidateOptions) -> Result<i32> {
    match engine.run(options, &mut NoopObserver) {
        Ok(outcome) => {
            emit(&render_json(&outcome)?)?;
            Ok(outcome.exit_code)
        }
        Err(err) => {
            eprintln!("markdown-merge: {err}");
            Ok(EXIT_CONFIGURATION)
        }
    }
}

fn emit(content: &str) -> Result<()> {
    print!("{}", content);
    if !content.ends_with('\n') {
        println!();
    }
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Consolidate fragmented Markdown notes into one document per topic"
)]
struct Cli {
    /// Explicit configuration file, layered over discovered `.markdown-merge.toml` files
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Override the source root
    #[arg(long, value_name = "DIR")]
    source: Option<PathBuf>,
    /// Override the target root (defaults to <source>/merged)
    #[arg(long, value_name = "DIR")]
    target: Option<PathBuf>,
    /// Restrict the run to one target (repeatable)
    #[arg(long = "only", value_name = "TARGET", action = ArgAction::Append)]
    only: Vec<String>,
    /// Report stale targets without writing anything
    #[arg(long, conflicts_with = "diff")]
    check: bool,
    /// Print unified diffs for stale targets without writing anything
    #[arg(long, conflicts_with = "check")]
    diff: bool,
    /// Select report format
    #[arg(long, value_enum)]
    format: Option<FormatValue>,
    /// Only print warnings, errors and the summary
    #[arg(long)]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatValue {
    Plain,
    Json,
}
