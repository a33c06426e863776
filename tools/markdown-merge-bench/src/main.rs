use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use markdown_merge_config::{Config, LoadOptions};
use markdown_merge_core::MarkdownMerge;
use markdown_merge_ops::{ConsolidateOptions, MergeMode};
use tempfile::TempDir;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Benchmark harness for markdown-merge runs over a synthetic vault"
)]
struct Args {
    /// Number of merge groups in the generated table
    #[arg(long, default_value_t = 50)]
    groups: usize,

    /// Sources listed per group
    #[arg(long, default_value_t = 20)]
    sources: usize,

    /// Paragraphs per generated source note
    #[arg(long, default_value_t = 12)]
    paragraphs: usize,

    /// Number of warm-up iterations (not counted in results)
    #[arg(long, default_value_t = 1)]
    warmup: usize,

    /// Number of measured iterations
    #[arg(long, default_value_t = 5)]
    iterations: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if args.iterations == 0 {
        anyhow::bail!("--iterations must be at least 1");
    }

    let vault = TempDir::new().context("failed to create benchmark directory")?;
    generate_vault(vault.path(), &args)?;

    let config = Config::load(LoadOptions::default().with_working_dir(vault.path()))?;
    let engine = MarkdownMerge::bootstrap(config);

    let write_result = benchmark("write", args.warmup, args.iterations, || {
        run(&engine, MergeMode::Write)
    })?;
    let check_result = benchmark("check", args.warmup, args.iterations, || {
        run(&engine, MergeMode::Check)
    })?;

    println!(
        "vault: {} groups x {} sources ({} paragraphs each)\n",
        args.groups, args.sources, args.paragraphs
    );
    print_summary(&[write_result, check_result]);
    Ok(())
}

fn run(engine: &MarkdownMerge, mode: MergeMode) -> Result<()> {
    let options = ConsolidateOptions {
        mode,
        ..ConsolidateOptions::default()
    };
    engine.operations().consolidate(options)?;
    Ok(())
}

/// Lay out `notes/Topic-<g>/Note-<s>.md` files plus a table merging each
/// topic into `Topic-<g>/Topic-<g>-Merged.md`. Every tenth group lists one
/// missing note so the skip path is exercised too.
fn generate_vault(root: &Path, args: &Args) -> Result<()> {
    let mut table = String::from("[paths]\nsource = \"notes\"\n");

    for group in 0..args.groups {
        let topic = format!("Topic-{group}");
        let dir = root.join("notes").join(&topic);
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;

        let mut sources = Vec::with_capacity(args.sources + 1);
        for source in 0..args.sources {
            let name = format!("Note-{source}.md");
            let path = dir.join(&name);
            fs::write(&path, note_body(group, source, args.paragraphs))
                .with_context(|| format!("failed to write {}", path.display()))?;
            sources.push(format!("\"{topic}/{name}\""));
        }
        if group % 10 == 0 {
            sources.push(format!("\"{topic}/Missing.md\""));
        }

        let _ = write!(
            table,
            "\n[[groups]]\ntarget = \"{topic}/{topic}-Merged.md\"\nsources = [{}]\n",
            sources.join(", ")
        );
    }

    let config_path = root.join(".markdown-merge.toml");
    fs::write(&config_path, table)
        .with_context(|| format!("failed to write {}", config_path.display()))
}

fn note_body(group: usize, source: usize, paragraphs: usize) -> String {
    let mut body = format!("# Note {group}.{source}\n");
    for paragraph in 0..paragraphs {
        let _ = write!(
            body,
            "\nParagraph {paragraph} links [[Topic-{group}/Note-{next}]] and \
             [[Glossary|the glossary]] while describing 渲染 pipelines.\n",
            next = (source + 1) % 7
        );
    }
    body
}

struct BenchResult {
    name: String,
    iterations: usize,
    average: Duration,
    median: Duration,
}

fn benchmark<F>(name: &str, warmup: usize, iterations: usize, mut f: F) -> Result<BenchResult>
where
    F: FnMut() -> Result<()>,
{
    for _ in 0..warmup {
        f()?;
    }

    let mut samples = Vec::with_capacity(iterations);
    for _ in 0..iterations {
        let start = Instant::now();
        f()?;
        samples.push(start.elapsed());
    }

    samples.sort();
    let total = samples
        .iter()
        .copied()
        .fold(Duration::ZERO, |acc, sample| acc + sample);
    let average = total / (iterations as u32);
    let median = samples[samples.len() / 2];

    Ok(BenchResult {
        name: name.to_string(),
        iterations,
        average,
        median,
    })
}

fn print_summary(results: &[BenchResult]) {
    println!("markdown-merge benchmark results:\n");
    for result in results {
        println!(
            "- {}: avg {:?} (median {:?}) over {} iterations",
            result.name, result.average, result.median, result.iterations
        );
    }
}
