use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

use depscope::core::{
    closure, load_records, project, project_all, project_structure, summarize, Analysis,
    AnalyzerOptions, CodebaseAnalyzer, ProjectionMode,
};
use depscope::formatters::{JsonFormatter, MermaidFormatter};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "depscope",
    version,
    author = "depscope developers",
    about = "File dependency graphs and function-usage hierarchies for JS/TS trees"
)]
struct Cli {
    /// Source directory to analyze
    #[arg(
        short,
        long,
        value_name = "PATH",
        required_unless_present = "records",
        conflicts_with = "records"
    )]
    input: Option<PathBuf>,

    /// Pre-extracted file records (JSON array or object keyed by path)
    #[arg(long, value_name = "FILE")]
    records: Option<PathBuf>,

    /// Output file; stdout when omitted
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// What to produce
    #[arg(short, long, value_enum, default_value_t = Report::Hierarchy)]
    report: Report,

    /// File to start from (closure, or a single hierarchy)
    #[arg(long, value_name = "FILE")]
    root: Option<String>,

    /// Comma-separated list of languages to analyze
    #[arg(
        short,
        long,
        value_name = "LANGS",
        value_delimiter = ',',
        default_value = "javascript,typescript"
    )]
    languages: Vec<String>,

    /// Directory for the on-disk parse cache
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// Do not read or write the on-disk parse cache
    #[arg(long)]
    no_cache: bool,

    /// Debug logging (overridden by DEPSCOPE_LOG)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
#[value(rename_all = "kebab-case")]
enum Report {
    /// Node and edge lists
    Graph,
    /// Transitive dependencies of --root
    Closure,
    /// Tree for --root, or trees for every root file
    Hierarchy,
    /// Trees for every file
    Trees,
    /// Per-file imports, calls and functions used from each dependency
    Summary,
    /// Mermaid flowchart
    Mermaid,
    /// Extracted file records, accepted again by --records
    Records,
    /// Directories and the analyzed files in each
    Structure,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env("DEPSCOPE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let start_time = Instant::now();

    let analysis = load_analysis(&cli)?;
    info!(
        files = analysis.index.len(),
        edges = analysis.graph.edge_count(),
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "analysis complete"
    );

    let rendered = render(&cli, &analysis)?;

    match &cli.output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(output = %path.display(), "report written");
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

fn load_analysis(cli: &Cli) -> Result<Analysis> {
    if let Some(records_path) = &cli.records {
        let records = load_records(records_path)
            .with_context(|| format!("Failed to ingest {}", records_path.display()))?;
        return Ok(CodebaseAnalyzer::from_records(records));
    }

    let input = cli
        .input
        .as_ref()
        .context("either --input or --records is required")?;

    let languages: Vec<&str> = cli
        .languages
        .iter()
        .map(|lang| lang.trim())
        .filter(|lang| !lang.is_empty())
        .collect();

    let mut analyzer = CodebaseAnalyzer::with_options(AnalyzerOptions {
        cache_dir: cli.cache_dir.clone(),
        no_cache: cli.no_cache,
    });
    analyzer.analyze(input, &languages)
}

fn render(cli: &Cli, analysis: &Analysis) -> Result<String> {
    let Analysis { index, graph } = analysis;
    let json = JsonFormatter::new();

    match cli.report {
        Report::Graph => json.format_graph(graph),
        Report::Closure => {
            let root = cli
                .root
                .as_deref()
                .context("--report closure needs --root")?;
            json.format_closure(&closure(graph, root))
        }
        Report::Hierarchy => match cli.root.as_deref() {
            Some(root) => json.format_hierarchy(&project(graph, index, root)),
            None => json.format_hierarchies(&project_all(graph, index, ProjectionMode::RootsOnly)),
        },
        Report::Trees => json.format_hierarchies(&project_all(graph, index, ProjectionMode::AllFiles)),
        Report::Summary => json.format_summaries(&summarize(graph, index)),
        Report::Mermaid => Ok(MermaidFormatter::new().format(graph, index)),
        Report::Records => json.format_records(index),
        Report::Structure => json.format_structure(&project_structure(index)),
    }
}
