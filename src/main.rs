mod batch;
mod config;
mod error;
mod fetch;
mod output;
mod parser;
mod record;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use batch::Department;
use config::{OutputConfig, RunConfig};
use fetch::{Fetcher, SourceFetcher};
use parser::segment::Layout;
use parser::UnknownLabels;

#[derive(Parser)]
#[command(name = "research_scraper", about = "Extract research project postings from department pages into JSON")]
struct Cli {
    /// HTTP timeout per request, in seconds
    #[arg(long, global = true, default_value_t = config::DEFAULT_TIMEOUT_SECS)]
    timeout: u64,
    /// Retries on HTTP 429/5xx before a source counts as unavailable
    #[arg(long, global = true, default_value_t = config::DEFAULT_MAX_RETRIES)]
    retries: u32,
    /// Discard labels that match no canonical field instead of keeping them
    #[arg(long, global = true)]
    drop_unknown_labels: bool,
    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract one page (URL or local HTML file) into a JSON file
    Extract {
        source: String,
        /// Output JSON path (default: data/json/<department>_projects.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Page layout to use instead of auto-detection
        #[arg(short, long, value_enum)]
        layout: Option<Layout>,
    },
    /// Extract many pages, one department each, and merge them
    Run {
        /// URLs or local files, processed in order
        sources: Vec<String>,
        /// File listing one source per line
        #[arg(short = 'f', long)]
        sources_file: Option<PathBuf>,
        /// Directory for per-department, combined and summary files
        #[arg(short, long, default_value = config::DEFAULT_OUTPUT_DIR)]
        output_dir: PathBuf,
        /// Per-department file name; `{department}` is replaced by the slug
        #[arg(long, default_value = config::DEFAULT_FILENAME_TEMPLATE)]
        filename_template: String,
        /// Combined output file name
        #[arg(long, default_value = config::DEFAULT_COMBINED_NAME)]
        combined_name: String,
        /// Page layout to use for every source instead of auto-detection
        #[arg(short, long, value_enum)]
        layout: Option<Layout>,
    },
    /// Concatenate existing per-department JSON files into one array
    Merge {
        /// Per-department JSON files, in the order to merge them
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Combined output path
        #[arg(short, long, default_value = "data/json/all_projects.json")]
        output: PathBuf,
    },
    /// Show the label variants each canonical field accepts
    Labels,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .init();

    let t0 = Instant::now();
    let mut cfg = RunConfig {
        timeout: Duration::from_secs(cli.timeout),
        max_retries: cli.retries,
        ..Default::default()
    };
    if cli.drop_unknown_labels {
        cfg.extract.unknown_labels = UnknownLabels::Drop;
    }

    let result = match cli.command {
        Commands::Extract { source, output, layout } => {
            cfg.extract.layout = layout;
            extract_one(&cfg, &source, output)
        }
        Commands::Run {
            mut sources,
            sources_file,
            output_dir,
            filename_template,
            combined_name,
            layout,
        } => {
            if let Some(path) = sources_file {
                sources.extend(config::read_sources_file(&path)?);
            }
            if sources.is_empty() {
                bail!("No sources given. Pass URLs/files or --sources-file.");
            }
            cfg.extract.layout = layout;
            cfg.output = OutputConfig {
                root: output_dir,
                filename_template,
                combined_name,
                ..Default::default()
            };
            run_many(&cfg, &sources)
        }
        Commands::Merge { inputs, output } => merge_files(&inputs, &output),
        Commands::Labels => {
            for (field, variants) in parser::fields::label_table() {
                println!("{:<26} {}", field.key(), variants.join(", "));
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn extract_one(cfg: &RunConfig, source: &str, output: Option<PathBuf>) -> anyhow::Result<()> {
    let fetcher = SourceFetcher::new(cfg.timeout, cfg.max_retries)?;
    let department = Department::resolve(source);
    let document = fetcher.fetch(source).with_context(|| format!("Failed to load {}", source))?;
    let result = batch::extract_source(&document, &department, &cfg.extract)?;

    let path = output.unwrap_or_else(|| cfg.output.department_path(&department.slug));
    output::write_records(&path, &result.records)?;
    println!("Saved {} projects to {}", result.count(), path.display());
    Ok(())
}

fn run_many(cfg: &RunConfig, sources: &[String]) -> anyhow::Result<()> {
    let fetcher = SourceFetcher::new(cfg.timeout, cfg.max_retries)?;

    let pb = ProgressBar::new(sources.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    println!("Processing {} sources...", sources.len());
    let report = batch::run_batch(sources, &fetcher, &cfg.extract, &pb);
    let summary = output::persist_batch(&cfg.output, &report)?;

    for d in &summary.departments {
        println!("  {:<40} {:>4} projects  {}", d.department, d.projects, d.file.display());
    }
    for f in &summary.failures {
        println!("  {:<40} FAILED ({}): {}", f.department, f.kind, f.error);
    }
    println!(
        "Saved {} projects from {}/{} sources to {}{}",
        summary.total_projects,
        summary.succeeded,
        summary.attempted,
        cfg.output.combined_path().display(),
        if summary.complete { "" } else { " (partial)" },
    );
    Ok(())
}

/// Records keep the ids they were written with; nothing is renumbered.
fn merge_files(inputs: &[PathBuf], out: &std::path::Path) -> anyhow::Result<()> {
    let mut combined = Vec::new();
    for path in inputs {
        let records = output::read_records(path)?;
        println!("  {:<40} {:>4} projects", path.display(), records.len());
        combined.extend(records);
    }
    output::write_records(out, &combined)?;
    println!("Saved {} projects to {}", combined.len(), out.display());
    Ok(())
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
