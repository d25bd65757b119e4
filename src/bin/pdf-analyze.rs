//! CLI binary for pdf-analyzer.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `AnalyzerConfig`, wires a terminal progress bar into the batch callback,
//! and prints a summary report.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf_analyzer::{
    analyze_documents, export_results, load_documents, AnalyzerConfig, BatchProgressCallback,
    CacheStore, ExportFormat, LlmClient, ProgressCallback,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: renders a live progress bar and per-document
/// log lines. The batch is sequential, so no out-of-order handling is needed.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} docs  \
             ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");
        bar.set_style(style);
        bar.set_prefix("Analyzing");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_docs: usize) {
        self.bar.set_length(total_docs as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Starting analysis of {total_docs} documents…"))
        ));
    }

    fn on_document_start(&self, _index: usize, _total: usize, filename: &str) {
        let short: String = filename.chars().take(25).collect();
        self.bar.set_message(short);
    }

    fn on_document_complete(&self, index: usize, total: usize, filename: &str, from_cache: bool) {
        let source = if from_cache { dim("cached") } else { String::new() };
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}",
            green("✓"),
            index,
            total,
            filename,
            source,
        ));
        self.bar.inc(1);
    }

    fn on_document_error(&self, index: usize, total: usize, filename: &str, error: &str) {
        // Truncate very long error messages to keep output tidy.
        let msg: String = if error.chars().count() > 80 {
            let head: String = error.chars().take(79).collect();
            format!("{head}\u{2026}")
        } else {
            error.to_string()
        };
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}",
            red("✗"),
            index,
            total,
            filename,
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total: usize, successful: usize, cached: usize) {
        self.bar.finish_and_clear();
        let failed = total.saturating_sub(successful);
        if failed == 0 {
            eprintln!(
                "{} {} documents analyzed  ({} from cache)",
                green("✔"),
                bold(&successful.to_string()),
                cached
            );
        } else {
            eprintln!(
                "{} {}/{} documents analyzed  ({} failed, {} from cache)",
                if successful == 0 { red("✘") } else { cyan("⚠") },
                bold(&successful.to_string()),
                total,
                red(&failed.to_string()),
                cached
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Analyze everything in the default input directory
  pdf-analyze

  # Explicit directories
  pdf-analyze --input-dir data/input_pdfs --output-dir data/output

  # First 10 documents, verbose logs
  pdf-analyze --max-docs 10 --verbose

  # Filter by filename pattern, export CSV only
  pdf-analyze --filter "report*.pdf" --format csv

  # Skip the cache and re-analyze every file
  pdf-analyze --no-cache

  # Drop cached results and exit
  pdf-analyze --clear-cache

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY      API key for the default provider (required)
  INPUT_DIR           Default input directory (data/input_pdfs)
  OUTPUT_DIR          Default output directory (data/output)
  MODEL_NAME          Default model (gemini-2.0-flash)
  MAX_CHARS_PER_DOC   Per-document character budget (15000)

A .env file in the working directory is loaded automatically.

SETUP:
  1. Set API key:   export GEMINI_API_KEY=...
  2. Analyze:       pdf-analyze -i my_pdfs -o out
"#;

/// Batch analysis of PDF documents using LLMs.
#[derive(Parser, Debug)]
#[command(
    name = "pdf-analyze",
    version,
    about = "Batch analysis of PDF documents using LLMs",
    long_about = "Extract text from every PDF in a directory, ask an LLM for a structured \
analysis (summary, key entities, action items, keywords), cache results by content hash, \
and export them to CSV / JSON / JSON Lines.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory containing PDF files to analyze.
    #[arg(short, long)]
    input_dir: Option<PathBuf>,

    /// Directory for export files.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Model to use (e.g. gemini-2.0-flash, gemini-2.5-pro).
    #[arg(short, long)]
    model_name: Option<String>,

    /// Maximum number of PDFs to process.
    #[arg(short = 'n', long)]
    max_docs: Option<usize>,

    /// Filename filter pattern (glob syntax, e.g. 'report*.pdf').
    #[arg(short = 'F', long = "filter")]
    filter_pattern: Option<String>,

    /// Output formats.
    #[arg(short, long, value_enum, num_args = 1.., default_values = ["csv", "jsonl"])]
    format: Vec<FormatArg>,

    /// Disable caching; re-analyze all files.
    #[arg(long)]
    no_cache: bool,

    /// Clear cached results and exit.
    #[arg(long)]
    clear_cache: bool,

    /// Disable the progress bar.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress most output (only show warnings/errors).
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Csv,
    Json,
    Jsonl,
}

impl From<FormatArg> for ExportFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Jsonl => ExportFormat::JsonLines,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Load configuration (env first, flags override) ──────────────────
    let mut config = AnalyzerConfig::from_env().context("Configuration error")?;
    if let Some(dir) = cli.input_dir {
        config.input_dir = dir;
    }
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }
    if let Some(model) = cli.model_name {
        config.model_name = model;
    }
    config.max_docs = cli.max_docs.or(config.max_docs);

    // ── Clear-cache mode ─────────────────────────────────────────────────
    if cli.clear_cache {
        if CacheStore::clear(&config.input_dir) {
            eprintln!("{} Cache cleared", green("✔"));
        } else {
            eprintln!("No cache to clear");
        }
        return Ok(());
    }

    if !cli.quiet {
        eprintln!("{}  input:  {}", dim("•"), config.input_dir.display());
        eprintln!("{}  output: {}", dim("•"), config.output_dir.display());
        eprintln!("{}  model:  {}", dim("•"), config.model_name);
        if let Some(ref pattern) = cli.filter_pattern {
            eprintln!("{}  filter: {}", dim("•"), pattern);
        }
    }

    // ── Load documents ───────────────────────────────────────────────────
    let documents = load_documents(
        &config.input_dir,
        config.max_docs,
        cli.filter_pattern.as_deref(),
    )
    .context("Failed to load PDF documents")?;

    if documents.is_empty() {
        eprintln!("No PDF documents found in {}", config.input_dir.display());
        return Ok(());
    }
    if !cli.quiet {
        eprintln!("{}  loaded: {} document(s)", dim("•"), documents.len());
    }

    // ── Cache ────────────────────────────────────────────────────────────
    let mut cache = if cli.no_cache {
        None
    } else {
        Some(CacheStore::load(&config.input_dir))
    };

    // ── Client + progress ───────────────────────────────────────────────
    let client = LlmClient::from_config(&config).context("Failed to initialise LLM client")?;

    if show_progress {
        let cb = CliProgressCallback::new();
        config.progress_callback = Some(cb as ProgressCallback);
    }

    // ── Analyze ──────────────────────────────────────────────────────────
    let results = analyze_documents(&client, &documents, &config, cache.as_mut()).await;

    if let Some(ref store) = cache {
        store.save(&config.input_dir);
    }

    // ── Export ───────────────────────────────────────────────────────────
    let formats: Vec<ExportFormat> = cli.format.iter().map(|&f| f.into()).collect();
    let written = export_results(&results, &config.output_dir, &formats)
        .context("Failed to export results")?;

    // ── Summary ──────────────────────────────────────────────────────────
    let successful = results.iter().filter(|r| r.is_successful()).count();
    let failed = results.len() - successful;
    if !cli.quiet {
        eprintln!();
        eprintln!("{}", bold("ANALYSIS COMPLETE"));
        eprintln!("  documents: {}", results.len());
        eprintln!("  successful: {}", green(&successful.to_string()));
        if failed > 0 {
            eprintln!("  failed: {}", red(&failed.to_string()));
        }
        eprintln!("  output files:");
        for (format, path) in &written {
            eprintln!("    {:<5} {}", format!("{format:?}").to_lowercase(), path.display());
        }
    }

    Ok(())
}
