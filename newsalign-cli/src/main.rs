//! newsalign CLI: run the alignment pipeline, inspect headlines, write
//! synthetic datasets.
//!
//! Commands:
//! - `run`: build the enriched table from a TOML config and/or flags
//! - `news-stats`: print descriptive statistics for a news CSV
//! - `synth`: write deterministic synthetic price and news CSVs

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use newsalign_core::data::load_news_file;
use newsalign_core::LeadingRowPolicy;
use newsalign_runner::{
    run_from_config, save_outputs, write_synthetic_dataset, NewsStats, PipelineConfig, RunOutcome,
};

#[derive(Parser)]
#[command(
    name = "newsalign",
    about = "Align news sentiment with daily prices and technical indicators"
)]
struct Cli {
    /// Log filter, e.g. `info` or `newsalign_core=debug`. RUST_LOG wins when set.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline and write the enriched table and reports.
    Run {
        /// Path to a TOML config file. Flags below override it.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory of `<TICKER>.csv` price files.
        #[arg(long)]
        prices: Option<PathBuf>,

        /// News CSV (headline, publisher, date, stock).
        #[arg(long)]
        news: Option<PathBuf>,

        /// Output directory.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Keep rows before a ticker's first headline, with empty sentiment.
        #[arg(long, default_value_t = false)]
        keep_leading: bool,

        /// Also write every ticker's indicator table to `indicators.csv`.
        #[arg(long, default_value_t = false)]
        keep_indicator_tables: bool,

        /// Use synthetic data for these tickers instead of files.
        #[arg(long, num_args = 1..)]
        synthetic: Vec<String>,

        /// Worker threads (0 = all cores).
        #[arg(long)]
        threads: Option<usize>,
    },
    /// Print headline statistics for a news CSV as JSON.
    NewsStats {
        /// News CSV (headline, publisher, date, stock).
        #[arg(long)]
        news: PathBuf,

        /// Number of top words and publishers to list.
        #[arg(long, default_value_t = 20)]
        top: usize,
    },
    /// Write synthetic price and news CSVs.
    Synth {
        /// Tickers to generate.
        #[arg(long, required = true, num_args = 1..)]
        tickers: Vec<String>,

        /// Start date (YYYY-MM-DD).
        #[arg(long, default_value = "2023-01-02")]
        start: String,

        /// End date (YYYY-MM-DD).
        #[arg(long, default_value = "2023-12-29")]
        end: String,

        /// Output directory.
        #[arg(long, default_value = "synthetic")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_json)?;

    match cli.command {
        Commands::Run {
            config,
            prices,
            news,
            output,
            keep_leading,
            keep_indicator_tables,
            synthetic,
            threads,
        } => {
            let mut cfg = match config {
                Some(path) => PipelineConfig::from_file(&path)
                    .with_context(|| format!("failed to load config {}", path.display()))?,
                None => PipelineConfig::default(),
            };
            if prices.is_some() {
                cfg.data.prices_dir = prices;
            }
            if news.is_some() {
                cfg.data.news_path = news;
            }
            if let Some(output) = output {
                cfg.report.output_dir = output;
            }
            if keep_leading {
                cfg.pipeline.leading_rows = LeadingRowPolicy::KeepEmpty;
            }
            if keep_indicator_tables {
                cfg.pipeline.keep_indicator_tables = true;
            }
            if !synthetic.is_empty() {
                cfg.data.synthetic = true;
                cfg.data.synthetic_tickers = synthetic;
            }
            if let Some(threads) = threads {
                cfg.pipeline.threads = threads;
            }
            run_cmd(&cfg)
        }
        Commands::NewsStats { news, top } => news_stats_cmd(&news, top),
        Commands::Synth {
            tickers,
            start,
            end,
            output,
        } => synth_cmd(&tickers, &start, &end, &output),
    }
}

fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("invalid log filter '{level}'"))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = installed {
        bail!("failed to install logger: {e}");
    }
    Ok(())
}

fn run_cmd(config: &PipelineConfig) -> Result<()> {
    let outcome = run_from_config(config)?;
    print_summary(&outcome);

    let paths = save_outputs(&outcome, config, &config.report.output_dir)?;
    info!(dir = %config.report.output_dir.display(), "outputs written");
    if let Some(p) = &paths.enriched_csv {
        println!("Enriched table: {}", p.display());
    }
    if let Some(p) = &paths.parquet {
        println!("Parquet: {}", p.display());
    }
    if let Some(p) = &paths.manifest {
        println!("Manifest: {}", p.display());
    }
    if let Some(p) = &paths.report_markdown {
        println!("Report: {}", p.display());
    }
    Ok(())
}

fn print_summary(outcome: &RunOutcome) {
    let out = &outcome.output;
    let synthetic = if outcome.inputs.source == newsalign_runner::DataSource::Synthetic {
        " [SYNTHETIC]"
    } else {
        ""
    };
    println!("=== newsalign run{synthetic} ===");
    println!("Dataset:    {}", outcome.inputs.dataset_hash);
    println!("Headlines:  {}", out.scored_news.len());
    println!("Tickers:    {}", out.merge_report.per_ticker.len());
    println!("Rows:       {}", out.rows.len());
    println!("Dropped:    {} (before first headline)", out.merge_report.rows_dropped());
    for s in &out.skipped {
        println!("Skipped:    {} ({})", s.ticker, s.error);
    }
    for t in &out.merge_report.no_overlap {
        println!("No overlap: {t}");
    }
}

fn news_stats_cmd(path: &std::path::Path, top: usize) -> Result<()> {
    let (news, report) = load_news_file(path)
        .with_context(|| format!("failed to read news file {}", path.display()))?;
    if report.rows_dropped() > 0 {
        info!(dropped = report.rows_dropped(), "malformed news rows skipped");
    }
    let stats = NewsStats::from_news(&news, top, top);
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn synth_cmd(tickers: &[String], start: &str, end: &str, output: &std::path::Path) -> Result<()> {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d")
        .with_context(|| format!("invalid start date '{start}'"))?;
    let end = NaiveDate::parse_from_str(end, "%Y-%m-%d")
        .with_context(|| format!("invalid end date '{end}'"))?;
    if start > end {
        bail!("start date {start} is after end date {end}");
    }
    let files = write_synthetic_dataset(output, tickers, start, end)?;
    println!("Prices: {}", files.prices_dir.display());
    println!("News:   {}", files.news_path.display());
    Ok(())
}
