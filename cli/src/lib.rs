//! # Recipe Stats CLI
//!
//! Flag parsing, input and output handling, and logging setup for the
//! `recipe-stats` binary. The pipeline itself lives in `recipe-stats-runtime`.
//!
//! ```text
//! recipe-stats -f deliveries.json -p 10120 --from 10AM --to 3PM -m Potato,Veggie
//! ```

use anyhow::Context;
use clap::Parser;
use recipe_stats_core::{AggregatorInput, ConfigError, TimeOfDay, DEFAULT_POSTCODE};
use recipe_stats_runtime::{ChunkSize, MetricsRecorder, Processor, ProcessorConfig};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "recipe_stats=debug";

/// Summarize recipe delivery events into a JSON report.
#[derive(Parser, Debug, Clone)]
#[command(name = "recipe-stats", version, about, long_about = None)]
pub struct Args {
    /// JSON file containing an array of delivery events
    #[arg(short, long)]
    pub file: PathBuf,

    /// Where to write the report: `stdout` or a file path
    #[arg(short, long, default_value = "stdout")]
    pub output: String,

    /// Postcode whose deliveries are counted within the time window
    #[arg(short = 'p', long = "count-postcode", default_value = DEFAULT_POSTCODE)]
    pub count_postcode: String,

    /// Start of the delivery window, e.g. 10AM
    #[arg(long, default_value = "10AM")]
    pub from: TimeOfDay,

    /// End of the delivery window, e.g. 3PM
    #[arg(long, default_value = "3PM")]
    pub to: TimeOfDay,

    /// Comma-separated, case-sensitive terms matched against recipe names
    #[arg(
        short,
        long = "match-recipes",
        value_delimiter = ',',
        default_value = "Potato,Veggie,Mushroom"
    )]
    pub match_recipes: Vec<String>,

    /// Log pipeline progress to stderr (filter with RUST_LOG)
    #[arg(short, long)]
    pub log: bool,

    /// Records validated per worker; values below 1 mean 1
    #[arg(long, default_value_t = 2024, allow_negative_numbers = true)]
    pub chunk_size: i64,

    /// Print Prometheus metrics to stderr after the report
    #[arg(long)]
    pub metrics: bool,
}

impl Args {
    /// Aggregation settings from the flags, validated.
    ///
    /// Empty match terms are ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the postcode or window is unusable.
    pub fn aggregator_input(&self) -> Result<AggregatorInput, ConfigError> {
        let terms = self
            .match_recipes
            .iter()
            .filter(|term| !term.is_empty())
            .cloned();
        let input = AggregatorInput::new(
            self.count_postcode.clone(),
            self.from.clone(),
            self.to.clone(),
        )
        .with_terms(terms);
        input.validate()?;
        Ok(input)
    }

    /// Processor configuration from the flags.
    #[must_use]
    pub fn processor_config(&self) -> ProcessorConfig {
        ProcessorConfig::default().with_chunk_size(ChunkSize::new(self.chunk_size))
    }

    /// Where the report goes.
    #[must_use]
    pub fn output(&self) -> Output {
        Output::parse(&self.output)
    }
}

/// Report destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Standard output
    Stdout,
    /// A file, created or truncated
    File(PathBuf),
}

impl Output {
    /// `stdout` in any case means standard output; anything else is a path.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("stdout") {
            Self::Stdout
        } else {
            Self::File(PathBuf::from(value))
        }
    }

    /// Open the destination for writing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn open(&self) -> anyhow::Result<Box<dyn Write + Send>> {
        match self {
            Self::Stdout => Ok(Box::new(io::stdout())),
            Self::File(path) => {
                let file = File::create(path)
                    .with_context(|| format!("failed opening output file {}", path.display()))?;
                Ok(Box::new(BufWriter::new(file)))
            }
        }
    }
}

/// Install a stderr subscriber filtered by `RUST_LOG`, when `enabled`.
///
/// Without it nothing is logged.
pub fn init_logging(enabled: bool) {
    if !enabled {
        return;
    }

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

/// Run the pipeline over `args.file` and write the report.
///
/// Flags are validated and the output is opened before the input is read.
///
/// # Errors
///
/// Returns an error for invalid flags, unreadable input, input that is not a
/// JSON array of records, or a failed write.
pub async fn run(args: Args) -> anyhow::Result<()> {
    let input = args.aggregator_input().context("invalid flags")?;
    let metrics = if args.metrics {
        Some(MetricsRecorder::install()?)
    } else {
        None
    };
    let mut output = args.output().open()?;

    let bytes = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("failed reading input file {}", args.file.display()))?;
    tracing::debug!(file = %args.file.display(), bytes = bytes.len(), "Read input file");

    let report = Processor::new(args.processor_config(), input)
        .process(&bytes)
        .await?;

    report
        .write_pretty(&mut output)
        .context("failed writing report")?;

    if let Some(text) = metrics.as_ref().and_then(MetricsRecorder::render) {
        eprint!("{text}");
    }

    Ok(())
}
