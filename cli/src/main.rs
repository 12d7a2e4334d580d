//! `recipe-stats`: summarize recipe delivery events into a JSON report.

use clap::Parser;
use recipe_stats_cli::{init_logging, run, Args};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log);
    run(args).await
}
