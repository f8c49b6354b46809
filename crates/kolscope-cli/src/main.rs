mod analytics;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use kolscope_generation::OutputKind;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "kolscope")]
#[command(about = "KOLScope analytics command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Exclude retweets from an analytics file and recompute its summary
    Recompute {
        /// JSON file shaped like `{tweets, summary?, profile?}`
        #[arg(long)]
        input: PathBuf,
    },
    /// Derive the heuristic baseline used to steer generated estimates
    Baseline {
        /// Mention analytics JSON, or a post payload when `--window-days` is set
        #[arg(long)]
        input: PathBuf,
        /// Derive from the recomputed post summary over this many days
        #[arg(long)]
        window_days: Option<u64>,
    },
    /// Print the JSON Schema sent to the generation service
    Schema {
        /// One of: anomaly, buzz, kol
        kind: OutputKind,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = match cli.command {
        Commands::Recompute { input } => analytics::run_recompute(&input)?,
        Commands::Baseline { input, window_days } => {
            analytics::run_baseline(&input, window_days)?
        }
        Commands::Schema { kind } => analytics::render_schema(kind)?,
    };

    println!("{output}");
    Ok(())
}
