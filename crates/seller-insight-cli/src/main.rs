mod commands;
mod input;
mod output;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::batch::BatchArgs;
use commands::benchmark::BenchmarkArgs;
use commands::sellers::SellersArgs;
use commands::GlobalOptions;

/// Category-relative seller performance reports
#[derive(Parser)]
#[command(
    name = "seller-insight",
    version,
    about = "Category-relative seller performance reports",
    long_about = "Benchmarks each seller in a marketplace order list against the peers \
                  of its main category: sales, customer and operational metrics, \
                  ratios against the peer average, tiers, grades and breakdowns."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Benchmark configuration file (YAML or JSON)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Category mapping table (CSV with Code,Name columns)
    #[arg(long, global = true)]
    categories: Option<String>,

    /// Minimum orders for a seller to count as a peer (overrides --config)
    #[arg(long, global = true)]
    min_peer_orders: Option<usize>,

    /// Only orders paid on or after this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    start: Option<NaiveDate>,

    /// Only orders paid on or before this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    end: Option<NaiveDate>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Benchmark one seller against its category peers
    Benchmark(BenchmarkArgs),
    /// Benchmark every seller (or a list of sellers) in one run
    Batch(BatchArgs),
    /// List sellers with order counts and main category
    Sellers(SellersArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let opts = GlobalOptions {
        config: cli.config,
        categories: cli.categories,
        min_peer_orders: cli.min_peer_orders,
        start: cli.start,
        end: cli.end,
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Benchmark(args) => commands::benchmark::run_benchmark(args, &opts),
        Commands::Batch(args) => commands::batch::run_batch(args, &opts),
        Commands::Sellers(args) => commands::sellers::run_sellers(args, &opts),
        Commands::Version => {
            println!("seller-insight {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
