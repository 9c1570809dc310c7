use clap::Args;
use serde_json::Value;

use seller_insight_core::report::analyze_seller;

use super::{build_context, load_dataset, GlobalOptions};

/// Arguments for a single-seller benchmark
#[derive(Args)]
pub struct BenchmarkArgs {
    /// Order list CSV (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,

    /// Seller to benchmark
    #[arg(long)]
    pub seller: String,
}

pub fn run_benchmark(args: BenchmarkArgs, opts: &GlobalOptions) -> Result<Value, Box<dyn std::error::Error>> {
    let mut ctx = build_context(opts)?;
    let dataset = load_dataset(args.input.as_deref(), &ctx, opts)?;
    let result = analyze_seller(&mut ctx, &dataset, &args.seller)?;
    Ok(serde_json::to_value(result)?)
}
