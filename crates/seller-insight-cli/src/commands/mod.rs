pub mod batch;
pub mod benchmark;
pub mod sellers;

use chrono::NaiveDate;
use tracing::info;

use seller_insight_core::category::CategoryMapping;
use seller_insight_core::config::BenchmarkConfig;
use seller_insight_core::ingest::{load_orders, load_orders_file, Dataset};
use seller_insight_core::report::AnalysisContext;

use crate::input;

/// Flags shared by every subcommand.
pub struct GlobalOptions {
    pub config: Option<String>,
    pub categories: Option<String>,
    pub min_peer_orders: Option<usize>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Build the per-run context from `--config`, flag overrides and
/// `--categories`.
pub fn build_context(opts: &GlobalOptions) -> Result<AnalysisContext, Box<dyn std::error::Error>> {
    let mut config: BenchmarkConfig = match &opts.config {
        Some(path) if input::file::is_json(path) => {
            BenchmarkConfig::from_json(&input::file::read_text(path)?)?
        }
        Some(path) => input::file::read_config(path)?,
        None => BenchmarkConfig::default(),
    };
    if let Some(min) = opts.min_peer_orders {
        config.min_peer_orders = min;
    }
    let categories = match &opts.categories {
        Some(path) => CategoryMapping::from_file(input::file::resolve_path(path)?)?,
        None => CategoryMapping::default(),
    };
    Ok(AnalysisContext::new(config, categories)?)
}

/// Load the order list from `--input` or piped stdin and apply the period
/// filter.
pub fn load_dataset(
    path: Option<&str>,
    ctx: &AnalysisContext,
    opts: &GlobalOptions,
) -> Result<Dataset, Box<dyn std::error::Error>> {
    let columns = &ctx.config().columns;
    let (dataset, summary) = match path {
        Some(p) => load_orders_file(input::file::resolve_path(p)?, columns, ctx.categories())?,
        None => match input::stdin::read_stdin()? {
            Some(csv) => load_orders(csv.as_bytes(), columns, ctx.categories())?,
            None => return Err("--input <csv> required (or pipe an order list via stdin)".into()),
        },
    };
    info!(
        rows = summary.rows_read,
        kept = summary.rows_kept,
        "order list loaded"
    );

    if opts.start.is_none() && opts.end.is_none() {
        return Ok(dataset);
    }
    let filtered = dataset.within(opts.start, opts.end);
    if filtered.is_empty() {
        return Err("No orders in the selected period".into());
    }
    Ok(filtered)
}
