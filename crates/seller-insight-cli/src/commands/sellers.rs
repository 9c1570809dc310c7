use clap::Args;
use serde_json::{json, Value};

use seller_insight_core::category::main_category;

use super::{build_context, load_dataset, GlobalOptions};

/// Arguments for listing sellers
#[derive(Args)]
pub struct SellersArgs {
    /// Order list CSV (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_sellers(args: SellersArgs, opts: &GlobalOptions) -> Result<Value, Box<dyn std::error::Error>> {
    let ctx = build_context(opts)?;
    let dataset = load_dataset(args.input.as_deref(), &ctx, opts)?;

    let rows: Vec<Value> = dataset
        .order_counts()
        .into_iter()
        .map(|(seller_id, orders)| {
            let category = main_category(&dataset.seller_records(&seller_id));
            json!({
                "seller_id": seller_id,
                "orders": orders,
                "main_category": category,
            })
        })
        .collect();
    Ok(Value::Array(rows))
}
