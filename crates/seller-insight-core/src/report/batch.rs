use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{analyze_overall, analyze_seller, AnalysisContext, SellerReport};
use crate::error::SellerInsightError;
use crate::ingest::Dataset;
use crate::types::ComputationOutput;
use crate::SellerInsightResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub seller_id: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub reports: Vec<ComputationOutput<SellerReport>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall: Option<ComputationOutput<SellerReport>>,
    pub failures: Vec<BatchFailure>,
}

impl BatchOutcome {
    pub fn succeeded(&self) -> usize {
        self.reports.len()
    }
}

/// Report every requested seller, or every seller in the dataset when
/// `sellers` is `None`. A seller that fails is logged and skipped.
pub fn run_batch(
    ctx: &mut AnalysisContext,
    dataset: &Dataset,
    sellers: Option<&[String]>,
    include_overall: bool,
) -> SellerInsightResult<BatchOutcome> {
    if dataset.is_empty() {
        return Err(SellerInsightError::EmptyDataset(
            "No orders in the selected period".into(),
        ));
    }

    let targets: Vec<String> = match sellers {
        Some(ids) => ids.to_vec(),
        None => dataset.sellers(),
    };
    info!(sellers = targets.len(), "starting batch");

    let mut reports = Vec::with_capacity(targets.len());
    let mut failures = Vec::new();
    for seller_id in &targets {
        match analyze_seller(ctx, dataset, seller_id) {
            Ok(report) => reports.push(report),
            Err(e) => {
                warn!(seller_id = seller_id.as_str(), error = %e, "skipping seller");
                failures.push(BatchFailure {
                    seller_id: seller_id.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    let overall = if include_overall {
        Some(analyze_overall(ctx, dataset)?)
    } else {
        None
    };

    let stats = ctx.cache_stats();
    info!(
        succeeded = reports.len(),
        failed = failures.len(),
        benchmarks = stats.entries,
        cache_hits = stats.hits,
        "batch finished"
    );

    Ok(BatchOutcome {
        reports,
        overall,
        failures,
    })
}
