use clap::Args;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::info;

use seller_insight_core::report::{self, BatchOutcome};
use seller_insight_core::Period;

use super::{build_context, load_dataset, GlobalOptions};

/// Arguments for a multi-seller run
#[derive(Args)]
pub struct BatchArgs {
    /// Order list CSV (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,

    /// Sellers to report (repeatable); all sellers when omitted
    #[arg(long = "seller")]
    pub sellers: Vec<String>,

    /// Write one JSON report per seller plus index.json into this directory
    #[arg(long)]
    pub out_dir: Option<String>,

    /// Also report the whole dataset as a pseudo-seller
    #[arg(long, default_value_t = false)]
    pub overall: bool,
}

pub fn run_batch(args: BatchArgs, opts: &GlobalOptions) -> Result<Value, Box<dyn std::error::Error>> {
    let mut ctx = build_context(opts)?;
    let dataset = load_dataset(args.input.as_deref(), &ctx, opts)?;

    let sellers = if args.sellers.is_empty() {
        None
    } else {
        Some(args.sellers.as_slice())
    };
    let outcome = report::run_batch(&mut ctx, &dataset, sellers, args.overall)?;
    let cache = ctx.cache_stats();

    match args.out_dir {
        Some(dir) => {
            let index = write_reports(Path::new(&dir), &outcome)?;
            Ok(json!({
                "out_dir": dir,
                "reports": index,
                "failures": outcome.failures,
                "cache": cache,
            }))
        }
        None => {
            let mut value = serde_json::to_value(&outcome)?;
            if let Value::Object(map) = &mut value {
                map.insert("cache".into(), serde_json::to_value(cache)?);
            }
            Ok(value)
        }
    }
}

/// Write each report to `<dir>/<seller>.json` and an `index.json` listing
/// them. Sellers whose names clean up to the same file get `-2`, `-3`
/// suffixes. Returns the index rows.
fn write_reports(dir: &Path, outcome: &BatchOutcome) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
    fs::create_dir_all(dir).map_err(|e| format!("Failed to create '{}': {}", dir.display(), e))?;

    let mut names = FileNames::default();
    let mut index = Vec::new();
    let files = outcome
        .reports
        .iter()
        .map(|output| (names.assign(&output.result.seller_id), output))
        .chain(outcome.overall.iter().map(|output| (OVERALL_FILE.to_string(), output)));
    for (stem, output) in files {
        let r = &output.result;
        let path = dir.join(format!("{stem}.json"));
        fs::write(&path, serde_json::to_string_pretty(output)?)
            .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;

        index.push(json!({
            "seller_id": r.seller_id,
            "category": r.category,
            "period": r.period.as_ref().map(Period::label),
            "basis": r.benchmark.as_ref().map(|b| b.basis),
            "grade": r.scorecard.as_ref().map(|s| s.grade),
            "score": r.scorecard.as_ref().map(|s| s.score),
            "file": path.display().to_string(),
        }));
    }

    let index_path = dir.join("index.json");
    fs::write(&index_path, serde_json::to_string_pretty(&index)?)
        .map_err(|e| format!("Failed to write '{}': {}", index_path.display(), e))?;
    info!(reports = index.len(), dir = %dir.display(), "reports written");
    Ok(index)
}

const OVERALL_FILE: &str = "_overall";
const INDEX_FILE: &str = "index";

/// Hands out one distinct file stem per report within a batch run.
struct FileNames {
    taken: BTreeSet<String>,
}

impl Default for FileNames {
    fn default() -> Self {
        FileNames {
            taken: [OVERALL_FILE, INDEX_FILE].iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl FileNames {
    fn assign(&mut self, seller_id: &str) -> String {
        let base = sanitize_file_name(seller_id);
        let mut name = base.clone();
        let mut n = 2;
        // case-folded so the names stay distinct on case-insensitive disks
        while !self.taken.insert(name.to_lowercase()) {
            name = format!("{base}-{n}");
            n += 1;
        }
        name
    }
}

/// Replace path separators and other characters that are unsafe in file
/// names. Korean seller names are kept as-is.
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        "_".to_string()
    } else {
        cleaned
    }
}
