use std::path::PathBuf;

use chrono::{DateTime, Utc};
use countci_stats::{
    binomial::{BinomialCounts, BinomialEstimate},
    confidence::ConfidenceLevel,
};
use serde::Serialize;

use crate::util::{self, Output};

/// Infections scaled from the 919 tested people to the population of 12597.
const DEFAULT_TRIALS: f64 = 138.0 * 12597.0 / 919.0;
const DEFAULT_SUCCESSES: f64 = 7.0;
const DEFAULT_CL: f64 = 0.95;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BinomialArg {
    /// Confidence level, strictly between 0 and 1
    #[arg(long, default_value_t = DEFAULT_CL)]
    cl: f64,
    /// Number of trials (may be fractional)
    #[arg(long, default_value_t = DEFAULT_TRIALS)]
    trials: f64,
    /// Number of successes
    #[arg(long, default_value_t = DEFAULT_SUCCESSES)]
    successes: f64,
    /// Write a JSON report to this file (`-` for stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Default for BinomialArg {
    fn default() -> Self {
        Self {
            cl: DEFAULT_CL,
            trials: DEFAULT_TRIALS,
            successes: DEFAULT_SUCCESSES,
            output: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct BinomialReport {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    estimate: BinomialEstimate,
}

pub(crate) fn run(arg: &BinomialArg) -> anyhow::Result<()> {
    let BinomialArg {
        cl,
        trials,
        successes,
        output,
    } = arg;

    let estimate = estimate(*cl, *trials, *successes)?;
    if !output.as_deref().is_some_and(util::is_stdout) {
        println!("{estimate}");
    }

    if let Some(path) = output {
        let report = BinomialReport {
            generated_at: Utc::now(),
            estimate,
        };
        Output::save_json(&report, path)?;
    }
    Ok(())
}

fn estimate(cl: f64, trials: f64, successes: f64) -> anyhow::Result<BinomialEstimate> {
    let cl = ConfidenceLevel::new(cl)?;
    let counts = BinomialCounts::new(trials, successes)?;
    log::debug!("computing Clopper-Pearson interval for {successes}/{trials} at CL {cl}");
    Ok(BinomialEstimate::new(counts, cl))
}
