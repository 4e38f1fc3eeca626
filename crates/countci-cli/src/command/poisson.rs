use std::{fmt::Write as _, path::PathBuf};

use chrono::{DateTime, Utc};
use countci_stats::{
    confidence::ConfidenceLevel,
    histogram::Histogram,
    poisson::{self, BinInterval},
};
use countci_toys::{gaussian::GaussianSample, seed::ToySeed};
use serde::Serialize;

use crate::{
    ui::error_bars::ErrorBarApp,
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PoissonArg {
    /// Confidence level, strictly between 0 and 1
    #[arg(long, default_value_t = 0.95)]
    cl: f64,
    /// Number of Gaussian entries to sample
    #[arg(long, default_value_t = 100)]
    entries: usize,
    /// Number of histogram bins
    #[arg(long, default_value_t = 50)]
    bins: usize,
    /// Lower edge of the histogram
    #[arg(long, default_value_t = -4.0, allow_negative_numbers = true)]
    low: f64,
    /// Upper edge of the histogram
    #[arg(long, default_value_t = 4.0, allow_negative_numbers = true)]
    high: f64,
    /// 32 hexadecimal digits seeding the sampler (random if omitted)
    #[arg(long)]
    seed: Option<ToySeed>,
    /// Print the intervals without opening the chart
    #[arg(long)]
    no_plot: bool,
    /// Write a JSON report to this file (`-` for stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct PoissonReport {
    generated_at: DateTime<Utc>,
    seed: ToySeed,
    confidence: ConfidenceLevel,
    sample: GaussianSample,
    histogram: Histogram,
    bins: Vec<BinInterval>,
}

impl PoissonReport {
    fn sample(arg: &PoissonArg, seed: ToySeed) -> anyhow::Result<Self> {
        let PoissonArg {
            cl,
            entries,
            bins,
            low,
            high,
            ..
        } = arg;

        let confidence = ConfidenceLevel::new(*cl)?;
        let sample = GaussianSample {
            entries: *entries,
            bins: *bins,
            low: *low,
            high: *high,
            ..GaussianSample::default()
        };

        log::info!("Sampling {entries} Gaussian entries into {bins} bins over [{low}, {high})...");
        let histogram = sample.fill(&mut seed.rng())?;
        let bins = poisson::bin_intervals(&histogram, confidence);
        Ok(Self {
            generated_at: Utc::now(),
            seed,
            confidence,
            sample,
            histogram,
            bins,
        })
    }

    fn text(&self) -> String {
        let mut text = format!("CL: {}\n", self.confidence);
        for interval in &self.bins {
            let _ = writeln!(text, "{interval}");
        }
        text
    }
}

pub(crate) fn run(arg: &PoissonArg) -> anyhow::Result<()> {
    let seed = util::seed_or_random(arg.seed);
    let report = PoissonReport::sample(arg, seed)?;

    if !arg.output.as_deref().is_some_and(util::is_stdout) {
        print!("{}", report.text());
    }

    if let Some(path) = &arg.output {
        Output::save_json(&report, path)?;
    }

    if !arg.no_plot {
        let title = format!("Garwood intervals at CL {} (seed {seed})", report.confidence);
        let mut app = ErrorBarApp::new(title, &report.histogram, &report.bins);
        chart_runtime::run(&mut app)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use super::*;
    use crate::command::{CommandArgs, Mode};

    const SEED: &str = "00112233445566778899aabbccddeeff";

    fn arg() -> PoissonArg {
        PoissonArg {
            cl: 0.95,
            entries: 100,
            bins: 50,
            low: -4.0,
            high: 4.0,
            seed: None,
            no_plot: true,
            output: None,
        }
    }

    fn report() -> PoissonReport {
        PoissonReport::sample(&arg(), SEED.parse().unwrap()).unwrap()
    }

    #[test]
    fn test_same_seed_gives_same_histogram() {
        let a = report();
        let b = report();
        assert_eq!(a.bins, b.bins);
    }

    #[test]
    fn test_report_lists_every_bin() {
        let report = report();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["seed"], SEED);
        assert_eq!(json["confidence"], 0.95);
        assert_eq!(json["sample"]["entries"], 100);

        let bins = json["bins"].as_array().unwrap();
        let histogram_bins = json["histogram"]["bins"].as_array().unwrap();
        assert_eq!(bins.len(), 50);
        assert_eq!(histogram_bins.len(), 50);
        for (interval, bin) in bins.iter().zip(histogram_bins) {
            assert_eq!(interval["count"], bin["count"]);
        }
    }

    #[test]
    fn test_text_starts_with_confidence_level() {
        let report = report();
        let text = report.text();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("CL: 0.95"));
        assert_eq!(lines.count(), 50);
        assert!(text.contains("i: 0 "), "{text}");
    }

    #[test]
    fn test_rejects_invalid_confidence_level() {
        let arg = PoissonArg { cl: 1.5, ..arg() };
        assert!(PoissonReport::sample(&arg, SEED.parse().unwrap()).is_err());
    }

    #[test]
    fn test_dash_output_selects_stdout() {
        let args = CommandArgs::try_parse_from([
            "countci",
            "poisson",
            "--no-plot",
            "--output",
            "-",
        ])
        .unwrap();
        let Some(Mode::Poisson(arg)) = args.mode else {
            panic!("expected poisson mode");
        };
        assert!(arg.output.as_deref().is_some_and(util::is_stdout));
    }
}
