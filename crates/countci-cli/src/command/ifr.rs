use std::{fmt::Write as _, path::PathBuf};

use chrono::{DateTime, Utc};
use countci_toys::{
    ifr::{IfrInputs, IfrStudy, InfectionModel, ToySummary},
    seed::ToySeed,
};
use serde::Serialize;

use crate::{
    ui::histograms::{HistogramApp, HistogramPanel},
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct IfrArg {
    /// JSON file with `population`, `tested`, `infected` and `fatal` counts
    #[arg(long)]
    config: Option<PathBuf>,
    /// How population infections are drawn (Binomial or Gaussian)
    #[arg(long, default_value = "Binomial")]
    model: InfectionModel,
    /// Number of toys to throw
    #[arg(long, default_value_t = 1_000_000)]
    toys: usize,
    /// 32 hexadecimal digits seeding the toys (random if omitted)
    #[arg(long)]
    seed: Option<ToySeed>,
    /// Print the summary without opening the chart
    #[arg(long)]
    no_plot: bool,
    /// Write a JSON report to this file (`-` for stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct IfrReport<'a> {
    generated_at: DateTime<Utc>,
    seed: ToySeed,
    #[serde(flatten)]
    study: &'a IfrStudy,
}

pub(crate) fn run(arg: &IfrArg) -> anyhow::Result<()> {
    let IfrArg {
        config,
        model,
        toys,
        seed,
        no_plot,
        output,
    } = arg;

    let inputs = match config {
        Some(path) => {
            log::info!("Loading inputs from {}...", path.display());
            util::read_json_file::<IfrInputs, _>("IFR inputs", path)?
        }
        None => IfrInputs::default(),
    };
    let seed = util::seed_or_random(*seed);

    log::info!("Throwing {toys} toys with the {model} infection model...");
    let study = IfrStudy::run(&mut seed.rng(), inputs, *model, *toys)?;
    if study.skipped > 0 {
        log::warn!(
            "Skipped {} toys without a positive number of infections",
            study.skipped
        );
    }

    if !output.as_deref().is_some_and(util::is_stdout) {
        print!("{}", summary_text(&study));
    }

    if let Some(path) = output {
        let report = IfrReport {
            generated_at: Utc::now(),
            seed,
            study: &study,
        };
        Output::save_json(&report, path)?;
    }

    if !no_plot {
        let panels = panels(&study);
        let ifr_panel = panels.len() - 1;
        let mut app = HistogramApp::new(panels, ifr_panel);
        chart_runtime::run(&mut app)?;
    }
    Ok(())
}

fn summary_text(study: &IfrStudy) -> String {
    let mut text = String::new();
    for (label, summary) in [
        ("Infections in tested sample", &study.sample_infections),
        ("Infections", &study.infections),
        ("Fatalities", &study.fatalities),
        ("IFR [%]", &study.ifr),
    ] {
        let stats = &summary.stats;
        let _ = writeln!(text, "{label}:");
        let _ = writeln!(text, " entries: {}", stats.count);
        let _ = writeln!(text, " mean: {}", stats.mean);
        let _ = writeln!(text, " sigma: {}", stats.std_dev);
    }
    let _ = writeln!(text, "{}", ifr_line(study));
    text
}

/// `<IFR> = 0.370 % | CL68: [0.226 0.524] % CL95: [...] %`
fn ifr_line(study: &IfrStudy) -> String {
    let bounds = |level: f64| {
        study
            .interval(level)
            .map_or((f64::NAN, f64::NAN), |i| (i.lower, i.upper))
    };
    let ((lo68, hi68), (lo95, hi95)) = (bounds(0.683), bounds(0.95));
    format!(
        "<IFR> = {:5.3} % | CL68: [{lo68:5.3} {hi68:5.3}] % CL95: [{lo95:5.3} {hi95:5.3}] %",
        study.ifr.stats.mean
    )
}

fn panel_summary(summary: &ToySummary) -> Vec<String> {
    let stats = &summary.stats;
    let mut lines = vec![
        format!("Entries: {:10}", stats.count),
        format!("Mean:    {:10.3}", stats.mean),
        format!("StdDev:  {:10.3}", stats.std_dev),
        format!("Min:     {:10.3}", stats.min),
    ];
    lines.extend(
        summary
            .percentiles
            .iter()
            .map(|(p, value)| format!("P{p:<6} {value:10.3}")),
    );
    lines.push(format!("Max:     {:10.3}", stats.max));
    lines
}

fn panels(study: &IfrStudy) -> Vec<HistogramPanel> {
    let mut ifr_summary = panel_summary(&study.ifr);
    for interval in &study.intervals {
        ifr_summary.push(format!(
            "CL{:.1}%: [{:.3}, {:.3}]",
            interval.confidence.value() * 100.0,
            interval.interval.lower,
            interval.interval.upper
        ));
    }
    vec![
        HistogramPanel {
            title: "Sample".to_owned(),
            x_title: "Infections in tested sample".to_owned(),
            histogram: study.sample_infections.histogram.clone(),
            summary: panel_summary(&study.sample_infections),
        },
        HistogramPanel {
            title: "Infections".to_owned(),
            x_title: "Infections in population".to_owned(),
            histogram: study.infections.histogram.clone(),
            summary: panel_summary(&study.infections),
        },
        HistogramPanel {
            title: "Fatalities".to_owned(),
            x_title: "Fatalities".to_owned(),
            histogram: study.fatalities.histogram.clone(),
            summary: panel_summary(&study.fatalities),
        },
        HistogramPanel {
            title: "IFR".to_owned(),
            x_title: "IFR [%]".to_owned(),
            histogram: study.ifr.histogram.clone(),
            summary: ifr_summary,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn study() -> IfrStudy {
        let seed: ToySeed = "0f1e2d3c4b5a69788796a5b4c3d2e1f0".parse().unwrap();
        IfrStudy::run(
            &mut seed.rng(),
            IfrInputs::default(),
            InfectionModel::Binomial,
            20_000,
        )
        .unwrap()
    }

    #[test]
    fn test_ifr_line_format() {
        let line = ifr_line(&study());
        assert!(line.starts_with("<IFR> = 0.3"), "{line}");
        assert!(line.contains(" % | CL68: ["));
        assert!(line.ends_with("] %"));
    }

    #[test]
    fn test_summary_covers_every_quantity() {
        let text = summary_text(&study());
        for label in [
            "Infections in tested sample:",
            "Infections:",
            "Fatalities:",
            "IFR [%]:",
            "<IFR> =",
        ] {
            assert!(text.contains(label), "missing {label}");
        }
    }

    #[test]
    fn test_panels_end_with_ifr() {
        let study = study();
        let panels = panels(&study);
        assert_eq!(panels.len(), 4);
        assert_eq!(panels[0].title, "Sample");
        assert_eq!(panels[3].title, "IFR");
        assert!(panels[3].summary.iter().any(|line| line.starts_with("CL95.0%")));
        assert!(panels[3].summary.iter().any(|line| line.starts_with("P15.85")));
    }

    #[test]
    fn test_report_includes_seed_and_inputs() {
        let study = study();
        let report = IfrReport {
            generated_at: Utc::now(),
            seed: "0f1e2d3c4b5a69788796a5b4c3d2e1f0".parse().unwrap(),
            study: &study,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["seed"], "0f1e2d3c4b5a69788796a5b4c3d2e1f0");
        assert_eq!(json["inputs"]["population"], 12597);
        assert_eq!(json["model"], "binomial");
        assert_eq!(json["intervals"].as_array().unwrap().len(), 2);
        assert!(json["sample_infections"]["stats"]["mean"].is_number());
        assert_eq!(json["ifr"]["percentiles"]["values"].as_array().unwrap().len(), 5);
    }
}
