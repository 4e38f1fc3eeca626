//! Toy study of an infection fatality rate (IFR).
//!
//! A random sample of `tested` people out of a `population` finds `infected`
//! infections, while `fatal` deaths are recorded in the whole population. The IFR is
//! the ratio of deaths to the estimated number of infections in the population:
//!
//! ```text
//! IFR = N_fatal / N_infected'      N_infected' ~ infected * population / tested
//! ```
//!
//! Each toy draws the population infections from an [`InfectionModel`] and the deaths
//! from `Poisson(fatal)`, then records `100 * deaths / infections` (percent). The
//! spread of the toys gives central 68.3% and 95% intervals on the IFR. Each toy also
//! redraws the tested sample itself, `Binomial(tested, infected / tested)`, to show
//! the sampling spread the population estimate starts from.

use countci_stats::{
    confidence::{ConfidenceLevel, Interval},
    descriptive::DescriptiveStats,
    histogram::Histogram,
    percentiles::{self, Percentiles},
};
use rand::Rng;
use rand_distr::{Binomial, Distribution, Normal, Poisson};
use serde::{Deserialize, Serialize};

use crate::ToyError;

const INFECTION_BINS: usize = 80;
const INFECTION_HALF_WIDTH_SIGMAS: f64 = 5.0;
const MAX_FATALITY_BIN: i64 = 30;
const IFR_BINS: usize = 100;
const IFR_MAX_PERCENT: f64 = 1.0;
/// Central 95% and 68.3% bounds plus the median.
const PERCENTILE_POINTS: [f64; 5] = [2.5, 15.85, 50.0, 84.15, 97.5];

/// Observed counts feeding the toy study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IfrInputs {
    /// Size of the full population.
    pub population: u64,
    /// Number of people in the tested sample.
    pub tested: u64,
    /// Infections found in the tested sample.
    pub infected: u64,
    /// Deaths recorded in the full population.
    pub fatal: u64,
}

impl Default for IfrInputs {
    fn default() -> Self {
        Self {
            population: 12597,
            tested: 919,
            infected: 138,
            fatal: 7,
        }
    }
}

impl IfrInputs {
    /// Infection rate observed in the tested sample.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn infection_rate(&self) -> f64 {
        self.infected as f64 / self.tested as f64
    }

    /// Ratio of population size to tested sample size.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.population as f64 / self.tested as f64
    }

    /// Expected number of infections in the population.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn scaled_infections(&self) -> f64 {
        self.infected as f64 * self.scale()
    }

    /// Binomial standard deviation of the infections in the tested sample.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn infection_sigma(&self) -> f64 {
        let p = self.infection_rate();
        (self.tested as f64 * p * (1.0 - p)).sqrt()
    }

    /// [`Self::infection_sigma`] scaled to the population.
    #[must_use]
    pub fn scaled_infection_sigma(&self) -> f64 {
        self.infection_sigma() * self.scale()
    }

    fn validate(&self) -> Result<(), ToyError> {
        if self.tested == 0 || self.infected > self.tested {
            return Err(ToyError::InvalidTestSample {
                tested: self.tested,
                infected: self.infected,
            });
        }
        Ok(())
    }
}

/// How population infections are drawn for each toy.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum InfectionModel {
    /// `Binomial(population, infected / tested)`: every person in the population is
    /// infected with the rate seen in the tested sample.
    #[default]
    Binomial,
    /// `Normal(infected * scale, sqrt(tested * p * (1 - p)) * scale)` with
    /// `scale = population / tested`: the sample's binomial uncertainty scaled up.
    Gaussian,
}

enum InfectionSampler {
    Binomial(Binomial),
    Gaussian(Normal<f64>),
}

impl InfectionSampler {
    fn new(model: InfectionModel, inputs: &IfrInputs) -> Result<Self, ToyError> {
        match model {
            InfectionModel::Binomial => Binomial::new(inputs.population, inputs.infection_rate())
                .map(Self::Binomial)
                .map_err(ToyError::Binomial),
            InfectionModel::Gaussian => Normal::new(
                inputs.scaled_infections(),
                inputs.scaled_infection_sigma(),
            )
            .map(Self::Gaussian)
            .map_err(ToyError::Normal),
        }
    }
}

impl Distribution<f64> for InfectionSampler {
    #[expect(clippy::cast_precision_loss)]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Self::Binomial(binomial) => binomial.sample(rng) as f64,
            Self::Gaussian(normal) => normal.sample(rng),
        }
    }
}

/// Central interval of the IFR toys at one confidence level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IfrInterval {
    pub confidence: ConfidenceLevel,
    /// Bounds in percent.
    pub interval: Interval,
}

/// Summary of one distribution sampled by the study.
#[derive(Debug, Clone, Serialize)]
pub struct ToySummary {
    pub stats: DescriptiveStats,
    /// The 2.5, 15.85, 50, 84.15 and 97.5 percentiles.
    pub percentiles: Percentiles,
    pub histogram: Histogram,
}

/// Result of an IFR toy study.
#[derive(Debug, Clone, Serialize)]
pub struct IfrStudy {
    pub inputs: IfrInputs,
    pub model: InfectionModel,
    pub toys: usize,
    /// Toys dropped because they drew no positive number of infections.
    pub skipped: usize,
    /// Infections redrawn in the tested sample.
    pub sample_infections: ToySummary,
    /// Infections in the population.
    pub infections: ToySummary,
    pub fatalities: ToySummary,
    /// IFR in percent.
    pub ifr: ToySummary,
    pub intervals: Vec<IfrInterval>,
}

impl IfrStudy {
    /// Confidence levels reported for the IFR.
    pub const LEVELS: [f64; 2] = [0.683, 0.95];

    /// Throws `toys` toys and summarizes them.
    ///
    /// # Example
    ///
    /// ```
    /// use countci_toys::{ifr::{IfrInputs, IfrStudy, InfectionModel}, seed::ToySeed};
    ///
    /// let seed: ToySeed = "00000000000000000000000000002a2a".parse().unwrap();
    /// let study = IfrStudy::run(
    ///     &mut seed.rng(),
    ///     IfrInputs::default(),
    ///     InfectionModel::Binomial,
    ///     10_000,
    /// )
    /// .unwrap();
    /// assert!((study.ifr.stats.mean - 0.37).abs() < 0.05);
    /// ```
    pub fn run<R>(
        rng: &mut R,
        inputs: IfrInputs,
        model: InfectionModel,
        toys: usize,
    ) -> Result<Self, ToyError>
    where
        R: Rng + ?Sized,
    {
        if toys == 0 {
            return Err(ToyError::NoToys);
        }
        inputs.validate()?;
        let sample_sampler = Binomial::new(inputs.tested, inputs.infection_rate())
            .map_err(ToyError::Binomial)?;
        let infection_sampler = InfectionSampler::new(model, &inputs)?;
        #[expect(clippy::cast_precision_loss)]
        let fatal = inputs.fatal as f64;
        // Poisson needs a positive mean; no observed deaths means no toy deaths
        let fatality_sampler = match inputs.fatal {
            0 => None,
            _ => Some(Poisson::new(fatal).map_err(ToyError::Poisson)?),
        };

        let mut sample_infections = Vec::with_capacity(toys);
        let mut infections = Vec::with_capacity(toys);
        let mut fatalities = Vec::with_capacity(toys);
        let mut ifr = Vec::with_capacity(toys);
        let mut skipped = 0;
        for _ in 0..toys {
            #[expect(clippy::cast_precision_loss)]
            let sampled = sample_sampler.sample(rng) as f64;
            sample_infections.push(sampled);
            let infected = infection_sampler.sample(rng);
            let dead = fatality_sampler
                .as_ref()
                .map_or(0.0, |poisson| poisson.sample(rng));
            infections.push(infected);
            fatalities.push(dead);
            if infected > 0.0 {
                ifr.push(100.0 * dead / infected);
            } else {
                skipped += 1;
            }
        }

        #[expect(clippy::cast_precision_loss)]
        let sample_infections = summarize(
            sample_infections,
            infection_histogram(inputs.infected as f64, inputs.infection_sigma()),
        )?;
        let infections = summarize(
            infections,
            infection_histogram(inputs.scaled_infections(), inputs.scaled_infection_sigma()),
        )?;
        let fatalities = summarize(fatalities, Histogram::from_integer_range(0, MAX_FATALITY_BIN))?;

        ifr.sort_by(f64::total_cmp);
        let intervals = Self::LEVELS
            .into_iter()
            .map(|level| {
                let confidence = ConfidenceLevel::new(level).map_err(ToyError::Stats)?;
                Ok(IfrInterval {
                    confidence,
                    interval: percentiles::central_interval(&ifr, confidence),
                })
            })
            .collect::<Result<Vec<_>, ToyError>>()?;
        let ifr = summarize(ifr, Histogram::new(IFR_BINS, 0.0, IFR_MAX_PERCENT))?;

        Ok(Self {
            inputs,
            model,
            toys,
            skipped,
            sample_infections,
            infections,
            fatalities,
            ifr,
            intervals,
        })
    }

    /// Interval at `level`, if it is one of [`Self::LEVELS`].
    #[must_use]
    pub fn interval(&self, level: f64) -> Option<Interval> {
        self.intervals
            .iter()
            .find(|i| (i.confidence.value() - level).abs() < 1e-9)
            .map(|i| i.interval)
    }
}

fn infection_histogram(center: f64, sigma: f64) -> Result<Histogram, countci_stats::StatsError> {
    let half_width = INFECTION_HALF_WIDTH_SIGMAS * sigma.max(1.0);
    Histogram::new(INFECTION_BINS, center - half_width, center + half_width)
}

fn summarize(
    mut values: Vec<f64>,
    histogram: Result<Histogram, countci_stats::StatsError>,
) -> Result<ToySummary, ToyError> {
    let mut histogram = histogram.map_err(ToyError::Stats)?;
    histogram.fill_all(values.iter().copied());
    values.sort_by(f64::total_cmp);
    let stats = DescriptiveStats::from_sorted(&values).ok_or(ToyError::NoValidToys)?;
    let percentiles = Percentiles::from_sorted(&values, &PERCENTILE_POINTS);
    Ok(ToySummary {
        stats,
        percentiles,
        histogram,
    })
}
