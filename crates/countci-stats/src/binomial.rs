//! Clopper-Pearson intervals for binomial proportions.
//!
//! The Clopper-Pearson interval inverts the binomial CDF through the beta distribution:
//!
//! ```text
//! lower = BetaInv(alpha / 2,     S,     T - S + 1)   (0 if S = 0)
//! upper = BetaInv(1 - alpha / 2, S + 1, T - S)       (1 if S = T)
//! ```
//!
//! where `T` is the number of trials, `S` the number of successes and `alpha = 1 - CL`.
//! The number of trials may be a non-integral weighted count.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    StatsError,
    confidence::{Bound, ConfidenceLevel, Interval},
    special,
};

/// Trial and success counts of a binomial experiment.
///
/// Guarantees `0 < trials`, `0 <= successes <= trials`, both finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BinomialCounts {
    trials: f64,
    successes: f64,
}

impl BinomialCounts {
    /// Validates trial and success counts.
    ///
    /// # Examples
    ///
    /// ```
    /// use countci_stats::binomial::BinomialCounts;
    ///
    /// assert!(BinomialCounts::new(10.0, 3.0).is_ok());
    /// assert!(BinomialCounts::new(10.0, 11.0).is_err());
    /// assert!(BinomialCounts::new(0.0, 0.0).is_err());
    /// ```
    pub fn new(trials: f64, successes: f64) -> Result<Self, StatsError> {
        if !trials.is_finite() || trials <= 0.0 {
            return Err(StatsError::InvalidTrials { trials });
        }
        if !successes.is_finite() || successes < 0.0 {
            return Err(StatsError::InvalidSuccesses { successes });
        }
        if successes > trials {
            return Err(StatsError::SuccessesExceedTrials { trials, successes });
        }
        Ok(Self { trials, successes })
    }

    #[must_use]
    pub fn trials(&self) -> f64 {
        self.trials
    }

    #[must_use]
    pub fn successes(&self) -> f64 {
        self.successes
    }

    /// Observed success fraction `S / T`.
    #[must_use]
    pub fn proportion(&self) -> f64 {
        self.successes / self.trials
    }
}

impl<'de> Deserialize<'de> for BinomialCounts {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            trials: f64,
            successes: f64,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.trials, raw.successes).map_err(serde::de::Error::custom)
    }
}

/// Computes one end of the Clopper-Pearson interval.
///
/// # Examples
///
/// ```
/// use countci_stats::{
///     binomial::{BinomialCounts, clopper_pearson_bound},
///     confidence::{Bound, ConfidenceLevel},
/// };
///
/// let counts = BinomialCounts::new(20.0, 0.0).unwrap();
/// let cl = ConfidenceLevel::new(0.95).unwrap();
/// assert_eq!(clopper_pearson_bound(counts, cl, Bound::Lower), 0.0);
/// ```
#[must_use]
pub fn clopper_pearson_bound(counts: BinomialCounts, cl: ConfidenceLevel, bound: Bound) -> f64 {
    let BinomialCounts { trials, successes } = counts;
    match bound {
        Bound::Lower if successes == 0.0 => 0.0,
        Bound::Lower => special::beta_quantile(cl.lower_tail(), successes, trials - successes + 1.0),
        Bound::Upper if successes == trials => 1.0,
        Bound::Upper => special::beta_quantile(cl.upper_tail(), successes + 1.0, trials - successes),
    }
}

/// Computes the two-sided Clopper-Pearson interval.
#[must_use]
pub fn clopper_pearson(counts: BinomialCounts, cl: ConfidenceLevel) -> Interval {
    Interval::new(
        clopper_pearson_bound(counts, cl, Bound::Lower),
        clopper_pearson_bound(counts, cl, Bound::Upper),
    )
}

/// Point estimate and Clopper-Pearson interval of a binomial proportion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BinomialEstimate {
    pub confidence: ConfidenceLevel,
    pub trials: f64,
    pub successes: f64,
    /// Observed proportion `S / T`.
    pub point: f64,
    pub interval: Interval,
}

impl BinomialEstimate {
    #[must_use]
    pub fn new(counts: BinomialCounts, cl: ConfidenceLevel) -> Self {
        Self {
            confidence: cl,
            trials: counts.trials(),
            successes: counts.successes(),
            point: counts.proportion(),
            interval: clopper_pearson(counts, cl),
        }
    }
}

impl fmt::Display for BinomialEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CL: {} trials: {} successes: {} prob: {} lower: {} upper: {}",
            self.confidence,
            self.trials,
            self.successes,
            self.point,
            self.interval.lower,
            self.interval.upper,
        )
    }
}
