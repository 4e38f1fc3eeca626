use std::fmt;

use serde::{Deserialize, Serialize};

use crate::StatsError;

/// A confidence level strictly between 0 and 1.
///
/// Intervals in this crate are two-sided and central: each tail outside the
/// interval carries probability `alpha / 2`, where `alpha = 1 - CL`.
///
/// # Examples
///
/// ```
/// use countci_stats::confidence::ConfidenceLevel;
///
/// let cl = ConfidenceLevel::new(0.95).unwrap();
/// assert!((cl.alpha() - 0.05).abs() < 1e-15);
/// assert!((cl.lower_tail() - 0.025).abs() < 1e-15);
///
/// assert!(ConfidenceLevel::new(1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ConfidenceLevel(f64);

impl ConfidenceLevel {
    /// 68.27%, the one-sigma coverage of a Gaussian.
    pub const ONE_SIGMA: Self = Self(0.6827);
    /// 95%.
    pub const NINETY_FIVE: Self = Self(0.95);

    pub fn new(value: f64) -> Result<Self, StatsError> {
        if value > 0.0 && value < 1.0 {
            Ok(Self(value))
        } else {
            Err(StatsError::InvalidConfidenceLevel { value })
        }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Total probability outside the interval, `1 - CL`.
    #[must_use]
    pub fn alpha(self) -> f64 {
        1.0 - self.0
    }

    /// Probability below the lower bound, `alpha / 2`.
    #[must_use]
    pub fn lower_tail(self) -> f64 {
        self.alpha() / 2.0
    }

    /// Cumulative probability at the upper bound, `1 - alpha / 2`.
    #[must_use]
    pub fn upper_tail(self) -> f64 {
        1.0 - self.lower_tail()
    }
}

impl Default for ConfidenceLevel {
    fn default() -> Self {
        Self::NINETY_FIVE
    }
}

impl TryFrom<f64> for ConfidenceLevel {
    type Error = StatsError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ConfidenceLevel> for f64 {
    fn from(cl: ConfidenceLevel) -> Self {
        cl.0
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Which end of an interval to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Lower,
    Upper,
}

/// A closed interval `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

impl Interval {
    #[must_use]
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}
