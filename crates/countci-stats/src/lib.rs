//! Confidence intervals for counting experiments.
//!
//! This crate provides the numerical core of `countci`:
//!
//! - **Special functions**: quantiles of the regularized incomplete beta and gamma functions
//! - **Confidence levels**: validated confidence levels and interval bounds
//! - **Binomial intervals**: exact Clopper-Pearson intervals for efficiencies and rates
//! - **Poisson intervals**: Garwood intervals for observed counts, per histogram bin
//! - **Histograms**: fixed-width histograms with underflow/overflow tracking
//! - **Descriptive statistics** and **percentiles** for summarizing toy samples
//!
//! # Modules
//!
//! - [`special`]: Beta and gamma quantile functions
//! - [`confidence`]: Confidence levels and intervals
//! - [`binomial`]: Clopper-Pearson binomial intervals
//! - [`poisson`]: Garwood Poisson intervals and asymmetric error bars
//! - [`histogram`]: Fixed-width histograms
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`percentiles`]: Percentile computation and central intervals
//!
//! # Examples
//!
//! ## Clopper-Pearson interval
//!
//! ```
//! use countci_stats::{binomial::BinomialEstimate, binomial::BinomialCounts, confidence::ConfidenceLevel};
//!
//! let counts = BinomialCounts::new(100.0, 10.0).unwrap();
//! let cl = ConfidenceLevel::new(0.95).unwrap();
//! let estimate = BinomialEstimate::new(counts, cl);
//! assert!(estimate.interval.lower < 0.1 && 0.1 < estimate.interval.upper);
//! ```
//!
//! ## Poisson error bars for a histogram
//!
//! ```
//! use countci_stats::{confidence::ConfidenceLevel, histogram::Histogram, poisson};
//!
//! let mut histogram = Histogram::new(4, 0.0, 4.0).unwrap();
//! histogram.fill_all([0.5, 1.5, 1.5, 3.5]);
//! let cl = ConfidenceLevel::new(0.95).unwrap();
//! let bars = poisson::bin_intervals(&histogram, cl);
//! assert_eq!(bars[1].count, 2);
//! assert_eq!(bars[2].lower, 0.0);
//! ```

pub mod binomial;
pub mod confidence;
pub mod descriptive;
pub mod histogram;
pub mod percentiles;
pub mod poisson;
pub mod special;

/// Errors raised when constructing statistical inputs from untrusted values.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum StatsError {
    #[display("confidence level must lie strictly between 0 and 1, got {value}")]
    InvalidConfidenceLevel { value: f64 },
    #[display("number of trials must be finite and positive, got {trials}")]
    InvalidTrials { trials: f64 },
    #[display("number of successes must be finite and non-negative, got {successes}")]
    InvalidSuccesses { successes: f64 },
    #[display("number of successes ({successes}) exceeds number of trials ({trials})")]
    SuccessesExceedTrials { trials: f64, successes: f64 },
    #[display("invalid histogram range: {num_bins} bins over [{low}, {high})")]
    InvalidHistogramRange { num_bins: usize, low: f64, high: f64 },
}
