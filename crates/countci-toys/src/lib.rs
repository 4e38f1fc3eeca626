//! Seeded toy sampling for counting experiments.
//!
//! - [`seed`]: reproducible 128-bit seeds and the toy generator
//! - [`gaussian`]: Gaussian populations bucketed into fixed-width histograms
//! - [`ifr`]: toy study of an infection fatality rate built from binomial/Gaussian
//!   infection counts and Poisson fatality counts

use countci_stats::StatsError;

pub mod gaussian;
pub mod ifr;
pub mod seed;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ToyError {
    #[display("{_0}")]
    Stats(StatsError),
    #[display("standard deviation must be positive and finite, got {sigma}")]
    InvalidSigma { sigma: f64 },
    #[display("invalid normal distribution: {_0}")]
    Normal(rand_distr::NormalError),
    #[display("invalid binomial distribution: {_0}")]
    Binomial(rand_distr::BinomialError),
    #[display("invalid poisson distribution: {_0}")]
    Poisson(rand_distr::PoissonError),
    #[display("tested sample ({tested}) must be positive and contain the infected ({infected})")]
    InvalidTestSample { tested: u64, infected: u64 },
    #[display("number of toys must be positive")]
    NoToys,
    #[display("no toy produced a positive number of infections")]
    NoValidToys,
}
