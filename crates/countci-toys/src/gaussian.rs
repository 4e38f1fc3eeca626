use countci_stats::histogram::Histogram;
use rand::Rng;
use rand_distr::{Distribution as _, Normal};
use serde::{Deserialize, Serialize};

use crate::ToyError;

/// A Gaussian population bucketed into a fixed-width histogram.
///
/// The default is 100 entries of a standard normal in 50 bins over `[-4, 4)`.
///
/// # Example
///
/// ```
/// use countci_toys::{gaussian::GaussianSample, seed::ToySeed};
///
/// let seed: ToySeed = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
/// let histogram = GaussianSample::default().fill(&mut seed.rng()).unwrap();
/// assert_eq!(histogram.bins().len(), 50);
/// assert_eq!(histogram.entries(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianSample {
    pub entries: usize,
    pub mean: f64,
    pub sigma: f64,
    pub bins: usize,
    pub low: f64,
    pub high: f64,
}

impl Default for GaussianSample {
    fn default() -> Self {
        Self {
            entries: 100,
            mean: 0.0,
            sigma: 1.0,
            bins: 50,
            low: -4.0,
            high: 4.0,
        }
    }
}

impl GaussianSample {
    /// Draws `entries` values and fills them into a new histogram.
    ///
    /// `sigma` must be positive and finite.
    pub fn fill<R>(&self, rng: &mut R) -> Result<Histogram, ToyError>
    where
        R: Rng + ?Sized,
    {
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Err(ToyError::InvalidSigma { sigma: self.sigma });
        }
        let normal = Normal::new(self.mean, self.sigma).map_err(ToyError::Normal)?;
        let mut histogram =
            Histogram::new(self.bins, self.low, self.high).map_err(ToyError::Stats)?;
        histogram.fill_all(normal.sample_iter(rng).take(self.entries));
        Ok(histogram)
    }
}

#[cfg(test)]
mod tests {
    use crate::seed::ToySeed;

    use super::*;

    fn seed() -> ToySeed {
        "d1b54a32d192ed03aef0a3b4c7f0e6c1".parse().unwrap()
    }

    #[test]
    fn test_same_seed_same_histogram() {
        let sample = GaussianSample::default();
        let a = sample.fill(&mut seed().rng()).unwrap();
        let b = sample.fill(&mut seed().rng()).unwrap();
        assert_eq!(a.bins(), b.bins());
    }

    #[test]
    fn test_narrow_population_stays_central() {
        let sample = GaussianSample {
            entries: 1000,
            sigma: 0.01,
            ..GaussianSample::default()
        };
        let histogram = sample.fill(&mut seed().rng()).unwrap();
        assert_eq!(histogram.underflow() + histogram.overflow(), 0);
        let occupied = histogram.bins().iter().filter(|b| b.count > 0).count();
        assert!(occupied <= 2, "{occupied} bins occupied");
    }

    #[test]
    fn test_invalid_parameters() {
        for sigma in [-1.0, 0.0, f64::NAN, f64::INFINITY] {
            let sample = GaussianSample {
                sigma,
                ..GaussianSample::default()
            };
            assert!(
                matches!(
                    sample.fill(&mut seed().rng()),
                    Err(ToyError::InvalidSigma { .. })
                ),
                "accepted sigma {sigma}"
            );
        }

        let sample = GaussianSample {
            bins: 0,
            ..GaussianSample::default()
        };
        assert!(matches!(
            sample.fill(&mut seed().rng()),
            Err(ToyError::Stats(_))
        ));
    }
}
