//! Garwood confidence intervals for Poisson counts.
//!
//! For an observed count `N`, the central interval at confidence level `CL` is
//!
//! ```text
//! L = 0                                   if N = 0
//! L = GammaQuantile(alpha / 2, N)         otherwise
//! U = GammaQuantileC(alpha / 2, N + 1)
//! ```
//!
//! with unit-scale gamma quantiles and `alpha = 1 - CL`. The upper bound uses the
//! complementary quantile so that the upper tail is solved without cancellation.
//!
//! [`bin_intervals`] applies this to each bin of a [`Histogram`], producing the
//! asymmetric error bars `N - L` (down) and `U - N` (up) used to plot counts.

use std::fmt;

use serde::Serialize;

use crate::{
    confidence::{ConfidenceLevel, Interval},
    histogram::Histogram,
    special,
};

/// Computes the Garwood interval for an observed count.
///
/// # Examples
///
/// ```
/// use countci_stats::{confidence::ConfidenceLevel, poisson::garwood};
///
/// let cl = ConfidenceLevel::new(0.95).unwrap();
/// let interval = garwood(0, cl);
/// assert_eq!(interval.lower, 0.0);
/// assert!((interval.upper + (0.025_f64).ln()).abs() < 1e-12);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn garwood(count: u64, cl: ConfidenceLevel) -> Interval {
    let n = count as f64;
    let lower = if count == 0 {
        0.0
    } else {
        special::gamma_quantile(cl.lower_tail(), n)
    };
    let upper = special::gamma_quantile_c(cl.lower_tail(), n + 1.0);
    Interval::new(lower, upper)
}

/// Count and Garwood interval of one histogram bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BinInterval {
    /// Zero-based position of the bin among the in-range bins.
    pub index: usize,
    /// Center of the bin on the histogram axis.
    pub center: f64,
    pub count: u64,
    pub lower: f64,
    pub upper: f64,
}

impl BinInterval {
    /// Length of the error bar below the count, `N - L`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn error_low(&self) -> f64 {
        self.count as f64 - self.lower
    }

    /// Length of the error bar above the count, `U - N`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn error_high(&self) -> f64 {
        self.upper - self.count as f64
    }
}

impl fmt::Display for BinInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "i: {} N: {} L: {} U: {} N-L: {} U-N: {}",
            self.index,
            self.count,
            self.lower,
            self.upper,
            self.error_low(),
            self.error_high(),
        )
    }
}

/// Computes Garwood intervals for every in-range bin of `histogram`.
///
/// Underflow and overflow entries are not part of the result.
#[must_use]
pub fn bin_intervals(histogram: &Histogram, cl: ConfidenceLevel) -> Vec<BinInterval> {
    histogram
        .bins()
        .iter()
        .enumerate()
        .map(|(index, bin)| {
            let Interval { lower, upper } = garwood(bin.count, cl);
            BinInterval {
                index,
                center: bin.center(),
                count: bin.count,
                lower,
                upper,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use statrs::function::gamma;

    use super::*;

    fn cl95() -> ConfidenceLevel {
        ConfidenceLevel::new(0.95).unwrap()
    }

    fn assert_rel_eq(actual: f64, expected: f64, tol: f64) {
        let rel = ((actual - expected) / expected).abs();
        assert!(rel <= tol, "expected {expected}, got {actual}");
    }

    #[test]
    fn test_zero_count() {
        let interval = garwood(0, cl95());
        assert_eq!(interval.lower, 0.0);
        assert_rel_eq(interval.upper, -(0.025_f64.ln()), 1e-12);
    }

    #[test]
    fn test_reference_intervals() {
        let expected = [
            (1, 0.025_317_807_984_289_877, 5.571_643_390_938_898_5),
            (2, 0.242_209_278_543_964_91, 7.224_687_667_723_960_7),
            (5, 1.623_486_390_118_420_6, 11.668_332_079_322_67),
            (10, 4.795_388_696_132_433_7, 18.390_356_042_017_779),
            (50, 37.110_963_737_461_863, 65.918_766_664_336_817),
        ];
        for (count, lower, upper) in expected {
            let interval = garwood(count, cl95());
            assert_rel_eq(interval.lower, lower, 1e-9);
            assert_rel_eq(interval.upper, upper, 1e-9);
        }
    }

    #[test]
    #[expect(clippy::cast_precision_loss)]
    fn test_interval_brackets_count() {
        for count in 1..200 {
            let interval = garwood(count, cl95());
            assert!(interval.contains(count as f64), "N={count}: {interval:?}");
        }
    }

    #[test]
    #[expect(clippy::cast_precision_loss)]
    fn test_lower_bound_recovers_tail_probability() {
        for count in [1_u64, 3, 8, 25, 120] {
            let interval = garwood(count, cl95());
            let tail = gamma::gamma_lr(count as f64, interval.lower);
            assert_rel_eq(tail, 0.025, 1e-9);
            let upper_tail = gamma::gamma_ur(count as f64 + 1.0, interval.upper);
            assert_rel_eq(upper_tail, 0.025, 1e-9);
        }
    }

    #[test]
    fn test_one_sigma_interval_is_narrower() {
        for count in [0, 1, 4, 16] {
            let wide = garwood(count, cl95());
            let narrow = garwood(count, ConfidenceLevel::ONE_SIGMA);
            assert!(narrow.lower >= wide.lower);
            assert!(narrow.upper <= wide.upper);
        }
    }

    #[test]
    fn test_bin_intervals_follow_histogram() {
        let mut histogram = Histogram::new(3, 0.0, 3.0).unwrap();
        histogram.fill_all([0.5, 0.5, 2.5, -1.0, 7.0]);

        let bars = bin_intervals(&histogram, cl95());
        assert_eq!(bars.len(), 3);
        assert_eq!(
            bars.iter().map(|b| b.count).collect::<Vec<_>>(),
            vec![2, 0, 1]
        );
        assert_eq!(bars[0].center, 0.5);
        assert_eq!(bars[1].lower, 0.0);
        assert_eq!(bars[1].error_low(), 0.0);
        assert_rel_eq(bars[2].error_high(), 5.571_643_390_938_898_5 - 1.0, 1e-9);
        assert_rel_eq(bars[2].error_low(), 1.0 - 0.025_317_807_984_289_877, 1e-9);
    }

    #[test]
    fn test_report_line() {
        let bar = BinInterval {
            index: 3,
            center: 0.0,
            count: 0,
            lower: 0.0,
            upper: 2.0,
        };
        assert_eq!(bar.to_string(), "i: 3 N: 0 L: 0 U: 2 N-L: 0 U-N: 2");
    }
}
