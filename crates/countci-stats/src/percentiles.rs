use serde::Serialize;

use crate::confidence::{ConfidenceLevel, Interval};

/// Precomputed percentile values for a dataset.
///
/// # Examples
///
/// ```
/// use countci_stats::percentiles::Percentiles;
///
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let percentiles = Percentiles::from_sorted(&values, &[25.0, 50.0, 75.0]);
///
/// assert_eq!(percentiles.get(50.0), Some(3.0));
/// assert_eq!(percentiles.get(25.0), Some(2.0));
/// assert_eq!(percentiles.get(90.0), None); // Not precomputed
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Percentiles {
    /// (percentile, value) pairs, percentile in 0.0-100.0.
    values: Vec<(f64, f64)>,
}

impl Percentiles {
    /// Computes percentiles from sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64], percentile_points: &[f64]) -> Self {
        assert!(
            sorted_values.is_sorted_by(|a, b| a.total_cmp(b).is_le()),
            "values must be sorted in ascending order"
        );

        let values = percentile_points
            .iter()
            .map(|&p| (p, compute_percentile(sorted_values, p)))
            .collect();
        Self { values }
    }

    /// Gets the value at a precomputed percentile.
    #[must_use]
    pub fn get(&self, percentile: f64) -> Option<f64> {
        self.values
            .iter()
            .find_map(|&(p, value)| ((p - percentile).abs() < 1e-9).then_some(value))
    }

    /// (percentile, value) pairs in the order they were requested.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values.iter().copied()
    }
}

/// Computes a single percentile of sorted data.
///
/// Interpolates linearly between the two closest ranks: the `q`-th percentile of
/// `n` values sits at fractional index `(n - 1) * q / 100`.
///
/// Returns `f64::NAN` if the input is empty. `percentile` is clamped to 0-100.
///
/// # Examples
///
/// ```
/// use countci_stats::percentiles::compute_percentile;
///
/// let values = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(compute_percentile(&values, 50.0), 2.5);
/// assert_eq!(compute_percentile(&values, 100.0), 4.0);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn compute_percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    if sorted_values.is_empty() {
        return f64::NAN;
    }
    let last = sorted_values.len() - 1;
    let position = last as f64 * percentile.clamp(0.0, 100.0) / 100.0;
    let below = (position.floor() as usize).min(last);
    let above = (below + 1).min(last);
    let fraction = position - below as f64;
    sorted_values[below] + (sorted_values[above] - sorted_values[below]) * fraction
}

/// Central interval of sorted data at confidence level `cl`.
///
/// The bounds are the `100 * alpha / 2` and `100 * (1 - alpha / 2)` percentiles.
///
/// # Examples
///
/// ```
/// use countci_stats::{confidence::ConfidenceLevel, percentiles::central_interval};
///
/// let values = (0..=100).map(f64::from).collect::<Vec<_>>();
/// let interval = central_interval(&values, ConfidenceLevel::new(0.9).unwrap());
/// assert!((interval.lower - 5.0).abs() < 1e-9);
/// assert!((interval.upper - 95.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn central_interval(sorted_values: &[f64], cl: ConfidenceLevel) -> Interval {
    Interval::new(
        compute_percentile(sorted_values, 100.0 * cl.lower_tail()),
        compute_percentile(sorted_values, 100.0 * cl.upper_tail()),
    )
}
