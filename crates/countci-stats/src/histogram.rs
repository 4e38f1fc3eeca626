use std::ops::Range;

use serde::Serialize;

use crate::StatsError;

/// A fixed-width histogram over `[low, high)`.
///
/// Values below `low` are counted in a separate underflow counter and values at or
/// above `high` in an overflow counter; neither appears in [`Histogram::bins`].
/// NaN values are ignored.
#[derive(Debug, Clone, Serialize)]
pub struct Histogram {
    bins: Vec<HistogramBin>,
    low: f64,
    high: f64,
    underflow: u64,
    overflow: u64,
}

/// A single bin in a histogram.
///
/// Each bin covers a range of values (inclusive start, exclusive end) and
/// counts the entries falling within it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub range: Range<f64>,
    pub count: u64,
}

impl HistogramBin {
    #[must_use]
    pub fn center(&self) -> f64 {
        f64::midpoint(self.range.start, self.range.end)
    }
}

impl Histogram {
    /// Creates an empty histogram with `num_bins` equal-width bins spanning `[low, high)`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use countci_stats::histogram::Histogram;
    /// let mut histogram = Histogram::new(50, -4.0, 4.0).unwrap();
    /// histogram.fill(0.1);
    /// histogram.fill(5.0);
    /// assert_eq!(histogram.bins()[25].count, 1);
    /// assert_eq!(histogram.overflow(), 1);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    pub fn new(num_bins: usize, low: f64, high: f64) -> Result<Self, StatsError> {
        if num_bins == 0 || !low.is_finite() || !high.is_finite() || low >= high {
            return Err(StatsError::InvalidHistogramRange {
                num_bins,
                low,
                high,
            });
        }
        let width = (high - low) / num_bins as f64;
        let bins = (0..num_bins)
            .map(|i| {
                // Recompute edges from the index to avoid accumulating rounding errors
                let start = low + width * i as f64;
                let end = if i + 1 == num_bins {
                    high
                } else {
                    low + width * (i + 1) as f64
                };
                HistogramBin {
                    range: start..end,
                    count: 0,
                }
            })
            .collect();
        Ok(Self {
            bins,
            low,
            high,
            underflow: 0,
            overflow: 0,
        })
    }

    /// Creates unit-width bins centred on each integer in `low..=high`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use countci_stats::histogram::Histogram;
    /// let mut histogram = Histogram::from_integer_range(0, 30).unwrap();
    /// histogram.fill(7.0);
    /// assert_eq!(histogram.bins().len(), 31);
    /// assert_eq!(histogram.bins()[7].count, 1);
    /// assert_eq!(histogram.bins()[7].center(), 7.0);
    /// ```
    ///
    /// An empty range, or one whose bin count does not fit in `usize`, is
    /// [`StatsError::InvalidHistogramRange`].
    #[expect(clippy::cast_precision_loss)]
    pub fn from_integer_range(low: i64, high: i64) -> Result<Self, StatsError> {
        let num_bins = high
            .checked_sub(low)
            .and_then(|span| span.checked_add(1))
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        Self::new(num_bins, low as f64 - 0.5, high as f64 + 0.5)
    }

    /// Adds one entry.
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    pub fn fill(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        if value < self.low {
            self.underflow += 1;
            return;
        }
        if value >= self.high {
            self.overflow += 1;
            return;
        }
        let num_bins = self.bins.len();
        let position = (value - self.low) / (self.high - self.low) * num_bins as f64;
        let mut idx = (position.floor() as usize).min(num_bins - 1);
        // Floating-point rounding can put the value one bin off near an edge
        if value < self.bins[idx].range.start {
            idx -= 1;
        } else if value >= self.bins[idx].range.end && idx + 1 < num_bins {
            idx += 1;
        }
        self.bins[idx].count += 1;
    }

    /// Adds every value of `values`.
    pub fn fill_all<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = f64>,
    {
        for value in values {
            self.fill(value);
        }
    }

    /// The in-range bins, ordered by position.
    #[must_use]
    pub fn bins(&self) -> &[HistogramBin] {
        &self.bins
    }

    #[must_use]
    pub fn low(&self) -> f64 {
        self.low
    }

    #[must_use]
    pub fn high(&self) -> f64 {
        self.high
    }

    #[must_use]
    pub fn underflow(&self) -> u64 {
        self.underflow
    }

    #[must_use]
    pub fn overflow(&self) -> u64 {
        self.overflow
    }

    /// Total number of entries, including underflow and overflow.
    #[must_use]
    pub fn entries(&self) -> u64 {
        self.underflow + self.overflow + self.bins.iter().map(|bin| bin.count).sum::<u64>()
    }

    /// Largest in-range bin count (0 for an empty histogram).
    #[must_use]
    pub fn max_count(&self) -> u64 {
        self.bins.iter().map(|bin| bin.count).max().unwrap_or(0)
    }
}
