//! Quantiles of the regularized incomplete beta and gamma functions.
//!
//! The regularized functions themselves come from `statrs`; this module inverts them.
//! All three quantiles share one solver: bracket the root, then bisect until the
//! bracket can no longer be split in `f64`.
//!
//! The functions do not validate their shape parameters. Passing a non-positive
//! shape is a precondition violation (checked with `debug_assert!`), mirroring the
//! behavior of the special-function libraries these intervals are usually built on.

use statrs::function::{beta, gamma};

/// Upper limit on bisection steps.
///
/// Halving a bracket of doubles collapses it to adjacent values in well under
/// 1100 steps, even when the root is subnormal.
const MAX_BISECTIONS: usize = 2048;

/// Returns `x` in `[0, 1]` such that `I_x(a, b) = p`.
///
/// This is the quantile function of the Beta(`a`, `b`) distribution.
///
/// # Arguments
///
/// * `p` - Probability. Values `<= 0` map to `0`, values `>= 1` map to `1`.
/// * `a` - First shape parameter (must be positive)
/// * `b` - Second shape parameter (must be positive)
///
/// # Examples
///
/// ```
/// use countci_stats::special::beta_quantile;
///
/// // Beta(1, 1) is uniform.
/// assert!((beta_quantile(0.3, 1.0, 1.0) - 0.3).abs() < 1e-12);
/// ```
#[must_use]
pub fn beta_quantile(p: f64, a: f64, b: f64) -> f64 {
    debug_assert!(a > 0.0 && b > 0.0, "beta shapes must be positive: a={a}, b={b}");
    if p.is_nan() {
        return f64::NAN;
    }
    if p <= 0.0 {
        return 0.0;
    }
    if p >= 1.0 {
        return 1.0;
    }
    bisect(0.0, 1.0, |x| beta::beta_reg(a, b, x) < p)
}

/// Returns `x >= 0` such that `P(shape, x) = p`.
///
/// This is the quantile function of the Gamma(`shape`, scale = 1) distribution,
/// where `P` is the regularized lower incomplete gamma function.
///
/// # Arguments
///
/// * `p` - Probability. Values `<= 0` map to `0`, values `>= 1` map to `+inf`.
/// * `shape` - Shape parameter (must be positive)
///
/// # Examples
///
/// ```
/// use countci_stats::special::gamma_quantile;
///
/// // Gamma(1, 1) is the unit exponential distribution.
/// let x = gamma_quantile(0.5, 1.0);
/// assert!((x - std::f64::consts::LN_2).abs() < 1e-12);
/// ```
#[must_use]
pub fn gamma_quantile(p: f64, shape: f64) -> f64 {
    debug_assert!(shape > 0.0, "gamma shape must be positive: {shape}");
    if p.is_nan() {
        return f64::NAN;
    }
    if p <= 0.0 {
        return 0.0;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }
    let Some(high) = expand_bracket(shape, |x| gamma::gamma_lr(shape, x) < p) else {
        return f64::INFINITY;
    };
    bisect(0.0, high, |x| gamma::gamma_lr(shape, x) < p)
}

/// Returns `x >= 0` such that `Q(shape, x) = 1 - P(shape, x) = p`.
///
/// This is the complementary quantile of the Gamma(`shape`, scale = 1) distribution.
/// It is solved against the upper regularized incomplete gamma function directly,
/// so upper-tail probabilities keep full relative precision.
///
/// # Arguments
///
/// * `p` - Upper-tail probability. Values `>= 1` map to `0`, values `<= 0` map to `+inf`.
/// * `shape` - Shape parameter (must be positive)
///
/// # Examples
///
/// ```
/// use countci_stats::special::gamma_quantile_c;
///
/// // For Gamma(1, 1), Q(1, x) = exp(-x).
/// let x = gamma_quantile_c(0.025, 1.0);
/// assert!((x + 0.025_f64.ln()).abs() < 1e-12);
/// ```
#[must_use]
pub fn gamma_quantile_c(p: f64, shape: f64) -> f64 {
    debug_assert!(shape > 0.0, "gamma shape must be positive: {shape}");
    if p.is_nan() {
        return f64::NAN;
    }
    if p >= 1.0 {
        return 0.0;
    }
    if p <= 0.0 {
        return f64::INFINITY;
    }
    let Some(high) = expand_bracket(shape, |x| gamma::gamma_ur(shape, x) > p) else {
        return f64::INFINITY;
    };
    bisect(0.0, high, |x| gamma::gamma_ur(shape, x) > p)
}

/// Finds an upper end of a bracket for a gamma quantile.
///
/// Starts at `max(shape, 1)` and doubles until `before_root` turns false.
/// Returns `None` if the bracket overflows.
fn expand_bracket<F>(shape: f64, before_root: F) -> Option<f64>
where
    F: Fn(f64) -> bool,
{
    let mut high = shape.max(1.0);
    while before_root(high) {
        high *= 2.0;
        if !high.is_finite() {
            return None;
        }
    }
    Some(high)
}

/// Bisects `[low, high]` for the point where `before_root` switches from true to false.
///
/// `before_root` must be monotone on the bracket: true left of the root, false right of it.
fn bisect<F>(mut low: f64, mut high: f64, before_root: F) -> f64
where
    F: Fn(f64) -> bool,
{
    for _ in 0..MAX_BISECTIONS {
        let mid = low + (high - low) / 2.0;
        if mid <= low || mid >= high {
            break;
        }
        if before_root(mid) {
            low = mid;
        } else {
            high = mid;
        }
    }
    low + (high - low) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rel_eq(actual: f64, expected: f64, tol: f64) {
        let rel = ((actual - expected) / expected).abs();
        assert!(
            rel <= tol,
            "expected {expected}, got {actual} (relative error {rel:e} > {tol:e})"
        );
    }

    #[test]
    fn test_beta_quantile_uniform() {
        for p in [0.01, 0.25, 0.5, 0.75, 0.99] {
            assert_rel_eq(beta_quantile(p, 1.0, 1.0), p, 1e-12);
        }
    }

    #[test]
    fn test_beta_quantile_reference_values() {
        // Reference values evaluated with 40-digit arithmetic.
        assert_rel_eq(beta_quantile(0.025, 1.0, 10.0), 0.002_528_578_544_461_861_7, 1e-9);
        assert_rel_eq(beta_quantile(0.975, 4.0, 7.0), 0.652_452_850_059_997_24, 1e-9);
        assert_rel_eq(beta_quantile(0.5, 2.0, 3.0), 0.385_727_568_132_389_55, 1e-9);
    }

    #[test]
    fn test_beta_quantile_limits() {
        assert_eq!(beta_quantile(0.0, 2.0, 3.0), 0.0);
        assert_eq!(beta_quantile(-1.0, 2.0, 3.0), 0.0);
        assert_eq!(beta_quantile(1.0, 2.0, 3.0), 1.0);
        assert!(beta_quantile(f64::NAN, 2.0, 3.0).is_nan());
    }

    #[test]
    fn test_beta_quantile_is_monotone_in_p() {
        let mut prev = 0.0;
        for i in 1..100 {
            let p = f64::from(i) / 100.0;
            let x = beta_quantile(p, 7.0, 1885.6);
            assert!(x >= prev, "quantile decreased at p={p}");
            prev = x;
        }
    }

    #[test]
    fn test_gamma_quantile_reference_values() {
        // Garwood lower bounds at 95% CL: P(N, L) = 0.025.
        assert_rel_eq(gamma_quantile(0.025, 1.0), 0.025_317_807_984_289_877, 1e-9);
        assert_rel_eq(gamma_quantile(0.025, 2.0), 0.242_209_278_543_964_91, 1e-9);
        assert_rel_eq(gamma_quantile(0.025, 5.0), 1.623_486_390_118_420_6, 1e-9);
        assert_rel_eq(gamma_quantile(0.025, 10.0), 4.795_388_696_132_433_7, 1e-9);
        assert_rel_eq(gamma_quantile(0.025, 50.0), 37.110_963_737_461_863, 1e-9);
    }

    #[test]
    fn test_gamma_quantile_c_reference_values() {
        // Garwood upper bounds at 95% CL: Q(N + 1, U) = 0.025.
        assert_rel_eq(gamma_quantile_c(0.025, 1.0), 3.688_879_454_113_936_2, 1e-9);
        assert_rel_eq(gamma_quantile_c(0.025, 2.0), 5.571_643_390_938_898_5, 1e-9);
        assert_rel_eq(gamma_quantile_c(0.025, 3.0), 7.224_687_667_723_960_7, 1e-9);
        assert_rel_eq(gamma_quantile_c(0.025, 6.0), 11.668_332_079_322_67, 1e-9);
        assert_rel_eq(gamma_quantile_c(0.025, 11.0), 18.390_356_042_017_779, 1e-9);
        assert_rel_eq(gamma_quantile_c(0.025, 51.0), 65.918_766_664_336_817, 1e-9);
    }

    #[test]
    fn test_gamma_quantile_round_trip() {
        for shape in [1.0, 2.0, 3.0, 7.0, 20.0, 100.0] {
            for p in [0.001, 0.025, 0.158_65, 0.5, 0.841_35, 0.975] {
                let x = gamma_quantile(p, shape);
                assert_rel_eq(gamma::gamma_lr(shape, x), p, 1e-9);

                let xc = gamma_quantile_c(p, shape);
                assert_rel_eq(gamma::gamma_ur(shape, xc), p, 1e-9);
            }
        }
    }

    #[test]
    fn test_gamma_quantile_and_complement_agree() {
        for shape in [1.0, 4.0, 30.0] {
            let x = gamma_quantile(0.3, shape);
            let xc = gamma_quantile_c(0.7, shape);
            assert_rel_eq(xc, x, 1e-9);
        }
    }

    #[test]
    fn test_gamma_quantile_limits() {
        assert_eq!(gamma_quantile(0.0, 3.0), 0.0);
        assert_eq!(gamma_quantile(1.0, 3.0), f64::INFINITY);
        assert_eq!(gamma_quantile_c(1.0, 3.0), 0.0);
        assert_eq!(gamma_quantile_c(0.0, 3.0), f64::INFINITY);
    }
}
