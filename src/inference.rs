//! Interval estimates, sample-size planning and the one-sample t-test.
//!
//! Every operation validates its inputs up front and either returns a complete
//! result or an error; nothing is partially filled in.

use statrs::distribution::{ChiSquared, Continuous, ContinuousCDF, Normal, StudentsT};
use tracing::debug;

use crate::error::{Result, StatsError};
use crate::stats::Descriptive;

/// p-values below this reject the null hypothesis.
pub const SIGNIFICANCE: f64 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quantity {
    Mean,
    Variance,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConfidenceInterval {
    pub quantity: Quantity,
    pub confidence: f64,
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn contains(&self, x: f64) -> bool {
        self.lower <= x && x <= self.upper
    }
}

/// Minimum sample size for a target half-width.
///
/// This is an approximation: the sample standard deviation stands in for the
/// unknown population value, so `required` is only as good as that estimate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleSizeRequirement {
    pub z: f64,
    /// Absolute half-width, in the same units as the observations.
    pub margin: f64,
    pub std_dev: f64,
    pub required: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Reject,
    FailToReject,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HypothesisTestResult {
    pub hypothesized_mean: f64,
    pub statistic: f64,
    pub df: usize,
    pub p_value: f64,
    pub decision: Decision,
}

/// `mean ± t(1 - α/2, n - 1) · std_error`
pub fn mean_interval(stats: &Descriptive, confidence: f64) -> Result<ConfidenceInterval> {
    let df = check_sample(stats)?;
    let alpha = check_confidence(confidence)?;

    let t_crit = quantile(&students_t(df)?, 1.0 - alpha / 2.0)?;
    let half_width = t_crit * stats.std_error;
    debug!(df, t_crit, half_width, "mean interval");

    Ok(ConfidenceInterval {
        quantity: Quantity::Mean,
        confidence,
        lower: stats.mean - half_width,
        upper: stats.mean + half_width,
    })
}

/// `[(n-1)s² / χ²(1 - α/2), (n-1)s² / χ²(α/2)]`
pub fn variance_interval(stats: &Descriptive, confidence: f64) -> Result<ConfidenceInterval> {
    let df = check_sample(stats)?;
    let alpha = check_confidence(confidence)?;

    let chi2 = ChiSquared::new(df as f64).map_err(|e| StatsError::Distribution(e.to_string()))?;
    let chi2_low = quantile(&chi2, alpha / 2.0)?;
    let chi2_high = quantile(&chi2, 1.0 - alpha / 2.0)?;
    let scaled = df as f64 * stats.variance;
    debug!(df, chi2_low, chi2_high, "variance interval");

    // The upper quantile gives the lower bound.
    Ok(ConfidenceInterval {
        quantity: Quantity::Variance,
        confidence,
        lower: scaled / chi2_high,
        upper: scaled / chi2_low,
    })
}

/// `ceil((z · s / margin)²)`
pub fn required_sample_size(
    stats: &Descriptive,
    z: f64,
    margin: f64,
) -> Result<SampleSizeRequirement> {
    check_sample(stats)?;
    if !(z.is_finite() && z > 0.0) {
        return Err(StatsError::InvalidParameter { name: "z", value: z });
    }
    if !(margin.is_finite() && margin > 0.0) {
        return Err(StatsError::InvalidParameter {
            name: "margin",
            value: margin,
        });
    }

    let raw = (z * stats.std_dev / margin).powi(2).ceil();
    // u64::MAX as f64 rounds up to 2^64, which is already out of range
    if !(raw.is_finite() && raw < u64::MAX as f64) {
        return Err(StatsError::InvalidParameter {
            name: "margin",
            value: margin,
        });
    }
    let required = raw as u64;
    debug!(z, margin, required, "required sample size");

    Ok(SampleSizeRequirement {
        z,
        margin,
        std_dev: stats.std_dev,
        required,
    })
}

/// Two-sided one-sample t-test of `mean == hypothesized_mean`.
pub fn t_test(stats: &Descriptive, hypothesized_mean: f64) -> Result<HypothesisTestResult> {
    let df = check_sample(stats)?;
    if !hypothesized_mean.is_finite() {
        return Err(StatsError::InvalidParameter {
            name: "hypothesized_mean",
            value: hypothesized_mean,
        });
    }

    let statistic = (stats.mean - hypothesized_mean) / stats.std_error;
    let p_value = 2.0 * (1.0 - students_t(df)?.cdf(statistic.abs()));
    let decision = if p_value < SIGNIFICANCE {
        Decision::Reject
    } else {
        Decision::FailToReject
    };
    debug!(statistic, p_value, ?decision, "t-test");

    Ok(HypothesisTestResult {
        hypothesized_mean,
        statistic,
        df,
        p_value,
        decision,
    })
}

/// Two-sided standard normal critical value, e.g. 0.90 -> 1.645.
pub fn z_critical(confidence: f64) -> Result<f64> {
    let alpha = check_confidence(confidence)?;
    let normal = Normal::new(0.0, 1.0).map_err(|e| StatsError::Distribution(e.to_string()))?;
    Ok(normal.inverse_cdf(1.0 - alpha / 2.0))
}

/// Library inverse CDF, polished with a few Newton steps on the CDF.
/// Falls back to bisection when the library value is not finite.
fn quantile<D>(dist: &D, p: f64) -> Result<f64>
where
    D: ContinuousCDF<f64, f64> + Continuous<f64, f64>,
{
    let mut x = dist.inverse_cdf(p);
    if !x.is_finite() {
        x = bisect_cdf(dist, p);
    }
    for _ in 0..8 {
        let density = dist.pdf(x);
        if !(density.is_finite() && density > 0.0) {
            break;
        }
        let step = (dist.cdf(x) - p) / density;
        let next = x - step;
        // stay inside the support
        if !(next.is_finite() && dist.pdf(next) > 0.0) {
            break;
        }
        x = next;
        if step.abs() <= f64::EPSILON * x.abs() {
            break;
        }
    }

    if x.is_finite() {
        Ok(x)
    } else {
        Err(StatsError::Distribution(format!("no finite quantile at p = {p}")))
    }
}

/// Solves `cdf(x) = p` by bracketing outward from [-1, 1] and halving.
fn bisect_cdf<D: ContinuousCDF<f64, f64>>(dist: &D, p: f64) -> f64 {
    let (mut lo, mut hi) = (-1.0_f64, 1.0_f64);
    while dist.cdf(lo) > p && lo > -1e300 {
        lo *= 2.0;
    }
    while dist.cdf(hi) < p && hi < 1e300 {
        hi *= 2.0;
    }
    for _ in 0..2000 {
        let mid = 0.5 * (lo + hi);
        if mid <= lo || mid >= hi {
            break;
        }
        if dist.cdf(mid) < p {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

fn students_t(df: usize) -> Result<StudentsT> {
    StudentsT::new(0.0, 1.0, df as f64).map_err(|e| StatsError::Distribution(e.to_string()))
}

/// Returns the degrees of freedom once the sample supports a ratio with std_error.
fn check_sample(stats: &Descriptive) -> Result<usize> {
    if stats.n < 2 {
        return Err(StatsError::DegenerateSample { len: stats.n });
    }
    if stats.std_dev == 0.0 {
        return Err(StatsError::DivideByZero);
    }
    Ok(stats.df())
}

fn check_confidence(confidence: f64) -> Result<f64> {
    if confidence > 0.0 && confidence < 1.0 {
        Ok(1.0 - confidence)
    } else {
        Err(StatsError::InvalidParameter {
            name: "confidence",
            value: confidence,
        })
    }
}
