use tracing::debug;

use crate::sample::Sample;

/// Point estimates over one sample.
/// A sorted copy is kept for quantile lookups; the sample itself is never reordered.
#[derive(Clone, Debug)]
pub struct Descriptive {
    pub sorted: Vec<f64>,
    pub n: usize,
    pub sum: f64,
    pub mean: f64,
    pub median: f64,
    /// Sample variance, divided by `n - 1`.
    pub variance: f64,
    pub std_dev: f64,
    pub std_error: f64,
}

impl Descriptive {
    pub fn new(sample: &Sample) -> Self {
        let mut sorted = sample.values().to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let sum: f64 = sorted.iter().sum();
        let mean = sum / n as f64;
        let median = median_of_sorted(&sorted);

        // Bessel's correction
        let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        let std_dev = variance.sqrt();
        let std_error = std_dev / (n as f64).sqrt();

        debug!(n, mean, median, variance, std_dev, std_error, "descriptive statistics");

        Descriptive {
            sorted,
            n,
            sum,
            mean,
            median,
            variance,
            std_dev,
            std_error,
        }
    }

    /// Degrees of freedom for a single-sample estimate.
    pub fn df(&self) -> usize {
        self.n.saturating_sub(1)
    }

    pub fn min(&self) -> f64 {
        self.sorted[0]
    }

    pub fn max(&self) -> f64 {
        self.sorted[self.n - 1]
    }

    /// Calculate quantile (0.0 = min, 0.5 = median, 1.0 = max)
    pub fn quantile(&self, q: f64) -> f64 {
        if q <= 0.0 {
            return self.min();
        }
        if q >= 1.0 {
            return self.max();
        }

        // Linear interpolation between closest ranks
        let rank = q * (self.n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = rank.ceil() as usize;
        let fraction = rank - lower as f64;

        self.sorted[lower] * (1.0 - fraction) + self.sorted[upper] * fraction
    }
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}
