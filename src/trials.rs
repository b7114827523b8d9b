use rayon::prelude::*;
use tracing::info;

use crate::analysis::AnalysisParams;
use crate::error::Result;
use crate::inference::{self, Decision};
use crate::sample::{SampleSource, SyntheticSource};
use crate::stats::Descriptive;

/// Outcome of repeating the t-test on independently seeded samples.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrialSummary {
    pub trials: usize,
    pub rejections: usize,
    pub mean_p_value: f64,
}

impl TrialSummary {
    pub fn rejection_rate(&self) -> f64 {
        if self.trials == 0 {
            return f64::NAN;
        }
        self.rejections as f64 / self.trials as f64
    }
}

/// Runs `trials` analyses on seeds `source.seed, source.seed + 1, ...` in parallel.
/// Each trial owns its sample; a failure in any trial fails the whole batch.
pub fn simulate(
    source: &SyntheticSource,
    params: &AnalysisParams,
    trials: usize,
) -> Result<TrialSummary> {
    let p_values: Vec<(f64, Decision)> = (0..trials as u64)
        .into_par_iter()
        .map(|i| -> Result<(f64, Decision)> {
            let sample = source.with_seed(source.seed.wrapping_add(i)).produce()?;
            let stats = Descriptive::new(&sample);
            let result = inference::t_test(&stats, params.hypothesized_mean)?;
            Ok((result.p_value, result.decision))
        })
        .collect::<Result<_>>()?;

    let rejections = p_values
        .iter()
        .filter(|(_, d)| *d == Decision::Reject)
        .count();
    let mean_p_value = p_values.iter().map(|(p, _)| p).sum::<f64>() / trials.max(1) as f64;

    info!(trials, rejections, "simulated repeated trials");

    Ok(TrialSummary {
        trials,
        rejections,
        mean_p_value,
    })
}
