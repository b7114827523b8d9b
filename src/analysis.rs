use tracing::info;

use crate::error::Result;
use crate::inference::{
    self, ConfidenceInterval, HypothesisTestResult, SampleSizeRequirement,
};
use crate::sample::Sample;
use crate::stats::Descriptive;

/// Knobs for the inferential stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnalysisParams {
    /// Confidence level for both intervals.
    pub confidence: f64,
    /// Critical value for sample-size planning; 1.645 is the 90% level.
    pub size_z: f64,
    /// Target half-width, in observation units (not a fraction of the mean).
    pub margin: f64,
    pub hypothesized_mean: f64,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        AnalysisParams {
            confidence: 0.95,
            size_z: 1.645,
            margin: 0.1,
            hypothesized_mean: 40_000.0,
        }
    }
}

/// Every result derived from one sample.
#[derive(Clone, Debug)]
pub struct Analysis {
    pub descriptive: Descriptive,
    pub mean_ci: ConfidenceInterval,
    pub variance_ci: ConfidenceInterval,
    pub sample_size: SampleSizeRequirement,
    pub t_test: HypothesisTestResult,
}

impl Analysis {
    pub fn run(sample: &Sample, params: &AnalysisParams) -> Result<Self> {
        let descriptive = Descriptive::new(sample);
        let mean_ci = inference::mean_interval(&descriptive, params.confidence)?;
        let variance_ci = inference::variance_interval(&descriptive, params.confidence)?;
        let sample_size =
            inference::required_sample_size(&descriptive, params.size_z, params.margin)?;
        let t_test = inference::t_test(&descriptive, params.hypothesized_mean)?;

        info!(
            n = descriptive.n,
            mean = descriptive.mean,
            p_value = t_test.p_value,
            "analysis complete"
        );

        Ok(Analysis {
            descriptive,
            mean_ci,
            variance_ci,
            sample_size,
            t_test,
        })
    }
}
