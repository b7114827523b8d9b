/// Failures of the sample loaders and the statistics pipeline.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StatsError {
    /// Fewer than two observations were supplied.
    #[error("sample needs at least 2 observations, got {len}")]
    InvalidSampleSize { len: usize },

    /// Too few observations for the degrees of freedom an inference needs.
    #[error("sample of {len} observations leaves no degrees of freedom")]
    DegenerateSample { len: usize },

    /// Standard deviation is exactly zero (constant sample).
    #[error("standard deviation is zero, ratio is undefined")]
    DivideByZero,

    #[error("observation {index} is not a finite number")]
    NonFiniteObservation { index: usize },

    #[error("invalid value for {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("could not build distribution: {0}")]
    Distribution(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StatsError>;
