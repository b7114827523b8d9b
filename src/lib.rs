pub mod analysis;
pub mod error;
pub mod formatting;
pub mod inference;
pub mod parsing;
pub mod plot;
pub mod sample;
pub mod stats;
pub mod trials;

pub use analysis::{Analysis, AnalysisParams};
pub use error::{Result, StatsError};
pub use sample::{FileSource, ReaderSource, Sample, SampleSource, SyntheticSource};
