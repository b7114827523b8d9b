use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rand_pcg::Pcg64;
use std::fs::File;
use std::io::BufRead;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::error::{Result, StatsError};
use crate::parsing::{self, Parsed};

/// Immutable, finite sequence of at least two observations.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample(Vec<f64>);

impl Sample {
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.len() < 2 {
            return Err(StatsError::InvalidSampleSize { len: values.len() });
        }
        if let Some(index) = values.iter().position(|x| !x.is_finite()) {
            return Err(StatsError::NonFiniteObservation { index });
        }
        Ok(Sample(values))
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false, a `Sample` holds at least two observations.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Anything that can produce one sample for analysis.
pub trait SampleSource {
    fn produce(&mut self) -> Result<Sample>;
}

/// Seeded normal generator, clamped to `[min, max]` and truncated to whole counts.
#[derive(Clone, Debug)]
pub struct SyntheticSource {
    pub size: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub seed: u64,
}

impl Default for SyntheticSource {
    fn default() -> Self {
        SyntheticSource {
            size: 500,
            mean: 35_000.0,
            std_dev: 7_000.0,
            min: 5_000.0,
            max: 80_000.0,
            seed: 42,
        }
    }
}

impl SyntheticSource {
    /// Same generator settings with a different seed.
    pub fn with_seed(&self, seed: u64) -> Self {
        SyntheticSource {
            seed,
            ..self.clone()
        }
    }
}

impl SampleSource for SyntheticSource {
    fn produce(&mut self) -> Result<Sample> {
        if self.size < 2 {
            return Err(StatsError::InvalidSampleSize { len: self.size });
        }
        if !(self.min <= self.max) {
            return Err(StatsError::InvalidParameter {
                name: "min",
                value: self.min,
            });
        }
        let normal = Normal::new(self.mean, self.std_dev).map_err(|_| {
            StatsError::InvalidParameter {
                name: "std_dev",
                value: self.std_dev,
            }
        })?;

        let mut rng = Pcg64::seed_from_u64(self.seed);
        let values: Vec<f64> = normal
            .sample_iter(&mut rng)
            .take(self.size)
            .map(|x: f64| x.clamp(self.min, self.max).trunc())
            .collect();

        debug!(size = self.size, seed = self.seed, "generated synthetic sample");
        Sample::new(values)
    }
}

/// Newline-delimited numbers from a file on disk, memory-mapped.
#[derive(Clone, Debug)]
pub struct FileSource {
    pub path: PathBuf,
}

impl SampleSource for FileSource {
    fn produce(&mut self) -> Result<Sample> {
        let file = File::open(&self.path)?;
        let parsed = parsing::read_file_mmap(&file)?;
        into_sample(parsed, &self.path.display().to_string())
    }
}

/// Newline-delimited numbers from any buffered reader (stdin, sockets, ...).
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        ReaderSource { reader }
    }
}

impl<R: BufRead> SampleSource for ReaderSource<R> {
    fn produce(&mut self) -> Result<Sample> {
        let parsed = parsing::read_lines(&mut self.reader)?;
        into_sample(parsed, "input")
    }
}

fn into_sample(parsed: Parsed, origin: &str) -> Result<Sample> {
    if parsed.skipped > 0 {
        warn!(origin, skipped = parsed.skipped, "ignored unparseable lines");
    }
    debug!(origin, size = parsed.values.len(), "loaded sample");
    Sample::new(parsed.values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_sample_rejects_empty_and_single() {
        assert!(matches!(
            Sample::new(vec![]),
            Err(StatsError::InvalidSampleSize { len: 0 })
        ));
        assert!(matches!(
            Sample::new(vec![1.0]),
            Err(StatsError::InvalidSampleSize { len: 1 })
        ));
    }

    #[test]
    fn test_sample_accepts_two() {
        let sample = Sample::new(vec![1.0, 2.0]).unwrap();
        assert_eq!(sample.len(), 2);
        assert_eq!(sample.values(), &[1.0, 2.0]);
    }

    #[test]
    fn test_sample_rejects_nan() {
        let result = Sample::new(vec![1.0, f64::NAN, 3.0]);
        assert!(matches!(
            result,
            Err(StatsError::NonFiniteObservation { index: 1 })
        ));
    }

    #[test]
    fn test_synthetic_is_reproducible() {
        let a = SyntheticSource::default().produce().unwrap();
        let b = SyntheticSource::default().produce().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 500);
    }

    #[test]
    fn test_synthetic_seed_changes_sample() {
        let base = SyntheticSource::default();
        let a = base.clone().produce().unwrap();
        let b = base.with_seed(7).produce().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_synthetic_clamped_whole_counts() {
        let mut source = SyntheticSource {
            size: 1000,
            mean: 100.0,
            std_dev: 50.0,
            min: 80.0,
            max: 120.0,
            seed: 1,
        };
        let sample = source.produce().unwrap();
        for &x in sample.values() {
            assert!((80.0..=120.0).contains(&x));
            assert_eq!(x, x.trunc());
        }
    }

    #[test]
    fn test_synthetic_invalid_size() {
        let mut source = SyntheticSource {
            size: 1,
            ..SyntheticSource::default()
        };
        assert!(matches!(
            source.produce(),
            Err(StatsError::InvalidSampleSize { len: 1 })
        ));
    }

    #[test]
    fn test_synthetic_negative_std_dev() {
        let mut source = SyntheticSource {
            std_dev: -1.0,
            ..SyntheticSource::default()
        };
        assert!(matches!(
            source.produce(),
            Err(StatsError::InvalidParameter { name: "std_dev", .. })
        ));
    }

    #[test]
    fn test_reader_source() {
        let mut source = ReaderSource::new(Cursor::new("1\n2\nabc\n3\n"));
        let sample = source.produce().unwrap();
        assert_eq!(sample.values(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_reader_source_too_short() {
        let mut source = ReaderSource::new(Cursor::new("42\n"));
        assert!(matches!(
            source.produce(),
            Err(StatsError::InvalidSampleSize { len: 1 })
        ));
    }
}
