use clap::Parser;
use crowd_stats::formatting::{render_report, render_trials};
use crowd_stats::plot::{BoxSummary, Histogram};
use crowd_stats::trials;
use crowd_stats::{
    Analysis, AnalysisParams, FileSource, ReaderSource, Result, SampleSource, StatsError,
    SyntheticSource,
};
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(about = "Estimates and tests attendance statistics", version)]
struct Args {
    /// Input file, one observation per line ("-" for stdin; simulated if not specified)
    input: Option<PathBuf>,

    /// Report file (stdout if not specified)
    output: Option<PathBuf>,

    /// Number of simulated observations
    #[arg(short = 'n', long, default_value_t = 500)]
    size: usize,

    /// Mean of the simulated normal distribution
    #[arg(long, default_value_t = 35_000.0)]
    mean: f64,

    /// Standard deviation of the simulated normal distribution
    #[arg(long, default_value_t = 7_000.0)]
    std_dev: f64,

    /// Simulated observations are clamped to at least this value
    #[arg(long, default_value_t = 5_000.0)]
    min: f64,

    /// Simulated observations are clamped to at most this value
    #[arg(long, default_value_t = 80_000.0)]
    max: f64,

    /// Random seed for the simulated sample
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Confidence level for the mean and variance intervals
    #[arg(short, long, default_value_t = 0.95)]
    confidence: f64,

    /// Critical value for the sample-size calculation (1.645 = 90%)
    #[arg(long, default_value_t = 1.645)]
    size_z: f64,

    /// Target margin of error, in observation units
    #[arg(long, default_value_t = 0.1)]
    margin: f64,

    /// Hypothesized population mean for the t-test
    #[arg(long, default_value_t = 40_000.0)]
    mu0: f64,

    /// Histogram bin count
    #[arg(short, long, default_value_t = 30)]
    bins: usize,

    /// Skip the histogram and box plot
    #[arg(long)]
    no_plot: bool,

    /// Repeat the t-test on this many independently seeded samples instead
    #[arg(long)]
    trials: Option<usize>,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn synthetic(&self) -> SyntheticSource {
        SyntheticSource {
            size: self.size,
            mean: self.mean,
            std_dev: self.std_dev,
            min: self.min,
            max: self.max,
            seed: self.seed,
        }
    }

    fn params(&self) -> AnalysisParams {
        AnalysisParams {
            confidence: self.confidence,
            size_z: self.size_z,
            margin: self.margin,
            hypothesized_mean: self.mu0,
        }
    }

    fn source(&self) -> Box<dyn SampleSource> {
        match &self.input {
            Some(path) if path.as_os_str() == "-" => Box::new(ReaderSource::new(io::stdin().lock())),
            Some(path) => Box::new(FileSource { path: path.clone() }),
            None => Box::new(self.synthetic()),
        }
    }
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(&args) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let params = args.params();
    if args.bins == 0 && !args.no_plot {
        return Err(StatsError::InvalidParameter {
            name: "bins",
            value: 0.0,
        });
    }

    if let Some(n) = args.trials {
        if args.input.is_some() {
            return Err(StatsError::InvalidParameter {
                name: "trials",
                value: n as f64,
            });
        }
        let summary = trials::simulate(&args.synthetic(), &params, n)?;
        return emit(
            args.output.as_deref(),
            &render_trials(&summary, params.hypothesized_mean),
        );
    }

    let sample = args.source().produce()?;
    let analysis = Analysis::run(&sample, &params)?;
    emit(args.output.as_deref(), &render_report(&analysis))?;

    if !args.no_plot {
        println!();
        Histogram::new(&analysis.descriptive.sorted, args.bins)?.draw();
        println!();
        BoxSummary::new(&analysis.descriptive).draw();
    }

    Ok(())
}

/// Writes text to the report file, or stdout when none was given.
fn emit(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text)?;
            info!(path = %path.display(), "wrote report");
        }
        None => print!("{text}"),
    }
    Ok(())
}
