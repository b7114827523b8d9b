use crowd_stats::formatting::render_report;
use crowd_stats::inference::Decision;
use crowd_stats::{
    Analysis, AnalysisParams, FileSource, ReaderSource, Sample, SampleSource, StatsError,
    SyntheticSource,
};
use std::io::{Cursor, Write};
use tempfile::NamedTempFile;

#[test]
fn test_file_and_memory_sources_agree() {
    let values = [31_200.0, 28_950.0, 40_120.0, 35_500.0, 33_010.0, 37_800.0];

    let mut file = NamedTempFile::new().unwrap();
    for v in values {
        writeln!(file, "{v}").unwrap();
    }
    file.flush().unwrap();

    let from_file = FileSource {
        path: file.path().to_path_buf(),
    }
    .produce()
    .unwrap();
    let from_memory = Sample::new(values.to_vec()).unwrap();
    assert_eq!(from_file, from_memory);

    let params = AnalysisParams::default();
    let a = Analysis::run(&from_file, &params).unwrap();
    let b = Analysis::run(&from_memory, &params).unwrap();
    assert_eq!(render_report(&a), render_report(&b));
}

#[test]
fn test_default_simulation_report() {
    let sample = SyntheticSource::default().produce().unwrap();
    let analysis = Analysis::run(&sample, &AnalysisParams::default()).unwrap();
    let report = render_report(&analysis);

    assert!(report.contains("mean 95% CI"));
    assert!(report.contains("variance 95% CI"));
    assert!(report.contains("reject H0, the mean differs from 40000"));
    assert_eq!(analysis.t_test.decision, Decision::Reject);
}

#[test]
fn test_true_mean_not_rejected() {
    let sample = SyntheticSource::default().produce().unwrap();
    let params = AnalysisParams {
        hypothesized_mean: sample.values().iter().sum::<f64>() / sample.len() as f64,
        ..AnalysisParams::default()
    };
    let analysis = Analysis::run(&sample, &params).unwrap();
    assert_eq!(analysis.t_test.decision, Decision::FailToReject);
    assert!(analysis.t_test.p_value > 0.99);
}

#[test]
fn test_stdin_style_source_too_short() {
    let mut source = ReaderSource::new(Cursor::new("12000\n\nnot a number\n"));
    assert!(matches!(
        source.produce(),
        Err(StatsError::InvalidSampleSize { len: 1 })
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    let mut source = FileSource {
        path: "/nonexistent/attendance.txt".into(),
    };
    assert!(matches!(source.produce(), Err(StatsError::Io(_))));
}

#[test]
fn test_constant_attendance_divide_by_zero() {
    let sample = Sample::new(vec![20_000.0; 8]).unwrap();
    assert!(matches!(
        Analysis::run(&sample, &AnalysisParams::default()),
        Err(StatsError::DivideByZero)
    ));
}
