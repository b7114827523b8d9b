use crate::analysis::Analysis;
use crate::inference::{ConfidenceInterval, Decision, HypothesisTestResult};
use crate::trials::TrialSummary;

const LABEL_WIDTH: usize = 22;

/// Plain-text report, one `label  value` row per line.
pub fn render_report(analysis: &Analysis) -> String {
    let d = &analysis.descriptive;
    let test = &analysis.t_test;
    let req = &analysis.sample_size;
    let mean_label = interval_label("mean", &analysis.mean_ci);
    let variance_label = interval_label("variance", &analysis.variance_ci);

    let rows = [
        ("n", d.n.to_string()),
        ("mean", format!("{:.2}", d.mean)),
        ("median", format!("{:.2}", d.median)),
        ("variance", format!("{:.2}", d.variance)),
        ("std dev", format!("{:.2}", d.std_dev)),
        ("std error", format!("{:.2}", d.std_error)),
        ("", String::new()),
        (mean_label.as_str(), format_interval(&analysis.mean_ci)),
        (variance_label.as_str(), format_interval(&analysis.variance_ci)),
        ("", String::new()),
        ("margin of error", format!("{}", req.margin)),
        ("required n", format!("{} (z = {})", req.required, req.z)),
        ("", String::new()),
        ("H0 mean", format!("{}", test.hypothesized_mean)),
        ("t statistic", format!("{:.4}", test.statistic)),
        ("df", test.df.to_string()),
        ("p-value", format!("{:.5}", test.p_value)),
        ("decision", decision_text(test)),
    ];

    let mut out = String::new();
    for (label, value) in rows {
        if label.is_empty() {
            out.push('\n');
        } else {
            out.push_str(&format!("{:>LABEL_WIDTH$}  {}\n", label, value));
        }
    }
    out
}

pub fn render_trials(summary: &TrialSummary, hypothesized_mean: f64) -> String {
    format!(
        "{:>LABEL_WIDTH$}  {}\n{:>LABEL_WIDTH$}  {} ({:.1}%) against mean {}\n{:>LABEL_WIDTH$}  {:.5}\n",
        "trials",
        summary.trials,
        "rejections",
        summary.rejections,
        summary.rejection_rate() * 100.0,
        hypothesized_mean,
        "mean p-value",
        summary.mean_p_value,
    )
}

fn interval_label(name: &str, ci: &ConfidenceInterval) -> String {
    format!("{} {}% CI", name, percent(ci.confidence))
}

fn format_interval(ci: &ConfidenceInterval) -> String {
    format!("[{:.2}, {:.2}]", ci.lower, ci.upper)
}

/// 0.95 -> "95", 0.975 -> "97.5"
fn percent(level: f64) -> String {
    let pct = format!("{:.2}", level * 100.0);
    pct.trim_end_matches('0').trim_end_matches('.').to_string()
}

pub fn decision_text(test: &HypothesisTestResult) -> String {
    match test.decision {
        Decision::Reject => format!(
            "reject H0, the mean differs from {}",
            test.hypothesized_mean
        ),
        Decision::FailToReject => format!(
            "fail to reject H0, the mean may be {}",
            test.hypothesized_mean
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisParams;
    use crate::sample::Sample;

    fn analysis() -> Analysis {
        let sample = Sample::new(vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let params = AnalysisParams {
            margin: 0.5,
            hypothesized_mean: 4.0,
            ..AnalysisParams::default()
        };
        Analysis::run(&sample, &params).unwrap()
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0.95), "95");
        assert_eq!(percent(0.975), "97.5");
        assert_eq!(percent(0.9), "90");
    }

    #[test]
    fn test_format_interval() {
        let ci = ConfidenceInterval {
            quantity: crate::inference::Quantity::Mean,
            confidence: 0.95,
            lower: 1.23456,
            upper: 9.8765,
        };
        assert_eq!(format_interval(&ci), "[1.23, 9.88]");
    }

    #[test]
    fn test_report_fields_and_precision() {
        let report = render_report(&analysis());

        assert!(report.contains(&format!("{:>LABEL_WIDTH$}  3.00\n", "mean")));
        assert!(report.contains("median  3.00\n"));
        assert!(report.contains("variance  2.50\n"));
        assert!(report.contains("std dev  1.58\n"));
        assert!(report.contains("std error  0.71\n"));
        assert!(report.contains("mean 95% CI  [1.04, 4.96]\n"));
        assert!(report.contains("variance 95% CI  [0.90, 20.64]\n"));
        assert!(report.contains("required n  28 (z = 1.645)\n"));
        assert!(report.contains("t statistic  -1.4142\n"));
        assert!(report.contains("decision  fail to reject H0, the mean may be 4\n"));
    }

    #[test]
    fn test_p_value_five_decimals() {
        let report = render_report(&analysis());
        let line = report
            .lines()
            .find(|l| l.trim_start().starts_with("p-value"))
            .unwrap();
        let value = line.split_whitespace().last().unwrap();
        assert_eq!(value.split('.').nth(1).unwrap().len(), 5);
    }

    #[test]
    fn test_decision_text_reject() {
        let mut a = analysis();
        a.t_test.decision = Decision::Reject;
        assert_eq!(
            decision_text(&a.t_test),
            "reject H0, the mean differs from 4"
        );
    }

    #[test]
    fn test_render_trials() {
        let summary = TrialSummary {
            trials: 200,
            rejections: 10,
            mean_p_value: 0.5,
        };
        let text = render_trials(&summary, 35_000.0);
        assert!(text.contains("rejections  10 (5.0%) against mean 35000"));
        assert!(text.contains("mean p-value  0.50000"));
    }
}
