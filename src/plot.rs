use textplots::{Chart, Plot, Shape};

use crate::error::{Result, StatsError};
use crate::stats::Descriptive;

const CHART_WIDTH: u32 = 160;
const HISTOGRAM_HEIGHT: u32 = 40;
const BOX_HEIGHT: u32 = 20;

/// Equal-width frequency bins over `[min, max]`; the last bin is closed on the right.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    pub start: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Expects `sorted` ascending, as kept by [`Descriptive`].
    pub fn new(sorted: &[f64], bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(StatsError::InvalidParameter {
                name: "bins",
                value: 0.0,
            });
        }
        let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
            return Ok(Histogram {
                start: 0.0,
                bin_width: 1.0,
                counts: vec![0; bins],
            });
        };

        // A constant sample gets a unit-wide range centred on its value
        let (start, end) = if max > min {
            (min, max)
        } else {
            (min - 0.5, max + 0.5)
        };
        let bin_width = (end - start) / bins as f64;

        let mut counts = vec![0; bins];
        for &x in sorted {
            let idx = (((x - start) / bin_width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Ok(Histogram {
            start,
            bin_width,
            counts,
        })
    }

    pub fn end(&self) -> f64 {
        self.start + self.bin_width * self.counts.len() as f64
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn draw(&self) {
        let peak = self.counts.iter().copied().max().unwrap_or(0).max(1) as f32;
        let mut bars: Vec<(f32, f32)> = self
            .counts
            .iter()
            .enumerate()
            .map(|(i, &c)| ((self.start + self.bin_width * i as f64) as f32, c as f32))
            .collect();
        bars.push((self.end() as f32, 0.0));

        println!("frequency histogram ({} bins)", self.counts.len());
        Chart::new_with_y_range(
            CHART_WIDTH,
            HISTOGRAM_HEIGHT,
            self.start as f32,
            self.end() as f32,
            0.0,
            peak * 1.1,
        )
        .lineplot(&Shape::Bars(&bars))
        .nice();
    }
}

/// Five-number summary with Tukey whiskers (1.5 IQR, clamped to observed data).
#[derive(Clone, Debug, PartialEq)]
pub struct BoxSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    pub fn new(stats: &Descriptive) -> Self {
        let q1 = stats.quantile(0.25);
        let q3 = stats.quantile(0.75);
        let iqr = q3 - q1;
        let low_fence = q1 - 1.5 * iqr;
        let high_fence = q3 + 1.5 * iqr;

        let inside = || {
            stats
                .sorted
                .iter()
                .copied()
                .filter(move |x| (low_fence..=high_fence).contains(x))
        };
        let whisker_low = inside().next().unwrap_or(q1);
        let whisker_high = inside().last().unwrap_or(q3);
        let outliers = stats
            .sorted
            .iter()
            .copied()
            .filter(|&x| x < low_fence || x > high_fence)
            .collect();

        BoxSummary {
            min: stats.min(),
            q1,
            median: stats.median,
            q3,
            max: stats.max(),
            whisker_low,
            whisker_high,
            outliers,
        }
    }

    /// Horizontal box plot.
    pub fn draw(&self) {
        let pad = if self.max > self.min {
            (self.max - self.min) * 0.05
        } else {
            1.0
        };
        let (lo, hi) = ((self.min - pad) as f32, (self.max + pad) as f32);
        let (q1, median, q3) = (self.q1 as f32, self.median as f32, self.q3 as f32);
        let (w_lo, w_hi) = (self.whisker_low as f32, self.whisker_high as f32);

        let outline = [
            (q1, 0.25),
            (q3, 0.25),
            (q3, 0.75),
            (q1, 0.75),
            (q1, 0.25),
        ];
        let median_line = [(median, 0.25), (median, 0.75)];
        let left = [(w_lo, 0.4), (w_lo, 0.6), (w_lo, 0.5), (q1, 0.5)];
        let right = [(q3, 0.5), (w_hi, 0.5), (w_hi, 0.4), (w_hi, 0.6)];
        let outliers: Vec<(f32, f32)> = self.outliers.iter().map(|&x| (x as f32, 0.5)).collect();

        println!("box plot ({} outliers)", self.outliers.len());
        Chart::new_with_y_range(CHART_WIDTH, BOX_HEIGHT, lo, hi, 0.0, 1.0)
            .lineplot(&Shape::Lines(&outline))
            .lineplot(&Shape::Lines(&median_line))
            .lineplot(&Shape::Lines(&left))
            .lineplot(&Shape::Lines(&right))
            .lineplot(&Shape::Points(&outliers))
            .nice();
    }
}
