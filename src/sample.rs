//! The `sample` command: draw from a distribution and summarize the result.

use clap::{Args, ValueEnum};
use oltp_distributions::{
    CounterGenerator, FocusedZipfianGenerator, IntegerGenerator, KeyGenerator, UniformGenerator,
    ZipfianGenerator, ZIPFIAN_CONSTANT,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Distribution {
    Sequential,
    Uniform,
    Zipfian,
    FocusedZipfian,
}

#[derive(Args, Clone, Debug)]
pub struct SampleArgs {
    /// Distribution to draw from
    #[arg(long, value_enum, default_value = "zipfian")]
    pub distribution: Distribution,

    /// Smallest value (inclusive)
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub min: i64,

    /// Largest value (inclusive)
    #[arg(long, default_value = "999", allow_hyphen_values = true)]
    pub max: i64,

    /// Skew exponent, in [0, 1)
    #[arg(long, default_value_t = ZIPFIAN_CONSTANT)]
    pub theta: f64,

    /// Slice holding the hotspot (focused-zipfian only)
    #[arg(long, default_value = "0")]
    pub num: i64,

    /// Number of slices (focused-zipfian only)
    #[arg(long, default_value = "1")]
    pub denom: i64,

    /// Number of values to draw
    #[arg(long, default_value = "100000")]
    pub draws: u64,

    /// Number of most frequent values to report
    #[arg(long, default_value = "10")]
    pub top: usize,

    /// Random seed for deterministic generation (same seed = same data)
    #[arg(long, default_value = "42")]
    pub seed: u64,
}

impl SampleArgs {
    fn generator(&self) -> anyhow::Result<KeyGenerator> {
        let generator = match self.distribution {
            Distribution::Sequential => CounterGenerator::new(self.min).into(),
            Distribution::Uniform => UniformGenerator::new(self.min, self.max)?.into(),
            Distribution::Zipfian => {
                ZipfianGenerator::with_theta(self.min, self.max, self.theta)?.into()
            }
            Distribution::FocusedZipfian => FocusedZipfianGenerator::with_theta(
                self.min, self.max, self.num, self.denom, self.theta,
            )?
            .into(),
        };
        Ok(generator)
    }
}

/// Frequency summary of one sampling run.
#[derive(Debug, Clone, Serialize)]
pub struct SampleSummary {
    pub distribution: String,
    pub draws: u64,
    pub distinct: usize,
    /// Most frequent values as `(value, count)`, most frequent first.
    pub top: Vec<(i64, u64)>,
    pub observed_mean: f64,
    pub expected_mean: f64,
}

/// Draw `args.draws` values and summarize them.
pub fn run_sample(args: &SampleArgs) -> anyhow::Result<SampleSummary> {
    let mut generator = args.generator()?;
    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut frequency: HashMap<i64, u64> = HashMap::new();
    let mut sum = 0f64;

    for _ in 0..args.draws {
        let value = generator.next_rank(&mut rng);
        *frequency.entry(value).or_insert(0) += 1;
        sum += value as f64;
    }

    let distinct = frequency.len();
    let mut top: Vec<(i64, u64)> = frequency.into_iter().collect();
    top.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    top.truncate(args.top);

    let observed_mean = if args.draws > 0 {
        sum / args.draws as f64
    } else {
        0.0
    };

    Ok(SampleSummary {
        distribution: generator.name().to_string(),
        draws: args.draws,
        distinct,
        top,
        observed_mean,
        expected_mean: generator.mean(),
    })
}

impl fmt::Display for SampleSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {} draws, {} distinct values",
            self.distribution, self.draws, self.distinct
        )?;
        writeln!(
            f,
            "mean: observed {:.3}, expected {:.3}",
            self.observed_mean, self.expected_mean
        )?;
        for (value, count) in &self.top {
            let share = if self.draws > 0 {
                *count as f64 * 100.0 / self.draws as f64
            } else {
                0.0
            };
            writeln!(f, "{value:>12} {count:>10} {share:>6.2}%")?;
        }
        Ok(())
    }
}
