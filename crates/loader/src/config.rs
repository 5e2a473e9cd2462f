//! Configuration types for the batched loader.

use crate::error::LoaderError;
use oltp_distributions::{
    CounterGenerator, DistributionError, FocusedZipfianGenerator, KeyGenerator, UniformGenerator,
    ZipfianGenerator, ZIPFIAN_CONSTANT,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default number of rows per committed batch.
pub const DEFAULT_COMMIT_COUNT: usize = 1000;

/// Default seed for the shared random source.
pub const DEFAULT_SEED: u64 = 42;

fn default_scale_factor() -> f64 {
    1.0
}

fn default_commit_count() -> usize {
    DEFAULT_COMMIT_COUNT
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_theta() -> f64 {
    ZIPFIAN_CONSTANT
}

/// How the loader picks the key of each row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KeyDistribution {
    /// Consecutive keys from `start`.
    Sequential {
        #[serde(default)]
        start: i64,
    },
    /// Uniform keys over `[0, record_count)`.
    Uniform,
    /// Zipfian keys over `[0, record_count)`.
    Zipfian {
        #[serde(default = "default_theta")]
        theta: f64,
    },
    /// Zipfian keys over `[0, record_count)` with the hotspot at `num / denom`.
    FocusedZipfian {
        #[serde(default = "default_theta")]
        theta: f64,
        num: i64,
        denom: i64,
    },
}

impl Default for KeyDistribution {
    fn default() -> Self {
        KeyDistribution::Sequential { start: 0 }
    }
}

impl KeyDistribution {
    /// Build the key generator for a table of `record_count` rows.
    ///
    /// Random distributions cover at least one key so an empty load still
    /// has a valid key space.
    pub fn build(&self, record_count: u64) -> Result<KeyGenerator, DistributionError> {
        let max = record_count.max(1) as i64 - 1;
        let generator = match self {
            KeyDistribution::Sequential { start } => CounterGenerator::new(*start).into(),
            KeyDistribution::Uniform => UniformGenerator::new(0, max)?.into(),
            KeyDistribution::Zipfian { theta } => ZipfianGenerator::with_theta(0, max, *theta)?.into(),
            KeyDistribution::FocusedZipfian { theta, num, denom } => {
                FocusedZipfianGenerator::with_theta(0, max, *num, *denom, *theta)?.into()
            }
        };
        Ok(generator)
    }
}

/// Configuration for loading one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Table to populate.
    pub table: String,
    /// Record count before scaling.
    pub base_record_count: u64,
    /// Multiplier applied to `base_record_count`.
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f64,
    /// Rows per committed batch.
    #[serde(default = "default_commit_count")]
    pub commit_count: usize,
    /// Seed for the shared random source.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Key selection strategy.
    #[serde(default)]
    pub key_distribution: KeyDistribution,
}

impl LoaderConfig {
    /// Create a configuration with default scale, commit count and seed.
    pub fn new(table: impl Into<String>, base_record_count: u64) -> Self {
        Self {
            table: table.into(),
            base_record_count,
            scale_factor: default_scale_factor(),
            commit_count: DEFAULT_COMMIT_COUNT,
            seed: DEFAULT_SEED,
            key_distribution: KeyDistribution::default(),
        }
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, LoaderError> {
        let config: LoaderConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the scale factor.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the commit threshold.
    pub fn with_commit_count(mut self, commit_count: usize) -> Self {
        self.commit_count = commit_count;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the key distribution.
    pub fn with_key_distribution(mut self, key_distribution: KeyDistribution) -> Self {
        self.key_distribution = key_distribution;
        self
    }

    /// Rows to load: `base_record_count * scale_factor`, rounded.
    pub fn record_count(&self) -> u64 {
        (self.base_record_count as f64 * self.scale_factor).round() as u64
    }

    /// Number of batches a full load submits.
    pub fn batch_count(&self) -> u64 {
        self.record_count().div_ceil(self.commit_count.max(1) as u64)
    }

    /// Reject configurations that cannot drive a load.
    pub fn validate(&self) -> Result<(), LoaderError> {
        if self.table.trim().is_empty() {
            return Err(LoaderError::Config("table name must not be empty".to_string()));
        }
        if self.commit_count == 0 {
            return Err(LoaderError::Config("commit_count must be positive".to_string()));
        }
        if !self.scale_factor.is_finite() || self.scale_factor < 0.0 {
            return Err(LoaderError::Config(format!(
                "scale_factor must be a non-negative number, got {}",
                self.scale_factor
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oltp_distributions::IntegerGenerator;

    #[test]
    fn test_defaults() {
        let config = LoaderConfig::new("usertable", 1000);
        assert_eq!(config.commit_count, DEFAULT_COMMIT_COUNT);
        assert_eq!(config.seed, DEFAULT_SEED);
        assert_eq!(config.scale_factor, 1.0);
        assert_eq!(config.key_distribution, KeyDistribution::Sequential { start: 0 });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_record_count_rounds_scaled_count() {
        assert_eq!(LoaderConfig::new("t", 1000).with_scale_factor(2.5).record_count(), 2500);
        assert_eq!(LoaderConfig::new("t", 3).with_scale_factor(0.5).record_count(), 2);
        assert_eq!(LoaderConfig::new("t", 3).with_scale_factor(0.1).record_count(), 0);
    }

    #[test]
    fn test_batch_count() {
        let config = LoaderConfig::new("t", 2500).with_commit_count(1000);
        assert_eq!(config.batch_count(), 3);
        assert_eq!(LoaderConfig::new("t", 0).batch_count(), 0);
        assert_eq!(LoaderConfig::new("t", 2000).batch_count(), 2);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(matches!(
            LoaderConfig::new("", 10).validate(),
            Err(LoaderError::Config(_))
        ));
        assert!(matches!(
            LoaderConfig::new("t", 10).with_commit_count(0).validate(),
            Err(LoaderError::Config(_))
        ));
        assert!(matches!(
            LoaderConfig::new("t", 10).with_scale_factor(-1.0).validate(),
            Err(LoaderError::Config(_))
        ));
        assert!(matches!(
            LoaderConfig::new("t", 10).with_scale_factor(f64::NAN).validate(),
            Err(LoaderError::Config(_))
        ));
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
table: usertable
base_record_count: 1000
scale_factor: 10
commit_count: 500
key_distribution:
  type: focused_zipfian
  num: 1
  denom: 4
"#;
        let config = LoaderConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.record_count(), 10_000);
        assert_eq!(config.commit_count, 500);
        assert_eq!(config.seed, DEFAULT_SEED);
        assert_eq!(
            config.key_distribution,
            KeyDistribution::FocusedZipfian {
                theta: ZIPFIAN_CONSTANT,
                num: 1,
                denom: 4
            }
        );
    }

    #[test]
    fn test_from_yaml_validates() {
        let yaml = "table: t\nbase_record_count: 10\ncommit_count: 0\n";
        assert!(matches!(LoaderConfig::from_yaml(yaml), Err(LoaderError::Config(_))));
        assert!(matches!(LoaderConfig::from_yaml("table: [1"), Err(LoaderError::Yaml(_))));
    }

    #[test]
    fn test_build_key_generators() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let mut rng = StdRng::seed_from_u64(42);
        let distributions = [
            KeyDistribution::Sequential { start: 0 },
            KeyDistribution::Uniform,
            KeyDistribution::Zipfian { theta: 0.9 },
            KeyDistribution::FocusedZipfian {
                theta: 0.9,
                num: 0,
                denom: 2,
            },
        ];
        for distribution in &distributions {
            let mut generator = distribution.build(100).unwrap();
            let key = generator.next_rank(&mut rng);
            assert!((0..100).contains(&key));
        }
    }

    #[test]
    fn test_build_rejects_invalid_center() {
        let distribution = KeyDistribution::FocusedZipfian {
            theta: 0.9,
            num: 3,
            denom: 2,
        };
        assert!(matches!(
            distribution.build(100),
            Err(DistributionError::InvalidCenter { num: 3, denom: 2 })
        ));
    }

    #[test]
    fn test_build_empty_key_space() {
        use rand::SeedableRng;

        let mut generator = KeyDistribution::Zipfian { theta: 0.5 }.build(0).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        assert_eq!(generator.next_rank(&mut rng), 0);
    }
}
