//! Uniform integer generator.

use crate::error::DistributionError;
use crate::generator::IntegerGenerator;
use rand::Rng;

/// Draws integers uniformly from the inclusive range `[min, max]`.
#[derive(Debug, Clone)]
pub struct UniformGenerator {
    min: i64,
    max: i64,
    last: Option<i64>,
}

impl UniformGenerator {
    pub fn new(min: i64, max: i64) -> Result<Self, DistributionError> {
        if min > max {
            return Err(DistributionError::InvalidRange { min, max });
        }
        Ok(Self {
            min,
            max,
            last: None,
        })
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }
}

impl IntegerGenerator for UniformGenerator {
    fn next_rank<R: Rng + ?Sized>(&mut self, rng: &mut R) -> i64 {
        let value = rng.random_range(self.min..=self.max);
        self.last = Some(value);
        value
    }

    fn last_rank(&self) -> Option<i64> {
        self.last
    }

    fn mean(&self) -> f64 {
        (self.min as f64 + self.max as f64) / 2.0
    }
}
