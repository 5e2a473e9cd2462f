//! Zipfian rank generator with an incrementally maintained zeta cache.
//!
//! Rank `k` (0-based) is drawn with probability proportional to
//! `1 / (k + 1)^theta`. The normalizing constant
//! `zeta(n, theta) = sum_{i=1..n} i^-theta` is computed once per item count
//! and extended over only the delta when the item count changes.
//!
//! Inversion uses two strategies:
//! - `n <= EXACT_INVERSION_LIMIT`: a cumulative weight table searched with
//!   a binary search (exact).
//! - larger `n`: the approximation from Gray et al., "Quickly Generating
//!   Billion-Record Synthetic Databases" (SIGMOD 1994), with ranks 0 and 1
//!   handled exactly.

use crate::error::DistributionError;
use crate::generator::IntegerGenerator;
use rand::Rng;
use tracing::debug;

/// Default skew exponent, as used by YCSB-style workloads.
pub const ZIPFIAN_CONSTANT: f64 = 0.99;

/// Largest item count served by the exact cumulative table.
const EXACT_INVERSION_LIMIT: u64 = 1024;

/// Incrementally maintained sums for one `(count, theta)` pair.
#[derive(Debug, Clone)]
struct ZetaCache {
    count: u64,
    /// `sum_{i=1..count} i^-theta`
    zeta: f64,
    /// `sum_{i=1..count} i^(1-theta)`, numerator of the closed-form mean.
    moment: f64,
    /// Cumulative weights, kept only while `count <= EXACT_INVERSION_LIMIT`.
    cdf: Vec<f64>,
}

impl ZetaCache {
    fn new(count: u64, theta: f64) -> Self {
        let mut cache = Self {
            count: 0,
            zeta: 0.0,
            moment: 0.0,
            cdf: Vec::new(),
        };
        cache.resize(count, theta);
        cache
    }

    /// Move the cache to `count` items touching only the delta range.
    fn resize(&mut self, count: u64, theta: f64) {
        if count == self.count {
            return;
        }

        if count > self.count {
            for i in (self.count + 1)..=count {
                let i = i as f64;
                self.zeta += i.powf(-theta);
                self.moment += i.powf(1.0 - theta);
            }
        } else {
            // Subtract the largest terms first; they are the smallest in magnitude.
            for i in ((count + 1)..=self.count).rev() {
                let i = i as f64;
                self.zeta -= i.powf(-theta);
                self.moment -= i.powf(1.0 - theta);
            }
        }

        if count <= EXACT_INVERSION_LIMIT {
            if self.cdf.len() as u64 > count {
                self.cdf.truncate(count as usize);
            }
            let mut running = self.cdf.last().copied().unwrap_or(0.0);
            for i in (self.cdf.len() as u64 + 1)..=count {
                running += (i as f64).powf(-theta);
                self.cdf.push(running);
            }
        } else {
            self.cdf = Vec::new();
        }

        self.count = count;
    }
}

/// Generates Zipfian-distributed integers in `[min, min + item_count - 1]`.
///
/// Not thread-safe: the zeta cache is private mutable state updated when the
/// item count changes. Use one instance per worker.
#[derive(Debug, Clone)]
pub struct ZipfianGenerator {
    min: i64,
    theta: f64,
    /// `1 / (1 - theta)`
    alpha: f64,
    /// `zeta(2, theta)`
    zeta2: f64,
    /// `(1 - (2/n)^(1-theta)) / (1 - zeta2/zeta_n)`
    eta: f64,
    cache: ZetaCache,
    last: Option<i64>,
}

impl ZipfianGenerator {
    /// Create a generator over `[min, max]` with the default theta.
    pub fn new(min: i64, max: i64) -> Result<Self, DistributionError> {
        Self::with_theta(min, max, ZIPFIAN_CONSTANT)
    }

    /// Create a generator over `[min, max]` with the given skew exponent.
    ///
    /// `theta` must lie in `[0, 1)`; `0` degenerates to a uniform draw.
    pub fn with_theta(min: i64, max: i64, theta: f64) -> Result<Self, DistributionError> {
        let item_count = crate::item_count(min, max)?;
        Self::with_item_count(min, item_count, theta)
    }

    /// Create a generator over `item_count` items starting at `min`.
    pub fn with_item_count(
        min: i64,
        item_count: u64,
        theta: f64,
    ) -> Result<Self, DistributionError> {
        if !theta.is_finite() || !(0.0..1.0).contains(&theta) {
            return Err(DistributionError::InvalidTheta(theta));
        }
        check_item_count(min, item_count)?;

        let cache = ZetaCache::new(item_count, theta);
        let zeta2 = 1.0 + 2f64.powf(-theta);
        let mut generator = Self {
            min,
            theta,
            alpha: 1.0 / (1.0 - theta),
            zeta2,
            eta: 0.0,
            cache,
            last: None,
        };
        generator.eta = generator.compute_eta();
        Ok(generator)
    }

    /// Grow or shrink the key space to `item_count` items.
    ///
    /// This is the only fallible call after construction; draws that follow
    /// cover the new key space and never fail. The zeta sum is extended (or reduced) over only the changed range,
    /// never recomputed from the start.
    pub fn set_item_count(&mut self, item_count: u64) -> Result<(), DistributionError> {
        check_item_count(self.min, item_count)?;
        if item_count == self.cache.count {
            return Ok(());
        }

        debug!(
            from = self.cache.count,
            to = item_count,
            theta = self.theta,
            "Resizing Zipfian zeta cache"
        );
        self.cache.resize(item_count, self.theta);
        self.eta = self.compute_eta();
        Ok(())
    }

    fn compute_eta(&self) -> f64 {
        let n = self.cache.count as f64;
        if self.cache.count <= 2 {
            // Only used by the approximate path, which requires n > EXACT_INVERSION_LIMIT.
            return 0.0;
        }
        (1.0 - (2.0 / n).powf(1.0 - self.theta)) / (1.0 - self.zeta2 / self.cache.zeta)
    }

    /// Zero-based rank for one uniform draw.
    fn draw_offset<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        let n = self.cache.count;
        if n == 1 {
            return 0;
        }
        if self.theta == 0.0 {
            return rng.random_range(0..n);
        }

        let u: f64 = rng.random();
        if !self.cache.cdf.is_empty() {
            let target = u * self.cache.zeta;
            let idx = self.cache.cdf.partition_point(|&c| c <= target) as u64;
            return idx.min(n - 1);
        }

        let uz = u * self.cache.zeta;
        if uz < 1.0 {
            return 0;
        }
        if uz < 1.0 + 0.5f64.powf(self.theta) {
            return 1;
        }
        let rank = (n as f64 * (self.eta * u - self.eta + 1.0).powf(self.alpha)) as u64;
        rank.min(n - 1)
    }

    /// Lower bound of the key space.
    pub fn min(&self) -> i64 {
        self.min
    }

    /// Upper bound of the key space (inclusive).
    pub fn max(&self) -> i64 {
        self.min + (self.cache.count - 1) as i64
    }

    /// Number of items currently covered.
    pub fn item_count(&self) -> u64 {
        self.cache.count
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Cached `zeta(item_count, theta)`.
    pub fn zeta(&self) -> f64 {
        self.cache.zeta
    }

    /// Ideal probability of the zero-based rank `rank`.
    pub fn probability(&self, rank: u64) -> f64 {
        if rank >= self.cache.count {
            return 0.0;
        }
        ((rank + 1) as f64).powf(-self.theta) / self.cache.zeta
    }
}

impl IntegerGenerator for ZipfianGenerator {
    fn next_rank<R: Rng + ?Sized>(&mut self, rng: &mut R) -> i64 {
        let value = self.min + self.draw_offset(rng) as i64;
        self.last = Some(value);
        value
    }

    fn last_rank(&self) -> Option<i64> {
        self.last
    }

    /// `min + sum(i^(1-theta)) / sum(i^-theta) - 1`
    fn mean(&self) -> f64 {
        self.min as f64 + self.cache.moment / self.cache.zeta - 1.0
    }
}

fn check_item_count(min: i64, item_count: u64) -> Result<(), DistributionError> {
    if item_count == 0 || item_count > i64::MAX as u64 {
        return Err(DistributionError::InvalidItemCount(item_count));
    }
    if min.checked_add((item_count - 1) as i64).is_none() {
        return Err(DistributionError::InvalidItemCount(item_count));
    }
    Ok(())
}
