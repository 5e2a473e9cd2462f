//! Zipfian generator whose hotspot is moved to a fractional position.
//!
//! The key space `[min, max]` with `n` items is split into `denom` equal
//! slices and the hotspot is placed in the middle of slice `num`:
//!
//! ```text
//! offset = (n / (2 * denom)) * (2 * num + 1)
//! ```
//!
//! A raw Zipfian rank `r` is drawn from `[0, n]` and folded around zero
//! (odd ranks go above the center, even ranks below, then halved):
//!
//! ```text
//! r = 0  1  2  3  4  5  6 ...
//! f = 0  0 -1  1 -2  2 -3 ...
//! ```
//!
//! The folded values cover exactly `n` consecutive integers, so
//! `min + (f + offset) mod n` (euclidean) reaches every key and never
//! leaves the range.

use crate::error::DistributionError;
use crate::generator::IntegerGenerator;
use crate::zipfian::{ZipfianGenerator, ZIPFIAN_CONSTANT};
use rand::Rng;

/// Zipfian generator with its hotspot re-centered at `num / denom`.
///
/// Shares the thread-safety caveat of [`ZipfianGenerator`].
#[derive(Debug, Clone)]
pub struct FocusedZipfianGenerator {
    delegate: ZipfianGenerator,
    min: i64,
    max: i64,
    item_count: u64,
    offset: u64,
    last: Option<i64>,
}

impl FocusedZipfianGenerator {
    /// Create a generator over `[min, max]` centered on slice `num` of `denom`.
    ///
    /// Fails when `num / denom` is not a proper fraction, or when the key
    /// space holds fewer than `2 * denom` items and `num > 0`.
    pub fn new(min: i64, max: i64, num: i64, denom: i64) -> Result<Self, DistributionError> {
        Self::with_theta(min, max, num, denom, ZIPFIAN_CONSTANT)
    }

    /// Same as [`FocusedZipfianGenerator::new`] with an explicit skew exponent.
    pub fn with_theta(
        min: i64,
        max: i64,
        num: i64,
        denom: i64,
        theta: f64,
    ) -> Result<Self, DistributionError> {
        if denom <= 0 || num < 0 || num >= denom {
            return Err(DistributionError::InvalidCenter { num, denom });
        }
        let item_count = crate::item_count(min, max)?;
        // With fewer than 2 * denom items every slice collapses onto offset 0.
        if num > 0 && item_count / (2 * denom as u64) == 0 {
            return Err(DistributionError::UnresolvableCenter {
                num,
                denom,
                item_count,
            });
        }
        let offset = focus_offset(item_count, num as u64, denom as u64);

        // The delegate covers n + 1 raw ranks so the fold yields n distinct values.
        let delegate = ZipfianGenerator::with_item_count(0, item_count + 1, theta)?;

        Ok(Self {
            delegate,
            min,
            max,
            item_count,
            offset,
            last: None,
        })
    }

    /// Fold a raw rank and wrap it into the key space.
    fn place(&self, raw: i64) -> i64 {
        let mut folded = raw as i128;
        if folded % 2 == 0 {
            folded = -folded;
        }
        folded /= 2;

        let n = self.item_count as i128;
        let wrapped = (folded + self.offset as i128).rem_euclid(n);
        let value = self.min as i128 + wrapped;
        debug_assert!(value >= self.min as i128 && value <= self.max as i128);
        value as i64
    }

    /// Offset from `min` of the hotspot.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Key the hotspot is centered on.
    pub fn center(&self) -> i64 {
        self.place(0)
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn item_count(&self) -> u64 {
        self.item_count
    }
}

impl IntegerGenerator for FocusedZipfianGenerator {
    fn next_rank<R: Rng + ?Sized>(&mut self, rng: &mut R) -> i64 {
        let raw = self.delegate.next_rank(rng);
        let value = self.place(raw);
        self.last = Some(value);
        value
    }

    fn last_rank(&self) -> Option<i64> {
        self.last
    }

    /// Exact expectation over the folded and wrapped keys.
    ///
    /// Walks every raw rank, so this costs `O(item_count)` per call.
    fn mean(&self) -> f64 {
        (0..self.delegate.item_count())
            .map(|raw| self.delegate.probability(raw) * self.place(raw as i64) as f64)
            .sum()
    }
}

fn focus_offset(item_count: u64, num: u64, denom: u64) -> u64 {
    let slice = item_count as u128 / (2 * denom as u128);
    (slice * (2 * num as u128 + 1)) as u64
}
