//! Skewed integer key generators for OLTP benchmark workloads.
//!
//! This crate provides the integer generator family used both to pick keys
//! while loading a dataset and to pick keys while driving transactions
//! against it. Every generator draws through a caller-supplied RNG so a
//! whole benchmark run can share one seeded random source.
//!
//! # Architecture
//!
//! ```text
//!                 IntegerGenerator (trait)
//!                 next_rank / last_rank / mean
//!                          │
//!       ┌──────────────┬───┴──────────┬──────────────────────┐
//!       ▼              ▼              ▼                      ▼
//! CounterGenerator UniformGenerator ZipfianGenerator  FocusedZipfianGenerator
//!   (sequential)    [min, max]     zeta cache (mut)    fold + offset + wrap
//!                                        ▲                   │
//!                                        └─── delegate ──────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use oltp_distributions::{IntegerGenerator, ZipfianGenerator};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut zipf = ZipfianGenerator::new(1, 10_000).unwrap();
//!
//! let key = zipf.next_rank(&mut rng);
//! assert!((1..=10_000).contains(&key));
//! assert_eq!(zipf.last_rank(), Some(key));
//! ```
//!
//! # Thread safety
//!
//! Generators mutate private caches while drawing and take `&mut self`.
//! Give each worker stream its own instance.

pub mod counter;
pub mod error;
pub mod focused;
pub mod generator;
pub mod uniform;
pub mod zipfian;

// Re-exports for convenience
pub use counter::CounterGenerator;
pub use error::DistributionError;
pub use focused::FocusedZipfianGenerator;
pub use generator::{IntegerGenerator, KeyGenerator};
pub use uniform::UniformGenerator;
pub use zipfian::{ZipfianGenerator, ZIPFIAN_CONSTANT};

/// Number of items in the inclusive range `[min, max]`.
///
/// Fails when `min > max` or when the range is too wide to address with
/// an `i64` offset from `min`.
pub(crate) fn item_count(min: i64, max: i64) -> Result<u64, DistributionError> {
    if min > max {
        return Err(DistributionError::InvalidRange { min, max });
    }
    let count = max as i128 - min as i128 + 1;
    if count > i64::MAX as i128 {
        return Err(DistributionError::InvalidRange { min, max });
    }
    Ok(count as u64)
}
